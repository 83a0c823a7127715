use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::Cookies;

use crate::{
    Config, auth,
    web::{RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

/// Decodes the session cookie into a [`RequestContext`]. A missing cookie gives an
/// anonymous context; a bad one is rejected.
pub async fn extract_context_fn(
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) => token,
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let data = auth::process_token(token.value(), Config::get_or_init(false).await.app().jwt())
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e.into()))?;

    let id = data
        .claims
        .instructor_id()
        .map_err(|e| WebError::auth_cookie_invalid(AUTH_TOKEN, e))?;

    let user = AuthenticatedUser::new(id, data.claims.role.as_str().into());
    tracing::trace!(user_id = %id, role = %user.user_role(), "request authenticated");
    req.extensions_mut()
        .insert(RequestContext::new(Some(user)));

    Ok(next.run(req).await)
}
