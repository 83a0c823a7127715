use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::web::{
    AppState, RequestContext, WebResult,
    dto::{DraftResponse, DragHoverBody, DragNudgeBody, DragStartBody, DropResponse},
    error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/drag/start", post(drag_start_handler))
        .route("/{id}/drag/hover", post(drag_hover_handler))
        .route("/{id}/drag/nudge", post(drag_nudge_handler))
        .route("/{id}/drag/drop", post(drag_drop_handler))
        .route("/{id}/drag/cancel", post(drag_cancel_handler))
        .route_layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/drag/start",
    description = "Picks up a section or a lecture",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = DragStartBody,
    responses(
        (status = 200, description = "Drag started", body = DraftResponse),
        (status = 404, description = "Id is neither a section nor a lecture", body = ErrorResponse),
        (status = 409, description = "A drag is already in progress", body = ErrorResponse),
    ),
    tag = "drag",
    security(("cookie" = []))
)]
pub(crate) async fn drag_start_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DragStartBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.begin_drag(body.id, body.input)?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/drag/hover",
    description = "Reports what the pointer is over. Unknown ids hover nothing.",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = DragHoverBody,
    responses(
        (status = 200, description = "Hover target recorded", body = DraftResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    ),
    tag = "drag",
    security(("cookie" = []))
)]
pub(crate) async fn drag_hover_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DragHoverBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.drag_over(body.target)?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/drag/nudge",
    description = "Moves the hover target one drop slot up or down",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = DragNudgeBody,
    responses(
        (status = 200, description = "Hover target moved", body = DraftResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    ),
    tag = "drag",
    security(("cookie" = []))
)]
pub(crate) async fn drag_nudge_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DragNudgeBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.nudge_drag(body.direction)?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/drag/drop",
    description = "Releases the dragged item over the current hover target",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Committed edit or the reason nothing changed", body = DropResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    ),
    tag = "drag",
    security(("cookie" = []))
)]
pub(crate) async fn drag_drop_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let response = state
        .sessions()
        .with_session(user, id, |store| {
            let outcome = store.drop_drag()?;
            Ok(DropResponse::new(outcome, DraftResponse::from(&*store)))
        })
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/drag/cancel",
    description = "Abandons the drag. The curriculum is left as it was.",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Drag cancelled", body = DropResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    ),
    tag = "drag",
    security(("cookie" = []))
)]
pub(crate) async fn drag_cancel_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let response = state
        .sessions()
        .with_session(user, id, |store| {
            let outcome = store.cancel_drag()?;
            Ok(DropResponse::new(outcome, DraftResponse::from(&*store)))
        })
        .await?;

    Ok((StatusCode::OK, Json(response)))
}
