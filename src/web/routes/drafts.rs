use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, HasOwner, PaginatableRepository, ResourceTyped, check_access,
        entity::{DraftRecord, DraftRecordCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{DraftResponse, SavedDraftSummary, SelectionBody, StepBody},
        error::ErrorResponse,
        middlewares,
        routes::PaginationQuery,
    },
    wizard::{BasicsPatch, CourseDraft, PricingPatch},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(draft_create_handler))
        .route("/{id}", get(draft_get_handler).delete(draft_close_handler))
        .route("/{id}/basics", put(draft_basics_handler))
        .route("/{id}/pricing", put(draft_pricing_handler))
        .route("/{id}/selection", put(draft_selection_handler))
        .route("/{id}/steps", put(draft_step_handler))
        .route("/{id}/steps/next", post(draft_next_step_handler))
        .route("/{id}/steps/back", post(draft_previous_step_handler))
        .route("/{id}/save", post(draft_save_handler))
        .route("/saved/page", get(saved_page_handler))
        .route("/saved/{id}", delete(saved_delete_handler))
        .route("/saved/{id}/open", post(saved_open_handler))
        .route_layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/",
    description = "Opens a new, empty course draft owned by the caller",
    responses(
        (status = 201, description = "Draft session opened", body = DraftResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .open(user, user.user_id(), CourseDraft::new(), |store| {
            DraftResponse::from(store)
        })
        .await?;

    tracing::info!(draft_id = %draft.id, user_id = %user.user_id(), "draft created");
    Ok((StatusCode::CREATED, Json(draft)))
}

#[utoipa::path(
    get,
    path = "/api/v1/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Current state of the session", body = DraftResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| Ok(DraftResponse::from(&*store)))
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{id}",
    description = "Closes the session. A saved copy is kept.",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_close_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    state.sessions().close(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/basics",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = BasicsPatch,
    responses(
        (status = 200, description = "Basics updated", body = DraftResponse),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_basics_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BasicsPatch>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.update_basics(&patch);
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/pricing",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = PricingPatch,
    responses(
        (status = 200, description = "Pricing updated", body = DraftResponse),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_pricing_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PricingPatch>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.update_pricing(&patch);
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/selection",
    description = "Opens a lecture in the editor, or closes the editor with a null id",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = SelectionBody,
    responses(
        (status = 200, description = "Selection changed", body = DraftResponse),
        (status = 404, description = "Unknown draft or lecture", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_selection_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectionBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.select_lecture(body.lecture_id) {
                return Err(WebError::resource_not_found(
                    crate::model::ResourceType::Lecture,
                ));
            }
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/steps",
    description = "Jumps to a wizard step. Every step before it must be complete.",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = StepBody,
    responses(
        (status = 200, description = "Step changed", body = DraftResponse),
        (status = 422, description = "An earlier step is incomplete", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_step_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StepBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.go_to_step(body.step)?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/steps/next",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Moved to the next step", body = DraftResponse),
        (status = 409, description = "Already at the last step", body = ErrorResponse),
        (status = 422, description = "Current step is incomplete", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_next_step_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.next_step()?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/steps/back",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Moved to the previous step", body = DraftResponse),
        (status = 409, description = "Already at the first step", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_previous_step_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let draft = state
        .sessions()
        .with_session(user, id, |store| {
            store.previous_step()?;
            Ok(DraftResponse::from(&*store))
        })
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/save",
    description = "Stores the draft so it can be reopened later",
    params(("id" = Uuid, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Draft saved", body = SavedDraftSummary),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn draft_save_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let data = state
        .sessions()
        .with_owned_session(user, id, |owner_id, store| {
            Ok(DraftRecordCreate::new(owner_id, store.draft().clone()))
        })
        .await?;

    let record = DraftRecord::save(state.pool(), user, data)
        .await
        .map_err(|e| WebError::resource_access(DraftRecord::get_resource_type(), e))?;

    tracing::info!(draft_id = %record.id(), "draft saved");
    Ok((StatusCode::OK, Json(SavedDraftSummary::from(record))))
}

#[utoipa::path(
    get,
    path = "/api/v1/drafts/saved/page",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Saved drafts visible to the caller, newest first", body = crate::model::Page<SavedDraftSummary>),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn saved_page_handler(
    ctx: RequestContext,
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (limit, offset) = page.bounds();
    let drafts = DraftRecord::page(state.pool(), user, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(DraftRecord::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(drafts.map(SavedDraftSummary::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/saved/{id}/open",
    description = "Opens a session on a saved draft. Stored trees are repaired and checked first.",
    params(("id" = Uuid, Path, description = "Saved draft id")),
    responses(
        (status = 200, description = "Draft session opened", body = DraftResponse),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No saved draft with this id", body = ErrorResponse),
        (status = 500, description = "Stored draft is corrupt", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn saved_open_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let resource_type = DraftRecord::get_resource_type();

    let record = DraftRecord::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(resource_type.clone(), e))?
        .ok_or(WebError::resource_not_found(resource_type.clone()))?;

    check_access(user, &record).map_err(|e| WebError::resource_access(resource_type.clone(), e))?;

    let draft = record
        .draft()
        .map_err(|e| WebError::resource_fetch_error(resource_type, e))?;

    let draft = state
        .sessions()
        .open(user, record.owner_id(), draft, |store| DraftResponse::from(store))
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/saved/{id}",
    description = "Deletes the stored copy. An open session on the draft is left alone.",
    params(("id" = Uuid, Path, description = "Saved draft id")),
    responses(
        (status = 204, description = "Saved draft deleted"),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No saved draft with this id", body = ErrorResponse),
    ),
    tag = "drafts",
    security(("cookie" = []))
)]
pub(crate) async fn saved_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let resource_type = DraftRecord::get_resource_type();

    let record = DraftRecord::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(resource_type.clone(), e))?
        .ok_or(WebError::resource_not_found(resource_type.clone()))?;

    check_access(user, &record).map_err(|e| WebError::resource_access(resource_type.clone(), e))?;

    record
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_access(resource_type, e))?;

    tracing::info!(draft_id = %id, "saved draft deleted");
    Ok(StatusCode::NO_CONTENT)
}
