use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{post, put},
};
use uuid::Uuid;

use crate::{
    curriculum::{LectureDraft, LectureId, LecturePatch, SectionId, SectionPatch},
    model::ResourceType,
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{EditResponse, MoveAcrossBody, MoveWithinBody, ReorderSectionsBody},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/{id}/sections", post(section_create_handler))
        .route("/{id}/sections/order", put(sections_reorder_handler))
        .route(
            "/{id}/sections/{section_id}",
            put(section_update_handler).delete(section_delete_handler),
        )
        .route(
            "/{id}/sections/{section_id}/lectures",
            post(lecture_create_handler),
        )
        .route(
            "/{id}/sections/{section_id}/lectures/move",
            put(lectures_move_within_handler),
        )
        .route(
            "/{id}/lectures/{lecture_id}",
            put(lecture_update_handler).delete(lecture_delete_handler),
        )
        .route(
            "/{id}/lectures/{lecture_id}/move",
            post(lecture_move_across_handler),
        )
        .route_layer(middleware::from_fn(middlewares::extract_context_fn))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/sections",
    description = "Appends a section. Title and description may be set in the same call.",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = SectionPatch,
    responses(
        (status = 201, description = "Section added, `created_id` is its id", body = EditResponse),
        (status = 403, description = "Draft belongs to another instructor", body = ErrorResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn section_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SectionPatch>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            let section_id = store.add_section_with(patch);
            Ok(EditResponse::new(true, Some(section_id.as_uuid()), store))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(edit)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/sections/order",
    description = "Reorders sections. The body must list every current section id exactly once.",
    params(("id" = Uuid, Path, description = "Draft id")),
    request_body = ReorderSectionsBody,
    responses(
        (status = 200, description = "`changed` is false when the list is not a permutation or keeps the order", body = EditResponse),
        (status = 404, description = "No open session for this draft", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn sections_reorder_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReorderSectionsBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            let changed = store.reorder_sections(body.section_ids);
            Ok(EditResponse::new(changed, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/sections/{section_id}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("section_id" = Uuid, Path, description = "Section id"),
    ),
    request_body = SectionPatch,
    responses(
        (status = 200, description = "Section updated", body = EditResponse),
        (status = 404, description = "Unknown draft or section", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn section_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, SectionId)>,
    Json(patch): Json<SectionPatch>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.curriculum().is_section(section_id) {
                return Err(WebError::resource_not_found(ResourceType::Section));
            }
            let changed = store.update_section(section_id, patch);
            Ok(EditResponse::new(changed, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{id}/sections/{section_id}",
    description = "Deletes a section together with its lectures",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("section_id" = Uuid, Path, description = "Section id"),
    ),
    responses(
        (status = 200, description = "Section deleted", body = EditResponse),
        (status = 404, description = "Unknown draft or section", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn section_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, SectionId)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.delete_section(section_id) {
                return Err(WebError::resource_not_found(ResourceType::Section));
            }
            Ok(EditResponse::new(true, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/sections/{section_id}/lectures",
    description = "Appends a lecture to a section. Durations above the limit are clamped.",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("section_id" = Uuid, Path, description = "Section id"),
    ),
    request_body = LectureDraft,
    responses(
        (status = 201, description = "Lecture added, `created_id` is its id", body = EditResponse),
        (status = 404, description = "Unknown draft or section", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn lecture_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, SectionId)>,
    Json(draft): Json<LectureDraft>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            let lecture_id = store
                .add_lecture(section_id, draft)
                .ok_or(WebError::resource_not_found(ResourceType::Section))?;
            Ok(EditResponse::new(true, Some(lecture_id.as_uuid()), store))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(edit)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/sections/{section_id}/lectures/move",
    description = "Moves a lecture inside its section. Indices are clamped.",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("section_id" = Uuid, Path, description = "Section id"),
    ),
    request_body = MoveWithinBody,
    responses(
        (status = 200, description = "`changed` is false when nothing moved", body = EditResponse),
        (status = 404, description = "Unknown draft or section", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn lectures_move_within_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, SectionId)>,
    Json(body): Json<MoveWithinBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.curriculum().is_section(section_id) {
                return Err(WebError::resource_not_found(ResourceType::Section));
            }
            let changed =
                store.move_lecture_within_section(section_id, body.from_index, body.to_index);
            Ok(EditResponse::new(changed, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drafts/{id}/lectures/{lecture_id}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("lecture_id" = Uuid, Path, description = "Lecture id"),
    ),
    request_body = LecturePatch,
    responses(
        (status = 200, description = "Lecture updated", body = EditResponse),
        (status = 404, description = "Unknown draft or lecture", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn lecture_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, lecture_id)): Path<(Uuid, LectureId)>,
    Json(patch): Json<LecturePatch>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.curriculum().is_lecture(lecture_id) {
                return Err(WebError::resource_not_found(ResourceType::Lecture));
            }
            let changed = store.update_lecture(lecture_id, patch);
            Ok(EditResponse::new(changed, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{id}/lectures/{lecture_id}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("lecture_id" = Uuid, Path, description = "Lecture id"),
    ),
    responses(
        (status = 200, description = "Lecture deleted", body = EditResponse),
        (status = 404, description = "Unknown draft or lecture", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn lecture_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, lecture_id)): Path<(Uuid, LectureId)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.delete_lecture(lecture_id) {
                return Err(WebError::resource_not_found(ResourceType::Lecture));
            }
            Ok(EditResponse::new(true, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts/{id}/lectures/{lecture_id}/move",
    description = "Moves a lecture into another section at `target_index` (clamped)",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("lecture_id" = Uuid, Path, description = "Lecture id"),
    ),
    request_body = MoveAcrossBody,
    responses(
        (status = 200, description = "`changed` is false when an id did not match", body = EditResponse),
        (status = 404, description = "Unknown draft or lecture", body = ErrorResponse),
    ),
    tag = "curriculum",
    security(("cookie" = []))
)]
pub(crate) async fn lecture_move_across_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, lecture_id)): Path<(Uuid, LectureId)>,
    Json(body): Json<MoveAcrossBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let edit = state
        .sessions()
        .with_session(user, id, |store| {
            if !store.curriculum().is_lecture(lecture_id) {
                return Err(WebError::resource_not_found(ResourceType::Lecture));
            }
            let changed = store.move_lecture_across_sections(
                lecture_id,
                body.from_section_id,
                body.to_section_id,
                body.target_index,
            );
            Ok(EditResponse::new(changed, None, store))
        })
        .await?;

    Ok((StatusCode::OK, Json(edit)))
}
