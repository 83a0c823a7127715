use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    curriculum::CurriculumMutation,
    drag::{CancelReason, Direction, DragController, DragKind, DropOutcome, InputSource},
    web::dto::DraftResponse,
};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct DragStartBody {
    /// Section or lecture id.
    pub id: Uuid,
    #[serde(default)]
    pub input: InputSource,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct DragHoverBody {
    /// `null` when the pointer left every container.
    pub target: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct DragNudgeBody {
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct DragStatus {
    pub dragging: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DragKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputSource>,
}

impl From<&DragController> for DragStatus {
    fn from(controller: &DragController) -> Self {
        match controller.session() {
            None => Self::default(),
            Some(session) => Self {
                dragging: true,
                kind: Some(session.source().kind()),
                source: Some(session.source().id()),
                hover: session.hover().map(|t| t.id()),
                input: Some(session.input()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DropStatus {
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DropResponse {
    pub outcome: DropStatus,
    /// The edit that was applied, for a committed drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation: Option<CurriculumMutation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<CancelReason>,
    pub draft: DraftResponse,
}

impl DropResponse {
    pub fn new(outcome: DropOutcome, draft: DraftResponse) -> Self {
        match outcome {
            DropOutcome::Committed(mutation) => Self {
                outcome: DropStatus::Committed,
                mutation: Some(mutation),
                reason: None,
                draft,
            },
            DropOutcome::Cancelled(reason) => Self {
                outcome: DropStatus::Cancelled,
                mutation: None,
                reason: Some(reason),
                draft,
            },
        }
    }
}
