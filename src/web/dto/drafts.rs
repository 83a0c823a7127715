use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    curriculum::{CurriculumTree, LectureId},
    model::entity::DraftRecord,
    web::dto::DragStatus,
    wizard::{CourseBasics, CoursePricing, StepCompletion, WizardStep, WizardStore},
};

/// Full view of one authoring session.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DraftResponse {
    pub id: Uuid,
    pub current_step: WizardStep,
    pub completion: StepCompletion,
    pub basics: CourseBasics,
    pub pricing: CoursePricing,
    pub curriculum: CurriculumTree,
    pub lecture_count: usize,
    /// Sum of every lecture's duration, in minutes.
    pub total_duration: u32,
    /// Lecture open in the editor.
    pub selection: Option<LectureId>,
    pub drag: DragStatus,
}

impl From<&WizardStore> for DraftResponse {
    fn from(store: &WizardStore) -> Self {
        let draft = store.draft();
        Self {
            id: draft.id(),
            current_step: store.current_step(),
            completion: store.completion(),
            basics: draft.basics().clone(),
            pricing: draft.pricing().clone(),
            curriculum: draft.curriculum().clone(),
            lecture_count: draft.curriculum().lecture_count(),
            total_duration: draft.curriculum().total_duration(),
            selection: store.selection(),
            drag: store.drag().into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SelectionBody {
    /// `null` closes the editor.
    pub lecture_id: Option<LectureId>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct StepBody {
    pub step: WizardStep,
}

/// A row of the saved drafts listing.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SavedDraftSummary {
    pub id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

impl From<DraftRecord> for SavedDraftSummary {
    fn from(record: DraftRecord) -> Self {
        Self {
            id: record.id(),
            title: record.title().to_string(),
            updated_at: record.updated_at(),
        }
    }
}
