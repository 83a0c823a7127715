use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{curriculum::SectionId, web::dto::DraftResponse, wizard::WizardStore};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ReorderSectionsBody {
    /// Every section id, in the new order.
    pub section_ids: Vec<SectionId>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MoveWithinBody {
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MoveAcrossBody {
    pub from_section_id: SectionId,
    pub to_section_id: SectionId,
    pub target_index: usize,
}

/// Result of one curriculum edit.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EditResponse {
    /// `false` when the edit matched nothing and the draft is unchanged.
    pub changed: bool,
    /// Id of the section or lecture the edit created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_id: Option<Uuid>,
    pub draft: DraftResponse,
}

impl EditResponse {
    pub fn new(changed: bool, created_id: Option<Uuid>, store: &WizardStore) -> Self {
        Self {
            changed,
            created_id,
            draft: store.into(),
        }
    }
}
