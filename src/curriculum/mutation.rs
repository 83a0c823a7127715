use serde::{Deserialize, Serialize};

use crate::curriculum::{
    CurriculumTree, LectureDraft, LectureId, LecturePatch, SectionId, SectionPatch,
};

/// One structural edit of a [`CurriculumTree`], as a value.
///
/// Adds carry the id of the item they create so applying a mutation is
/// deterministic. Callers mint the id before dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CurriculumMutation {
    AddSection {
        section_id: SectionId,
        /// Initial title and description, applied in the same edit.
        #[serde(default)]
        patch: SectionPatch,
    },
    UpdateSection {
        section_id: SectionId,
        patch: SectionPatch,
    },
    DeleteSection {
        section_id: SectionId,
    },
    ReorderSections {
        order: Vec<SectionId>,
    },
    AddLecture {
        section_id: SectionId,
        lecture_id: LectureId,
        draft: LectureDraft,
    },
    UpdateLecture {
        lecture_id: LectureId,
        patch: LecturePatch,
    },
    DeleteLecture {
        lecture_id: LectureId,
    },
    MoveLectureWithinSection {
        section_id: SectionId,
        from_index: usize,
        to_index: usize,
    },
    MoveLectureAcrossSections {
        lecture_id: LectureId,
        from_section_id: SectionId,
        to_section_id: SectionId,
        target_index: usize,
    },
}

impl CurriculumMutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddSection { .. } => "add_section",
            Self::UpdateSection { .. } => "update_section",
            Self::DeleteSection { .. } => "delete_section",
            Self::ReorderSections { .. } => "reorder_sections",
            Self::AddLecture { .. } => "add_lecture",
            Self::UpdateLecture { .. } => "update_lecture",
            Self::DeleteLecture { .. } => "delete_lecture",
            Self::MoveLectureWithinSection { .. } => "move_lecture_within_section",
            Self::MoveLectureAcrossSections { .. } => "move_lecture_across_sections",
        }
    }
}

impl CurriculumTree {
    pub fn apply(&self, mutation: &CurriculumMutation) -> Self {
        match mutation {
            CurriculumMutation::AddSection { section_id, patch } => {
                // an existing id must not be patched through an add
                if self.is_section(*section_id) {
                    return self.clone();
                }
                self.add_section(*section_id).update_section(*section_id, patch)
            }
            CurriculumMutation::UpdateSection { section_id, patch } => {
                self.update_section(*section_id, patch)
            }
            CurriculumMutation::DeleteSection { section_id } => self.delete_section(*section_id),
            CurriculumMutation::ReorderSections { order } => self.reorder_sections(order),
            CurriculumMutation::AddLecture {
                section_id,
                lecture_id,
                draft,
            } => self.add_lecture(*section_id, *lecture_id, draft),
            CurriculumMutation::UpdateLecture { lecture_id, patch } => {
                self.update_lecture(*lecture_id, patch)
            }
            CurriculumMutation::DeleteLecture { lecture_id } => self.delete_lecture(*lecture_id),
            CurriculumMutation::MoveLectureWithinSection {
                section_id,
                from_index,
                to_index,
            } => self.move_lecture_within_section(*section_id, *from_index, *to_index),
            CurriculumMutation::MoveLectureAcrossSections {
                lecture_id,
                from_section_id,
                to_section_id,
                target_index,
            } => self.move_lecture_across_sections(
                *lecture_id,
                *from_section_id,
                *to_section_id,
                *target_index,
            ),
        }
    }
}
