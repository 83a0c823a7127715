use thiserror::Error;

use crate::curriculum::{LectureId, SectionId};

pub type CurriculumResult<T> = std::result::Result<T, CurriculumError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurriculumError {
    #[error("section id {0} appears more than once")]
    DuplicateSectionId(SectionId),
    #[error("lecture id {0} appears more than once")]
    DuplicateLectureId(LectureId),
    #[error("section {section} has order {found}, expected {expected}")]
    SectionOrder {
        section: SectionId,
        expected: u32,
        found: u32,
    },
    #[error("lecture {lecture} has order {found}, expected {expected}")]
    LectureOrder {
        lecture: LectureId,
        expected: u32,
        found: u32,
    },
    #[error("lecture {lecture} points at section {found} but lives in {expected}")]
    BackReference {
        lecture: LectureId,
        expected: SectionId,
        found: SectionId,
    },
}
