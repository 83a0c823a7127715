mod error;
pub use error::{CurriculumError, CurriculumResult};

mod id;
pub use id::{LectureId, SectionId};

mod lecture;
pub use lecture::{Lecture, LectureDraft, LecturePatch, LectureType, MAX_LECTURE_MINUTES};

mod mutation;
pub use mutation::CurriculumMutation;

pub(crate) mod ordered;

mod section;
pub use section::{Section, SectionPatch};

pub(crate) mod tree;
pub use tree::CurriculumTree;
