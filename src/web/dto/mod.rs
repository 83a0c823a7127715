mod curriculum;
pub use curriculum::{
    EditResponse, MoveAcrossBody, MoveWithinBody, ReorderSectionsBody,
};

mod drafts;
pub use drafts::{DraftResponse, SavedDraftSummary, SelectionBody, StepBody};

mod drag;
pub use drag::{DragHoverBody, DragNudgeBody, DragStartBody, DragStatus, DropResponse, DropStatus};
