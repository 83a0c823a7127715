mod controller;
pub use controller::{
    CancelReason, DragController, DragKind, DragSession, DragSource, DragState, DropOutcome,
    DropTarget, InputSource,
};

mod error;
pub use error::{DragError, DragResult};

mod keyboard;
pub use keyboard::{Direction, drop_slots};
