use thiserror::Error;
use uuid::Uuid;

pub type DragResult<T> = std::result::Result<T, DragError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("a drag session is already in progress")]
    AlreadyDragging,
    #[error("no drag session in progress")]
    NotDragging,
    #[error("{0} is neither a section nor a lecture")]
    UnknownSource(Uuid),
}
