mod draft;
pub use draft::{DraftRecord, DraftRecordCreate};
