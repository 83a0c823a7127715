//! Identity comes from a signed token issued elsewhere; this module only reads it.

mod jwt;
pub use jwt::{InstructorClaims, generate_token, process_token};
mod error;
pub use error::{CryptError, CryptResult};
