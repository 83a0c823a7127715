use uuid::Uuid;

use crate::{
    model::error::{DatabaseError, DatabaseResult},
    web::AuthenticatedUser,
};

/// Anything that belongs to exactly one instructor.
pub trait HasOwner {
    fn owner_id(&self) -> Uuid;
}

pub fn check_access<T: HasOwner>(ctx: &AuthenticatedUser, resource: &T) -> DatabaseResult<()> {
    // admin can get all resources
    if ctx.is_admin() {
        return Ok(());
    }

    if resource.owner_id() == ctx.user_id() {
        Ok(())
    } else {
        Err(DatabaseError::Forbidden)
    }
}
