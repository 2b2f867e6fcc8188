use uuid::Uuid;

use crate::model::ResourceTyped;
use crate::quiz::QuizSession;
use crate::web::{AuthenticatedUser, UserRole, WebError, WebResult};

pub trait HasOwner: ResourceTyped {
    fn owner_id(&self) -> Uuid;
}

impl HasOwner for QuizSession {
    fn owner_id(&self) -> Uuid {
        self.owner()
    }
}

/// Owners reach their own resources; admins reach everything.
pub fn check_access<T: HasOwner>(user: &AuthenticatedUser, resource: &T) -> WebResult<()> {
    if user.user_role() == UserRole::Admin || resource.owner_id() == user.user_id() {
        Ok(())
    } else {
        Err(WebError::resource_forbidden(T::get_resource_type()))
    }
}
