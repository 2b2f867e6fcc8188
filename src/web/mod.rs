mod access;
pub use access::{HasOwner, check_access};

mod context;
pub use context::{AuthenticatedUser, RequestContext, UserRole};

mod error;
pub use error::{ErrorResponse, WebError, WebResult};

pub mod middlewares;

mod state;
pub use state::{AppState, SessionRegistry, SharedSession};

pub mod dto;
pub mod routes;

pub mod doc;
