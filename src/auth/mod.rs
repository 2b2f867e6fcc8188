//! Identity comes from bearer tokens minted by the external sign-in service.

mod jwt;
pub use jwt::{UserClaims, generate_token, process_token};
mod error;
pub use error::{AuthError, AuthResult};
