use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::AuthError,
    error::log_error,
    model::ResourceType,
    progress::StoreError,
    quiz::{QuizError, ValidationError},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationTokenInvalid, source: {source_name}. Error: {error}")]
    AuthenticationTokenInvalid {
        source_name: &'static str,
        error: AuthError,
    },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceForbidden: {resource_type:?}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("SessionValidation: {0}")]
    SessionValidation(#[from] ValidationError),

    #[error("SessionInvalidTransition: cannot {action} while in {state}")]
    SessionInvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationTokenInvalid { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationTokenInvalid { .. } => {
                String::from("Authentication error, token invalid or expired.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { error, .. } if error.is_retryable() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceForbidden { .. } => String::from("Resource error, resource forbidden."),
            Self::ResourceFetchError { error, .. } if error.is_retryable() => {
                String::from("Progress storage is unavailable, please retry.")
            }
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
        }
    }
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SessionInvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::SessionValidation(e) => format!("Invalid answer: {e}."),
            Self::SessionInvalidTransition { action, state } => {
                format!("Quiz error, cannot {action} while in {state}.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("SessionError - {0}")]
    SessionError(#[from] SessionError),
}

impl From<QuizError> for WebError {
    fn from(error: QuizError) -> Self {
        match error {
            QuizError::Validation(e) => SessionError::SessionValidation(e).into(),
            QuizError::InvalidTransition { action, state } => {
                SessionError::SessionInvalidTransition { action, state }.into()
            }
            QuizError::Storage(e) => Self::resource_fetch_error(ResourceType::Progress, e),
        }
    }
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: StoreError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn auth_token_invalid(source_name: &'static str, error: AuthError) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationTokenInvalid {
            source_name,
            error,
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::SessionError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::SessionError(e) => e.client_display(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quiz_errors_map_to_status() {
        let validation: WebError = QuizError::Validation(ValidationError::EmptyAnswer).into();
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let transition: WebError = QuizError::InvalidTransition {
            action: "submit",
            state: "content",
        }
        .into();
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);

        let offline: WebError =
            QuizError::Storage(StoreError::StorageUnavailable("down".into())).into();
        assert_eq!(offline.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let corrupted: WebError = QuizError::Storage(StoreError::Corrupted("bad".into())).into();
        assert_eq!(corrupted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
