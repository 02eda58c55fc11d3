use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use spark_core::CoreError;
use spark_types::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication token is missing")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid email/password")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailTaken,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Core(CoreError::Internal(e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::Core(e) => match e {
                CoreError::SelfSwipe
                | CoreError::DuplicateSwipe
                | CoreError::QuotaExceeded
                | CoreError::AlreadySubscribed => StatusCode::BAD_REQUEST,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Backend detail stays in the log
            ApiError::Core(CoreError::Internal(e)) => {
                error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Core(CoreError::SelfSwipe).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Core(CoreError::DuplicateSwipe).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Core(CoreError::QuotaExceeded).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Core(CoreError::AlreadySubscribed).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Core(CoreError::NotFound("User")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk on fire")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::Core(CoreError::DuplicateSwipe).to_string(),
            "You have already swiped on this user"
        );
        assert_eq!(ApiError::Core(CoreError::NotFound("User")).to_string(), "User not found");
    }
}
