use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AuthError;
use crate::api::ErrorResponse;

/// converts `AuthError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::Validation(_) | AuthError::InvalidVerificationToken => {
                StatusCode::BAD_REQUEST
            }
            AuthError::EmailConflict | AuthError::SlugConflict => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshTokenExpired
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::DefaultPlanMissing
            | AuthError::PasswordHashError
            | AuthError::DatabaseError(_)
            | AuthError::ConfigurationError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_internal() {
            log::error!(target: "tenantry_auth", "msg=\"request failed\", error=\"{}\"", self.0);
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
