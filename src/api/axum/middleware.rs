use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::AppError;
use super::routes::AppState;
use crate::actions::VerifyTokenAction;
use crate::jwt::AuthContext;
use crate::repository::AccountStore;
use crate::validators::ValidationError;
use crate::AuthError;

/// Identity of the caller, taken from a verified `Authorization: Bearer`
/// access token. Extraction never touches the store.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

impl Authenticated {
    pub fn into_inner(self) -> AuthContext {
        self.0
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
    S: AccountStore + Clone,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(AppError(AuthError::Unauthenticated))?;

        VerifyTokenAction::new(state.signer.clone())
            .execute(token)
            .map(Authenticated)
            .map_err(AppError)
    }
}

/// JSON body whose rejections use the `ErrorResponse` envelope. Serde's
/// diagnostics are logged at debug level and never sent to the client.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                log::debug!(
                    target: "tenantry_auth",
                    "msg=\"request body rejected\", reason=\"{}\"",
                    rejection.body_text()
                );
                Err(AppError(AuthError::Validation(ValidationError::MalformedBody)))
            }
        }
    }
}
