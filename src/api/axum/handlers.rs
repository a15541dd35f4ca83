//! HTTP handlers. Each one builds its action from the shared state, runs it
//! and maps the result to a response view.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::error::AppError;
use super::middleware::{Authenticated, JsonBody};
use super::routes::AppState;
use crate::actions::{
    CancelSubscriptionAction, CurrentSubscriptionAction, GetOrganizationAction, GetUserAction,
    ListMembersAction, LoginAction, LogoutAction, NewTenant, RefreshTokenAction, RegisterAction,
    RemoveMemberAction, ResendVerificationAction, UpdateOrganizationAction, UpdateUserAction,
    UpgradeSubscriptionAction, UserChanges, VerifyEmailAction,
};
use crate::api::{
    HealthResponse, LoginRequest, LoginResponse, MemberResponse, MessageResponse,
    OrganizationResponse, ReadinessResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, RegisterResponse, ResendVerificationRequest, SubscriptionResponse,
    UpdateOrganizationRequest, UpdateUserRequest, UpgradeSubscriptionRequest, UserResponse,
    VerifyEmailRequest,
};
use crate::repository::AccountStore;

/// POST /api/v1/auth/register
pub async fn register<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = NewTenant {
        name: body.name,
        email: body.email,
        password: body.password,
        organization_name: body.organization_name,
    };

    let (user, organization) = RegisterAction::new(state.store, state.dispatcher)
        .with_hasher(state.hasher)
        .execute(&input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            organization: organization.into(),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = LoginAction::new(state.store, state.signer)
        .with_hasher(state.hasher)
        .execute(&body.email, body.password.expose_secret())
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/v1/auth/refresh
pub async fn refresh_token<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, AppError> {
    let outcome = RefreshTokenAction::new(state.store, state.signer)
        .execute(body.refresh_token.expose_secret())
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/v1/auth/verify-email
pub async fn verify_email<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status = VerifyEmailAction::new(state.store)
        .execute(body.token.expose_secret())
        .await?;

    Ok(Json(MessageResponse::new(status.message())))
}

/// POST /api/v1/auth/resend-verification
pub async fn resend_verification<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status = ResendVerificationAction::new(state.store, state.dispatcher)
        .execute(&body.email)
        .await?;

    Ok(Json(MessageResponse::new(status.message())))
}

/// DELETE /api/v1/auth/logout
pub async fn logout<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<MessageResponse>, AppError> {
    LogoutAction::new(state.store).execute(&caller.user_id).await?;

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// GET /api/v1/users/current
pub async fn current_user<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<UserResponse>, AppError> {
    let user = GetUserAction::new(state.store).execute(&caller.user_id).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/current
pub async fn update_user<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let changes = UserChanges {
        name: body.name,
        password: body.password,
    };

    let user = UpdateUserAction::new(state.store)
        .with_hasher(state.hasher)
        .execute(&caller.user_id, &changes)
        .await?;

    Ok(Json(user.into()))
}

/// GET /api/v1/organizations/current
pub async fn current_organization<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<OrganizationResponse>, AppError> {
    let organization = GetOrganizationAction::new(state.store)
        .execute(&caller.organization_id)
        .await?;
    Ok(Json(organization.into()))
}

/// PATCH /api/v1/organizations/current
pub async fn update_organization<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
    JsonBody(body): JsonBody<UpdateOrganizationRequest>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let organization = UpdateOrganizationAction::new(state.store)
        .execute(&caller, body.name.as_deref())
        .await?;
    Ok(Json(organization.into()))
}

/// GET /api/v1/organizations/members
pub async fn list_members<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = ListMembersAction::new(state.store)
        .execute(&caller.organization_id)
        .await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// DELETE /api/v1/organizations/members/{user_id}
pub async fn remove_member<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    RemoveMemberAction::new(state.store)
        .execute(&caller, &user_id)
        .await?;
    Ok(Json(MessageResponse::new("Member removed successfully")))
}

/// GET /api/v1/subscriptions/current
pub async fn current_subscription<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let current = CurrentSubscriptionAction::new(state.store)
        .execute(&caller.organization_id)
        .await?;
    Ok(Json(current.into()))
}

/// POST /api/v1/subscriptions/upgrade
pub async fn upgrade_subscription<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
    JsonBody(body): JsonBody<UpgradeSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let upgraded = UpgradeSubscriptionAction::new(state.store)
        .execute(&caller, &body.plan_id)
        .await?;
    Ok(Json(upgraded.into()))
}

/// POST /api/v1/subscriptions/cancel
pub async fn cancel_subscription<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
    Authenticated(caller): Authenticated,
) -> Result<Json<MessageResponse>, AppError> {
    CancelSubscriptionAction::new(state.store).execute(&caller).await?;
    Ok(Json(MessageResponse::new("Subscription cancelled successfully")))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}

/// GET /ready
///
/// 200 when the store answers a ping, 503 otherwise.
pub async fn ready<S: AccountStore + Clone>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ok".to_owned(),
                database: "connected".to_owned(),
            }),
        ),
        Err(e) => {
            log::warn!(target: "tenantry_auth", "msg=\"readiness check failed\", error=\"{e}\"");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable".to_owned(),
                    database: "disconnected".to_owned(),
                }),
            )
        }
    }
}
