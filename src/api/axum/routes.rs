use axum::Router;
use axum::routing::{delete, get, post};

use super::handlers;
use crate::crypto::Argon2Hasher;
use crate::jwt::TokenSigner;
use crate::notifier::NotificationDispatcher;
use crate::repository::AccountStore;

pub const API_PREFIX: &str = "/api/v1";

/// Everything a handler needs. Cloned per request; every field is a cheap
/// handle.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub signer: TokenSigner,
    pub dispatcher: NotificationDispatcher,
    pub hasher: Argon2Hasher,
}

impl<S: AccountStore + Clone> AppState<S> {
    pub fn new(store: S, signer: TokenSigner, dispatcher: NotificationDispatcher) -> Self {
        Self {
            store,
            signer,
            dispatcher,
            hasher: Argon2Hasher::default(),
        }
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: Argon2Hasher) -> Self {
        self.hasher = hasher;
        self
    }
}

/// Public auth routes plus the authenticated user, organization and
/// subscription routes. Paths are relative to [`API_PREFIX`].
pub fn api_routes<S>() -> Router<AppState<S>>
where
    S: AccountStore + Clone,
{
    let auth = Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .route("/refresh", post(handlers::refresh_token::<S>))
        .route("/verify-email", post(handlers::verify_email::<S>))
        .route("/resend-verification", post(handlers::resend_verification::<S>))
        .route("/logout", delete(handlers::logout::<S>));

    let users = Router::new().route(
        "/current",
        get(handlers::current_user::<S>).patch(handlers::update_user::<S>),
    );

    let organizations = Router::new()
        .route(
            "/current",
            get(handlers::current_organization::<S>).patch(handlers::update_organization::<S>),
        )
        .route("/members", get(handlers::list_members::<S>))
        .route("/members/{user_id}", delete(handlers::remove_member::<S>));

    let subscriptions = Router::new()
        .route("/current", get(handlers::current_subscription::<S>))
        .route("/upgrade", post(handlers::upgrade_subscription::<S>))
        .route("/cancel", post(handlers::cancel_subscription::<S>));

    Router::new()
        .nest("/auth", auth)
        .nest("/users", users)
        .nest("/organizations", organizations)
        .nest("/subscriptions", subscriptions)
}

pub fn probe_routes<S>() -> Router<AppState<S>>
where
    S: AccountStore + Clone,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready::<S>))
}

/// The complete application with state attached.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: AccountStore + Clone,
{
    Router::new()
        .nest(API_PREFIX, api_routes())
        .merge(probe_routes())
        .with_state(state)
}
