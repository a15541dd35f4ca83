//! End-to-end workflows against the `SQLite` store.
//!
//! Every test gets its own in-memory database.
//! Run with: `cargo test --test e2e_sqlite`

#![cfg(feature = "sqlx_sqlite")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use common::{count, dispatcher, hasher, setup_store, signer};
use tenantry::actions::{
    CurrentSubscriptionAction, GetOrganizationAction, ListMembersAction, LoginAction,
    LogoutAction, NewTenant, RefreshTokenAction, RegisterAction, RemoveMemberAction,
    ResendStatus, ResendVerificationAction, UpdateOrganizationAction, UpgradeSubscriptionAction,
    VerificationStatus, VerifyEmailAction, VerifyTokenAction,
};
use tenantry::sqlite::SqliteAccountStore;
use tenantry::{AuthContext, AuthError, Organization, User};

fn tenant(email: &str, organization_name: &str) -> NewTenant {
    NewTenant {
        name: "Jane".to_owned(),
        email: email.to_owned(),
        password: "pw123456".into(),
        organization_name: organization_name.to_owned(),
    }
}

async fn register(store: &SqliteAccountStore, email: &str, organization_name: &str) -> (User, Organization) {
    let (dispatcher, _) = dispatcher();
    RegisterAction::new(store.clone(), dispatcher)
        .with_hasher(hasher())
        .execute(&tenant(email, organization_name))
        .await
        .unwrap()
}

fn context(user: &User) -> AuthContext {
    AuthContext {
        user_id: user.id.clone(),
        email: user.email.clone(),
        organization_id: user.organization_id.clone(),
    }
}

#[tokio::test]
async fn test_register_provisions_every_row() {
    let (store, pool) = setup_store().await;
    let (dispatcher, notifier) = dispatcher();

    let (user, organization) = RegisterAction::new(store.clone(), dispatcher)
        .with_hasher(hasher())
        .execute(&tenant("jane@x.com", "Acme Corp"))
        .await
        .unwrap();

    assert_eq!(organization.slug, "acme-corp");
    assert_eq!(user.organization_id, organization.id);
    assert!(!user.email_verified);

    assert_eq!(count(&pool, "organizations").await, 1);
    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "organization_members").await, 1);
    assert_eq!(count(&pool, "subscriptions").await, 1);
    assert_eq!(count(&pool, "audit_logs").await, 1);

    let role: String = sqlx::query_scalar("SELECT role FROM organization_members WHERE user_id = ?")
        .bind(&user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "owner");

    let (_, plan) = CurrentSubscriptionAction::new(store)
        .execute(&organization.id)
        .await
        .unwrap();
    assert_eq!(plan.slug, "free");

    let token = notifier.token_for("jane@x.com", 1).await;
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn test_duplicate_email_creates_nothing() {
    let (store, pool) = setup_store().await;
    register(&store, "jane@x.com", "Acme").await;

    let (dispatcher, _) = dispatcher();
    let result = RegisterAction::new(store, dispatcher)
        .with_hasher(hasher())
        .execute(&tenant("jane@x.com", "Other Org"))
        .await;

    assert_eq!(result.unwrap_err(), AuthError::EmailConflict);
    assert_eq!(count(&pool, "organizations").await, 1);
    assert_eq!(count(&pool, "users").await, 1);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let (store, pool) = setup_store().await;
    register(&store, "jane@x.com", "Acme Corp").await;

    let (dispatcher, _) = dispatcher();
    let result = RegisterAction::new(store, dispatcher)
        .with_hasher(hasher())
        .execute(&tenant("max@y.com", "acme corp"))
        .await;

    assert_eq!(result.unwrap_err(), AuthError::SlugConflict);
    assert_eq!(count(&pool, "users").await, 1);
}

#[tokio::test]
async fn test_missing_free_plan_rolls_back_everything() {
    let (store, pool) = setup_store().await;
    sqlx::query("UPDATE plans SET is_active = 0 WHERE slug = 'free'")
        .execute(&pool)
        .await
        .unwrap();

    let (dispatcher, notifier) = dispatcher();
    let result = RegisterAction::new(store, dispatcher)
        .with_hasher(hasher())
        .execute(&tenant("jane@x.com", "Acme"))
        .await;

    assert_eq!(result.unwrap_err(), AuthError::DefaultPlanMissing);
    for table in ["organizations", "users", "organization_members", "subscriptions", "audit_logs"] {
        assert_eq!(count(&pool, table).await, 0, "{table} should be empty");
    }
    tokio::task::yield_now().await;
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_login_refresh_logout_cycle() {
    let (store, _) = setup_store().await;
    let (user, organization) = register(&store, "jane@x.com", "Acme").await;

    let login = LoginAction::new(store.clone(), signer())
        .with_hasher(hasher())
        .execute("jane@x.com", "pw123456")
        .await
        .unwrap();
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.user.id, user.id);

    let ctx = VerifyTokenAction::new(signer())
        .execute(login.access_token.expose_secret())
        .unwrap();
    assert_eq!(ctx.user_id, user.id);
    assert_eq!(ctx.organization_id, organization.id);

    let refresh = RefreshTokenAction::new(store.clone(), signer());
    let refreshed = refresh
        .execute(login.refresh_token.expose_secret())
        .await
        .unwrap();
    assert!(!refreshed.access_token.is_empty());

    LogoutAction::new(store.clone()).execute(&user.id).await.unwrap();

    assert_eq!(
        refresh
            .execute(login.refresh_token.expose_secret())
            .await
            .unwrap_err(),
        AuthError::InvalidRefreshToken
    );
}

#[tokio::test]
async fn test_second_login_replaces_refresh_token() {
    let (store, _) = setup_store().await;
    register(&store, "jane@x.com", "Acme").await;
    let login = LoginAction::new(store.clone(), signer()).with_hasher(hasher());

    let first = login.execute("jane@x.com", "pw123456").await.unwrap();
    let second = login.execute("jane@x.com", "pw123456").await.unwrap();

    let refresh = RefreshTokenAction::new(store, signer());
    assert_eq!(
        refresh
            .execute(first.refresh_token.expose_secret())
            .await
            .unwrap_err(),
        AuthError::InvalidRefreshToken
    );
    assert!(refresh.execute(second.refresh_token.expose_secret()).await.is_ok());
}

#[tokio::test]
async fn test_expired_refresh_token() {
    let (store, pool) = setup_store().await;
    register(&store, "jane@x.com", "Acme").await;
    let login = LoginAction::new(store.clone(), signer())
        .with_hasher(hasher())
        .execute("jane@x.com", "pw123456")
        .await
        .unwrap();

    sqlx::query("UPDATE users SET refresh_token_expires_at = 1")
        .execute(&pool)
        .await
        .unwrap();

    let result = RefreshTokenAction::new(store, signer())
        .execute(login.refresh_token.expose_secret())
        .await;
    assert_eq!(result.unwrap_err(), AuthError::RefreshTokenExpired);
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let (store, pool) = setup_store().await;
    let (dispatcher, notifier) = dispatcher();
    RegisterAction::new(store.clone(), dispatcher)
        .with_hasher(hasher())
        .execute(&tenant("jane@x.com", "Acme"))
        .await
        .unwrap();
    let token = notifier.token_for("jane@x.com", 1).await;

    let verify = VerifyEmailAction::new(store);
    assert_eq!(verify.execute(&token).await.unwrap(), VerificationStatus::Verified);
    assert_eq!(
        verify.execute(&token).await.unwrap_err(),
        AuthError::InvalidVerificationToken
    );

    let (verified, verified_at): (bool, Option<i64>) =
        sqlx::query_as("SELECT email_verified, email_verified_at FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(verified);
    assert!(verified_at.is_some());
}

#[tokio::test]
async fn test_resend_does_not_reveal_accounts() {
    let (store, _) = setup_store().await;
    let (dispatcher, notifier) = dispatcher();
    RegisterAction::new(store.clone(), dispatcher.clone())
        .with_hasher(hasher())
        .execute(&tenant("jane@x.com", "Acme"))
        .await
        .unwrap();
    let first_token = notifier.token_for("jane@x.com", 1).await;

    let resend = ResendVerificationAction::new(store.clone(), dispatcher);
    let known = resend.execute("jane@x.com").await.unwrap();
    let unknown = resend.execute("nobody@x.com").await.unwrap();
    assert_eq!(known, unknown);
    assert_eq!(known, ResendStatus::LinkSent);

    let second_token = notifier.token_for("jane@x.com", 2).await;
    assert_ne!(first_token, second_token);

    let verify = VerifyEmailAction::new(store.clone());
    assert_eq!(
        verify.execute(&first_token).await.unwrap_err(),
        AuthError::InvalidVerificationToken
    );
    verify.execute(&second_token).await.unwrap();

    assert_eq!(
        resend.execute("jane@x.com").await.unwrap(),
        ResendStatus::AlreadyVerified
    );
}

#[tokio::test]
async fn test_deleted_user_cannot_log_in() {
    let (store, pool) = setup_store().await;
    register(&store, "jane@x.com", "Acme").await;
    sqlx::query("UPDATE users SET deleted_at = 1")
        .execute(&pool)
        .await
        .unwrap();

    let result = LoginAction::new(store, signer())
        .with_hasher(hasher())
        .execute("jane@x.com", "pw123456")
        .await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_organization_administration() {
    let (store, pool) = setup_store().await;
    let (owner, organization) = register(&store, "jane@x.com", "Acme Corp").await;
    let caller = context(&owner);

    let renamed = UpdateOrganizationAction::new(store.clone())
        .execute(&caller, Some("Acme Industries"))
        .await
        .unwrap();
    assert_eq!(renamed.slug, "acme-corp");
    let fetched = GetOrganizationAction::new(store.clone())
        .execute(&organization.id)
        .await
        .unwrap();
    assert_eq!(fetched.name, "Acme Industries");

    // a second user joins as a plain member
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, system_role, email_verified, organization_id, created_at, updated_at) \
         VALUES ('bob', 'Bob', 'bob@x.com', 'hash', 'user', 0, ?, 1, 1)",
    )
    .bind(&organization.id)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role, joined_at) VALUES (?, 'bob', 'member', 9999999999999)",
    )
    .bind(&organization.id)
    .execute(&pool)
    .await
    .unwrap();

    let members = ListMembersAction::new(store.clone())
        .execute(&organization.id)
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].1.id, owner.id);
    assert_eq!(members[1].1.email, "bob@x.com");

    let remove = RemoveMemberAction::new(store.clone());
    assert_eq!(
        remove.execute(&caller, &owner.id).await.unwrap_err(),
        AuthError::Forbidden
    );
    remove.execute(&caller, "bob").await.unwrap();
    assert_eq!(remove.execute(&caller, "bob").await.unwrap_err(), AuthError::NotFound);

    let members = ListMembersAction::new(store).execute(&organization.id).await.unwrap();
    assert_eq!(members.len(), 1);
    // soft delete keeps the row
    assert_eq!(count(&pool, "organization_members").await, 2);
}

#[tokio::test]
async fn test_upgrade_subscription() {
    let (store, pool) = setup_store().await;
    let (owner, organization) = register(&store, "jane@x.com", "Acme").await;

    let (subscription, plan) = UpgradeSubscriptionAction::new(store.clone())
        .execute(&context(&owner), "550e8400-e29b-41d4-a716-446655440002")
        .await
        .unwrap();
    assert_eq!(plan.slug, "pro");
    assert!(subscription.current_period_end > subscription.current_period_start);

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE organization_id = ? AND status = 'active'",
    )
    .bind(&organization.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(active, 1);

    let (_, current) = CurrentSubscriptionAction::new(store)
        .execute(&organization.id)
        .await
        .unwrap();
    assert_eq!(current.slug, "pro");
}
