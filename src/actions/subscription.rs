use crate::events::{AuthEvent, dispatch};
use crate::jwt::AuthContext;
use crate::repository::{AccountStore, AccountTransaction, AuditLog, Plan, Subscription};
use crate::validators::require;
use crate::{AuthError, now_millis};

use super::require_admin;

/// The organization's active subscription and the plan behind it.
pub struct CurrentSubscriptionAction<S> {
    store: S,
}

impl<S: AccountStore> CurrentSubscriptionAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn execute(&self, organization_id: &str) -> Result<(Subscription, Plan), AuthError> {
        let mut tx = self.store.begin().await?;
        let subscription = tx
            .find_active_subscription(organization_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        let plan = tx
            .find_plan_by_id(&subscription.plan_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        Ok((subscription, plan))
    }
}

/// Moves the caller's organization to another plan.
///
/// The current subscription is cancelled and a new one starts now with a
/// fresh one-month period. Both writes share one transaction.
pub struct UpgradeSubscriptionAction<S> {
    store: S,
}

impl<S: AccountStore> UpgradeSubscriptionAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "upgrade_subscription", skip_all, err)
    )]
    pub async fn execute(
        &self,
        caller: &AuthContext,
        plan_id: &str,
    ) -> Result<(Subscription, Plan), AuthError> {
        require("plan_id", plan_id)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;
        require_admin(&mut tx, caller).await?;

        let plan = tx.find_plan_by_id(plan_id).await?.ok_or(AuthError::NotFound)?;
        let mut current = tx
            .find_active_subscription(&caller.organization_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        current.cancel(now);
        tx.update_subscription(&current).await?;

        let subscription = Subscription::start(&caller.organization_id, &plan.id, now);
        tx.create_subscription(&subscription).await?;
        tx.append_audit_log(
            &AuditLog::new("subscription.upgraded", "subscription", now)
                .by(&caller.user_id, &caller.organization_id)
                .on(&subscription.id)
                .with_details(format!("{} -> {}", current.plan_id, plan.slug)),
        )
        .await?;
        tx.commit().await?;

        dispatch(AuthEvent::SubscriptionUpgraded {
            organization_id: caller.organization_id.clone(),
            plan_id: plan.id.clone(),
            at: now,
        })
        .await;

        log::info!(target: "tenantry_auth", "msg=\"subscription upgraded\", organization_id=\"{}\", plan=\"{}\"", caller.organization_id, plan.slug);

        Ok((subscription, plan))
    }
}

/// Cancels the caller's active subscription. The organization is left with
/// none until it subscribes again.
pub struct CancelSubscriptionAction<S> {
    store: S,
}

impl<S: AccountStore> CancelSubscriptionAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cancel_subscription", skip_all, err)
    )]
    pub async fn execute(&self, caller: &AuthContext) -> Result<Subscription, AuthError> {
        let now = now_millis();
        let mut tx = self.store.begin().await?;
        require_admin(&mut tx, caller).await?;

        let mut subscription = tx
            .find_active_subscription(&caller.organization_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        subscription.cancel(now);
        tx.update_subscription(&subscription).await?;
        tx.append_audit_log(
            &AuditLog::new("subscription.cancelled", "subscription", now)
                .by(&caller.user_id, &caller.organization_id)
                .on(&subscription.id),
        )
        .await?;
        tx.commit().await?;

        dispatch(AuthEvent::SubscriptionCancelled {
            organization_id: caller.organization_id.clone(),
            at: now,
        })
        .await;

        Ok(subscription)
    }
}
