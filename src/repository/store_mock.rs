use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{AuthError, now_millis};

use super::plan::default_catalog;
use super::store::{AccountStore, AccountTransaction};
use super::{AuditLog, Organization, OrganizationMember, Plan, Subscription, User};

/// Every row held by [`MockAccountStore`].
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub organizations: Vec<Organization>,
    pub users: Vec<User>,
    pub members: Vec<OrganizationMember>,
    pub plans: Vec<Plan>,
    pub subscriptions: Vec<Subscription>,
    pub audit_logs: Vec<AuditLog>,
}

/// A step at which [`MockAccountStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    CreateOrganization,
    CreateUser,
    CreateMember,
    FindPlan,
    CreateSubscription,
    AppendAuditLog,
    Commit,
}

/// In-memory store with real transaction semantics.
///
/// Each transaction works on a private copy of the state and swaps it in on
/// commit, so an abandoned transaction leaves nothing behind.
#[derive(Clone)]
pub struct MockAccountStore {
    state: Arc<Mutex<MockState>>,
    fail_point: Arc<Mutex<Option<FailPoint>>>,
}

impl Default for MockAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAccountStore {
    /// A store seeded with the default plan catalog.
    pub fn new() -> Self {
        Self::with_initial(MockState {
            plans: default_catalog(now_millis()),
            ..MockState::default()
        })
    }

    /// A store with no plans at all.
    pub fn without_plans() -> Self {
        Self::with_initial(MockState::default())
    }

    fn with_initial(state: MockState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            fail_point: Arc::new(Mutex::new(None)),
        }
    }

    /// Makes every later transaction fail at `point`. `None` clears it.
    pub fn fail_at(&self, point: Option<FailPoint>) {
        if let Ok(mut guard) = self.fail_point.lock() {
            *guard = point;
        }
    }

    /// A copy of the committed state.
    pub fn snapshot(&self) -> MockState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Mutates the committed state directly, outside any transaction.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> Option<R> {
        self.state.lock().ok().map(|mut state| f(&mut state))
    }
}

fn locked<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
    mutex
        .lock()
        .map_err(|_| AuthError::Internal("lock poisoned".to_owned()))
}

#[async_trait]
impl AccountStore for MockAccountStore {
    type Transaction = MockTransaction;

    async fn begin(&self) -> Result<MockTransaction, AuthError> {
        let working = locked(&self.state)?.clone();
        let fail_point = *locked(&self.fail_point)?;
        Ok(MockTransaction {
            shared: Arc::clone(&self.state),
            working,
            fail_point,
        })
    }

    async fn ping(&self) -> Result<(), AuthError> {
        locked(&self.state).map(|_| ())
    }
}

pub struct MockTransaction {
    shared: Arc<Mutex<MockState>>,
    working: MockState,
    fail_point: Option<FailPoint>,
}

impl MockTransaction {
    fn check(&self, point: FailPoint) -> Result<(), AuthError> {
        if self.fail_point == Some(point) {
            return Err(AuthError::DatabaseError(format!("injected failure at {point:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountTransaction for MockTransaction {
    async fn count_organizations_by_slug(&mut self, slug: &str) -> Result<u64, AuthError> {
        Ok(self.working.organizations.iter().filter(|o| o.slug == slug).count() as u64)
    }

    async fn create_organization(&mut self, organization: &Organization) -> Result<(), AuthError> {
        self.check(FailPoint::CreateOrganization)?;
        if self.working.organizations.iter().any(|o| o.slug == organization.slug) {
            return Err(AuthError::SlugConflict);
        }
        self.working.organizations.push(organization.clone());
        Ok(())
    }

    async fn find_organization(&mut self, id: &str) -> Result<Option<Organization>, AuthError> {
        Ok(self
            .working
            .organizations
            .iter()
            .find(|o| o.id == id && o.deleted_at.is_none())
            .cloned())
    }

    async fn update_organization(&mut self, organization: &Organization) -> Result<(), AuthError> {
        let row = self
            .working
            .organizations
            .iter_mut()
            .find(|o| o.id == organization.id && o.deleted_at.is_none())
            .ok_or(AuthError::NotFound)?;
        *row = organization.clone();
        Ok(())
    }

    async fn count_users_by_email(&mut self, email: &str) -> Result<u64, AuthError> {
        Ok(self.working.users.iter().filter(|u| u.email == email).count() as u64)
    }

    async fn create_user(&mut self, user: &User) -> Result<(), AuthError> {
        self.check(FailPoint::CreateUser)?;
        if self.working.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailConflict);
        }
        self.working.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_id(&mut self, id: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_user_by_refresh_token(
        &mut self,
        digest: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.refresh_token.as_deref() == Some(digest) && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_user_by_verification_token(
        &mut self,
        digest: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.verification_token.as_deref() == Some(digest) && u.deleted_at.is_none())
            .cloned())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), AuthError> {
        let row = self
            .working
            .users
            .iter_mut()
            .find(|u| u.id == user.id && u.deleted_at.is_none())
            .ok_or(AuthError::NotFound)?;
        *row = user.clone();
        Ok(())
    }

    async fn create_member(&mut self, member: &OrganizationMember) -> Result<(), AuthError> {
        self.check(FailPoint::CreateMember)?;
        let exists = self.working.members.iter().any(|m| {
            m.organization_id == member.organization_id && m.user_id == member.user_id
        });
        if exists {
            return Err(AuthError::DatabaseError("duplicate membership".to_owned()));
        }
        self.working.members.push(member.clone());
        Ok(())
    }

    async fn find_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>, AuthError> {
        Ok(self
            .working
            .members
            .iter()
            .find(|m| {
                m.organization_id == organization_id
                    && m.user_id == user_id
                    && m.deleted_at.is_none()
            })
            .cloned())
    }

    async fn list_members(
        &mut self,
        organization_id: &str,
    ) -> Result<Vec<(OrganizationMember, User)>, AuthError> {
        let users = &self.working.users;
        let mut members: Vec<_> = self
            .working
            .members
            .iter()
            .filter(|m| m.organization_id == organization_id && m.deleted_at.is_none())
            .filter_map(|m| {
                users
                    .iter()
                    .find(|u| u.id == m.user_id && u.deleted_at.is_none())
                    .map(|u| (m.clone(), u.clone()))
            })
            .collect();
        members.sort_by_key(|(m, _)| m.joined_at);
        Ok(members)
    }

    async fn remove_member(
        &mut self,
        organization_id: &str,
        user_id: &str,
        at: i64,
    ) -> Result<(), AuthError> {
        let row = self
            .working
            .members
            .iter_mut()
            .find(|m| {
                m.organization_id == organization_id
                    && m.user_id == user_id
                    && m.deleted_at.is_none()
            })
            .ok_or(AuthError::NotFound)?;
        row.deleted_at = Some(at);
        Ok(())
    }

    async fn find_plan_by_slug(&mut self, slug: &str) -> Result<Option<Plan>, AuthError> {
        self.check(FailPoint::FindPlan)?;
        Ok(self
            .working
            .plans
            .iter()
            .find(|p| p.slug == slug && p.is_active)
            .cloned())
    }

    async fn find_plan_by_id(&mut self, id: &str) -> Result<Option<Plan>, AuthError> {
        Ok(self
            .working
            .plans
            .iter()
            .find(|p| p.id == id && p.is_active)
            .cloned())
    }

    async fn create_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError> {
        self.check(FailPoint::CreateSubscription)?;
        self.working.subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn find_active_subscription(
        &mut self,
        organization_id: &str,
    ) -> Result<Option<Subscription>, AuthError> {
        Ok(self
            .working
            .subscriptions
            .iter()
            .filter(|s| s.organization_id == organization_id && s.is_active())
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), AuthError> {
        let row = self
            .working
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id && s.deleted_at.is_none())
            .ok_or(AuthError::NotFound)?;
        *row = subscription.clone();
        Ok(())
    }

    async fn append_audit_log(&mut self, entry: &AuditLog) -> Result<(), AuthError> {
        self.check(FailPoint::AppendAuditLog)?;
        self.working.audit_logs.push(entry.clone());
        Ok(())
    }

    async fn commit(self) -> Result<(), AuthError> {
        self.check(FailPoint::Commit)?;
        *locked(&self.shared)? = self.working;
        Ok(())
    }
}
