//! Tenant entities and the transactional store they live in.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Organization`] | A tenant with an immutable slug |
//! | [`User`] | An account with its credential and verification state |
//! | [`OrganizationMember`] | A user's role inside one organization |
//! | [`Plan`] | Catalog entry a subscription points at |
//! | [`Subscription`] | An organization's current billing period |
//! | [`AuditLog`] | Append-only action record |
//!
//! Implement [`AccountStore`] and [`AccountTransaction`] to plug in another
//! backend. Soft-deleted rows are filtered by each query on its own; there is
//! no global filter.
//!
//! Enable the `mocks` feature for [`MockAccountStore`], an in-memory store
//! with failure injection.

mod audit_log;
mod membership;
mod organization;
mod plan;
mod store;
mod subscription;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod store_mock;

pub use audit_log::AuditLog;
pub use membership::OrganizationMember;
pub use organization::{Organization, slugify};
pub use plan::{DEFAULT_PLAN_SLUG, Plan, default_catalog};
pub use store::{AccountStore, AccountTransaction};
pub use subscription::{Subscription, SubscriptionStatus};
pub use user::User;

#[cfg(any(test, feature = "mocks"))]
pub use store_mock::{FailPoint, MockAccountStore, MockState, MockTransaction};
