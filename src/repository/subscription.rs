use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::one_month_after;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organization's binding to a plan for one billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub organization_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub current_period_start: i64,
    pub current_period_end: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Subscription {
    /// An active subscription whose period runs one calendar month from `now`.
    pub fn start(organization_id: &str, plan_id: &str, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_owned(),
            plan_id: plan_id.to_owned(),
            status: SubscriptionStatus::Active,
            current_period_start: now,
            current_period_end: one_month_after(now),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active && self.deleted_at.is_none()
    }

    pub fn cancel(&mut self, now: i64) {
        self.status = SubscriptionStatus::Cancelled;
        self.updated_at = now;
    }
}
