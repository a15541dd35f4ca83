//! The two role taxonomies and the checks built on them.
//!
//! System roles describe a user's privilege across the whole platform.
//! Organization roles describe a member's privilege inside one tenant. The two
//! are independent: a platform `admin` can be a plain `member` of their own
//! organization.
//!
//! Both taxonomies are closed enums. Role strings only exist at the storage
//! and wire boundary, and they pass through [`validate_system_role`] or
//! [`validate_org_role`] before they are used anywhere.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validators::ValidationError;

/// Storage form of a role.
pub trait Role: Copy + Send + Sync + 'static {
    /// Every variant, lowest privilege first.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;
}

/// Platform-level privilege, ascending: `user < support < admin < super_admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    #[default]
    User,
    Support,
    Admin,
    SuperAdmin,
}

impl SystemRole {
    pub fn is_system_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    pub fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn is_support(self) -> bool {
        matches!(self, Self::Support) || self.is_system_admin()
    }
}

impl Role for SystemRole {
    const ALL: &'static [Self] = &[Self::User, Self::Support, Self::Admin, Self::SuperAdmin];

    fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Support => "support",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "support" => Some(Self::Support),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }
}

/// Organization-level privilege, ascending: `member < admin < owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    #[default]
    Member,
    Admin,
    Owner,
}

impl OrgRole {
    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::Owner)
    }

    /// Any valid organization role counts as membership.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Member) || self.is_admin()
    }
}

impl Role for OrgRole {
    const ALL: &'static [Self] = &[Self::Member, Self::Admin, Self::Owner];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_system_role(value: &str) -> Result<SystemRole, ValidationError> {
    SystemRole::parse(value).ok_or_else(|| ValidationError::InvalidSystemRole(value.to_owned()))
}

pub fn validate_org_role(value: &str) -> Result<OrgRole, ValidationError> {
    OrgRole::parse(value).ok_or_else(|| ValidationError::InvalidOrganizationRole(value.to_owned()))
}
