//! Organization administration: read, rename, list and remove members.
//!
//! Mutations require the caller to hold an admin-or-owner membership in their
//! own organization. The caller's organization comes from the access token,
//! so an admin of one tenant can never act on another.

use crate::events::{AuthEvent, dispatch};
use crate::jwt::AuthContext;
use crate::repository::{AccountStore, AccountTransaction, AuditLog, Organization, OrganizationMember, User};
use crate::validators::validate_organization_name;
use crate::{AuthError, now_millis};

use super::require_admin;

pub struct GetOrganizationAction<S> {
    store: S,
}

impl<S: AccountStore> GetOrganizationAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn execute(&self, organization_id: &str) -> Result<Organization, AuthError> {
        let mut tx = self.store.begin().await?;
        tx.find_organization(organization_id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}

/// Renames the caller's organization. The slug keeps its original value.
pub struct UpdateOrganizationAction<S> {
    store: S,
}

impl<S: AccountStore> UpdateOrganizationAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        caller: &AuthContext,
        name: Option<&str>,
    ) -> Result<Organization, AuthError> {
        if let Some(name) = name {
            validate_organization_name(name)?;
        }

        let now = now_millis();
        let mut tx = self.store.begin().await?;
        require_admin(&mut tx, caller).await?;

        let mut organization = tx
            .find_organization(&caller.organization_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if let Some(name) = name {
            organization.name = name.trim().to_owned();
        }
        organization.updated_at = now;
        tx.update_organization(&organization).await?;
        tx.append_audit_log(
            &AuditLog::new("organization.updated", "organization", now)
                .by(&caller.user_id, &organization.id)
                .on(&organization.id),
        )
        .await?;
        tx.commit().await?;

        dispatch(AuthEvent::OrganizationUpdated {
            organization_id: organization.id.clone(),
            user_id: caller.user_id.clone(),
            at: now,
        })
        .await;

        Ok(organization)
    }
}

/// Live members of an organization with their accounts, oldest first.
pub struct ListMembersAction<S> {
    store: S,
}

impl<S: AccountStore> ListMembersAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        organization_id: &str,
    ) -> Result<Vec<(OrganizationMember, User)>, AuthError> {
        let mut tx = self.store.begin().await?;
        tx.list_members(organization_id).await
    }
}

/// Soft-deletes a membership in the caller's organization. The owner cannot
/// be removed.
pub struct RemoveMemberAction<S> {
    store: S,
}

impl<S: AccountStore> RemoveMemberAction<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_member", skip_all, err)
    )]
    pub async fn execute(&self, caller: &AuthContext, user_id: &str) -> Result<(), AuthError> {
        let now = now_millis();
        let mut tx = self.store.begin().await?;
        require_admin(&mut tx, caller).await?;

        let target = tx
            .find_member(&caller.organization_id, user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if target.role.is_owner() {
            log::warn!(target: "tenantry_auth", "msg=\"member removal rejected\", reason=\"owner\", organization_id=\"{}\"", caller.organization_id);
            return Err(AuthError::Forbidden);
        }

        tx.remove_member(&caller.organization_id, user_id, now).await?;
        tx.append_audit_log(
            &AuditLog::new("member.removed", "organization_member", now)
                .by(&caller.user_id, &caller.organization_id)
                .on(user_id),
        )
        .await?;
        tx.commit().await?;

        dispatch(AuthEvent::MemberRemoved {
            organization_id: caller.organization_id.clone(),
            user_id: user_id.to_owned(),
            removed_by: caller.user_id.clone(),
            at: now,
        })
        .await;

        log::info!(target: "tenantry_auth", "msg=\"member removed\", organization_id=\"{}\", user_id=\"{user_id}\"", caller.organization_id);

        Ok(())
    }
}
