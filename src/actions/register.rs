use crate::crypto::{Argon2Hasher, PasswordHasher, digest_token, generate_verification_token};
use crate::events::{AuthEvent, dispatch};
use crate::notifier::{NotificationDispatcher, VerificationEmail};
use crate::repository::{
    AccountStore, AccountTransaction, AuditLog, DEFAULT_PLAN_SLUG, Organization,
    OrganizationMember, Subscription, User,
};
use crate::roles::OrgRole;
use crate::validators::{
    validate_email, validate_name, validate_organization_name, validate_password,
};
use crate::{AuthError, SecretString, now_millis};

/// Signup input: the owner's account plus the organization they found.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub organization_name: String,
}

/// Provisions a tenant: organization, owner account, owner membership and a
/// subscription to the free plan, all in one transaction.
///
/// The verification email is queued only after the commit. Its delivery never
/// affects the result.
pub struct RegisterAction<S, H = Argon2Hasher> {
    store: S,
    hasher: H,
    dispatcher: NotificationDispatcher,
}

impl<S: AccountStore> RegisterAction<S> {
    pub fn new(store: S, dispatcher: NotificationDispatcher) -> Self {
        Self {
            store,
            hasher: Argon2Hasher::default(),
            dispatcher,
        }
    }
}

impl<S: AccountStore, H: PasswordHasher> RegisterAction<S, H> {
    pub fn with_hasher<H2: PasswordHasher>(self, hasher: H2) -> RegisterAction<S, H2> {
        RegisterAction {
            store: self.store,
            hasher,
            dispatcher: self.dispatcher,
        }
    }

    /// # Returns
    ///
    /// - `Ok((user, organization))` - tenant created and committed
    /// - `Err(AuthError::Validation(_))` - malformed input, nothing written
    /// - `Err(AuthError::EmailConflict)` - the email is taken
    /// - `Err(AuthError::SlugConflict)` - the derived slug is taken
    /// - `Err(AuthError::DefaultPlanMissing)` - no active free plan
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "register", skip_all, err)
    )]
    pub async fn execute(&self, input: &NewTenant) -> Result<(User, Organization), AuthError> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;
        validate_password(input.password.expose_secret())?;
        validate_organization_name(&input.organization_name)?;

        let now = now_millis();
        let mut tx = self.store.begin().await?;

        if tx.count_users_by_email(&input.email).await? > 0 {
            log::warn!(target: "tenantry_auth", "msg=\"registration rejected\", reason=\"email_taken\"");
            return Err(AuthError::EmailConflict);
        }

        let organization = Organization::new(&input.organization_name, now);
        if tx.count_organizations_by_slug(&organization.slug).await? > 0 {
            log::warn!(target: "tenantry_auth", "msg=\"registration rejected\", reason=\"slug_taken\", slug=\"{}\"", organization.slug);
            return Err(AuthError::SlugConflict);
        }
        tx.create_organization(&organization).await?;

        let password_hash = self.hasher.hash(input.password.expose_secret())?;
        let verification_token = generate_verification_token();
        let user = User::new(
            &input.name,
            &input.email,
            password_hash,
            &organization.id,
            digest_token(&verification_token),
            now,
        );
        tx.create_user(&user).await?;

        tx.create_member(&OrganizationMember::new(
            &organization.id,
            &user.id,
            OrgRole::Owner,
            now,
        ))
        .await?;

        let plan = tx
            .find_plan_by_slug(DEFAULT_PLAN_SLUG)
            .await?
            .ok_or_else(|| {
                log::error!(target: "tenantry_auth", "msg=\"default plan missing\", slug=\"{DEFAULT_PLAN_SLUG}\"");
                AuthError::DefaultPlanMissing
            })?;
        tx.create_subscription(&Subscription::start(&organization.id, &plan.id, now))
            .await?;

        tx.append_audit_log(
            &AuditLog::new("organization.provisioned", "organization", now)
                .by(&user.id, &organization.id)
                .on(&organization.id)
                .with_details(format!("plan={}", plan.slug)),
        )
        .await?;

        tx.commit().await?;

        self.dispatcher.dispatch(VerificationEmail {
            to: user.email.clone(),
            name: user.name.clone(),
            token: verification_token.into(),
        });

        dispatch(AuthEvent::OrganizationProvisioned {
            organization_id: organization.id.clone(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: now,
        })
        .await;
        dispatch(AuthEvent::EmailVerificationSent {
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: now,
        })
        .await;

        log::info!(
            target: "tenantry_auth",
            "msg=\"organization provisioned\", organization_id=\"{}\", slug=\"{}\"",
            organization.id,
            organization.slug
        );

        Ok((user, organization))
    }
}
