//! Idempotent bootstrap of the built-in grants, the Admin role and an admin account.

use tracing::info;

use rolegate_auth::{AccountStatus, AuthError, Directory, PasswordHasher, RoleStatus, catalog};
use rolegate_core::{AccountId, RoleId};

use crate::{InMemoryDirectory, NewAccount, NewRole, RoleChanges};

pub const ADMIN_ROLE_NAME: &str = "Admin";

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_user_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_user_name: "Admin".to_string(),
            admin_email: "admin@gmail.com".to_string(),
            admin_password: "Admin@123".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub grants_created: usize,
    pub admin_role: RoleId,
    pub admin_account: AccountId,
    pub admin_created: bool,
}

/// Seed the directory. Safe to run repeatedly.
///
/// The Admin role is re-activated and given every built-in grant on each run.
/// An existing admin account is left untouched.
pub fn seed_defaults(
    directory: &InMemoryDirectory,
    hasher: &PasswordHasher,
    config: &SeedConfig,
) -> Result<SeedReport, AuthError> {
    let mut grant_ids = Vec::new();
    let mut grants_created = 0;
    for permission in catalog::all() {
        let (grant, created) = directory.ensure_grant(&permission)?;
        if created {
            grants_created += 1;
        }
        grant_ids.push(grant.id);
    }
    info!(total = grant_ids.len(), created = grants_created, "module grants seeded");

    let admin_role = match directory.find_role_by_name(ADMIN_ROLE_NAME)? {
        Some(role) => directory
            .update_role(
                &role.id,
                RoleChanges {
                    status: Some(RoleStatus::Active),
                    permission_ids: Some(grant_ids),
                    ..Default::default()
                },
            )?,
        None => directory
            .create_role(NewRole {
                name: ADMIN_ROLE_NAME.to_string(),
                status: RoleStatus::Active,
                permission_ids: grant_ids,
            })?,
    };
    info!(role_id = %admin_role.id, "admin role holds every built-in grant");

    if let Some(existing) = directory.find_account_by_email(&config.admin_email)? {
        info!(account_id = %existing.id, "admin account already exists");
        return Ok(SeedReport {
            grants_created,
            admin_role: admin_role.id,
            admin_account: existing.id,
            admin_created: false,
        });
    }

    let account = directory
        .create_account(NewAccount {
            user_name: config.admin_user_name.clone(),
            email: config.admin_email.clone(),
            password_hash: hasher.hash(&config.admin_password)?,
            role_id: admin_role.id,
            status: AccountStatus::Active,
            hobbies: Vec::new(),
        })?;
    info!(account_id = %account.id, email = %account.email, "admin account created");

    Ok(SeedReport {
        grants_created,
        admin_role: admin_role.id,
        admin_account: account.id,
        admin_created: true,
    })
}
