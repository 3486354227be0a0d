use std::sync::Arc;

use tracing::info;

use rolegate_auth::{
    Account, AuthError, CredentialVerifier, Directory, Gate, PasswordHasher, Role, TokenService,
};
use rolegate_infra::{InMemoryDirectory, seed_defaults};

use crate::config::ApiConfig;

pub type SharedDirectory = Arc<InMemoryDirectory>;

/// Everything a handler needs, built once at startup.
pub struct AppServices {
    pub directory: SharedDirectory,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub gate: Gate<SharedDirectory>,
    pub verifier: CredentialVerifier<SharedDirectory>,
}

impl AppServices {
    /// The account's role when it still exists (inactive roles included).
    pub fn role_of(&self, account: &Account) -> Result<Option<Role>, AuthError> {
        Ok(self.directory.find_role_by_id(&account.role_id())?)
    }
}

pub fn build_services(config: &ApiConfig) -> Result<AppServices, AuthError> {
    let directory: SharedDirectory = Arc::new(InMemoryDirectory::new());
    let hasher = config.hasher();

    if let Some(seed) = &config.seed {
        let report = seed_defaults(&directory, &hasher, seed)?;
        info!(
            grants_created = report.grants_created,
            admin_created = report.admin_created,
            "directory seeded"
        );
    }

    Ok(AppServices {
        directory: directory.clone(),
        tokens: Arc::new(TokenService::new(config.token.clone())),
        hasher,
        gate: Gate::new(directory.clone()),
        verifier: CredentialVerifier::new(directory, hasher),
    })
}
