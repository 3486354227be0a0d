use tracing::{info, warn};

use rolegate_core::Entity;

use crate::account::{validate_email, validate_password};
use crate::{Account, AuthError, Directory, PasswordHash, PasswordHasher};

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Confirms that an email/password pair belongs to an active account.
#[derive(Debug, Clone)]
pub struct CredentialVerifier<D> {
    directory: D,
    hasher: PasswordHasher,
    /// Checked against when no live account matches, so an unknown email
    /// costs the same bcrypt work as a wrong password.
    decoy: PasswordHash,
}

impl<D: Directory> CredentialVerifier<D> {
    pub fn new(directory: D, hasher: PasswordHasher) -> Self {
        let decoy = hasher.hash(DECOY_PASSWORD).unwrap_or_else(|e| {
            warn!(error = %e, "decoy hash unavailable; unknown emails will answer faster");
            PasswordHash::from_stored(String::new())
        });
        Self {
            directory,
            hasher,
            decoy,
        }
    }

    /// Verify credentials and return the matching account.
    ///
    /// Input shape is checked before any lookup. An unknown email and a wrong
    /// password fail identically; an inactive account fails with
    /// [`AuthError::AccountInactive`] whatever the password.
    pub fn verify(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        let email = validate_email(email)?;
        validate_password(password)?;

        let account = match self.directory.find_account_by_email(&email)? {
            Some(account) if account.is_live() => account,
            _ => {
                let _ = self.hasher.verify(password, &self.decoy);
                warn!(email = %email, "signin rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !account.is_active() {
            warn!(account_id = %account.id, "signin rejected: account inactive");
            return Err(AuthError::AccountInactive);
        }

        if !self.hasher.verify(password, &account.password_hash) {
            warn!(account_id = %account.id, "signin rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!(account_id = %account.id, "credentials verified");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use proptest::prelude::*;

    use super::*;
    use crate::AccountStatus;
    use crate::testing::FixtureDirectory;

    fn verifier(directory: &FixtureDirectory) -> CredentialVerifier<FixtureDirectory> {
        CredentialVerifier::new(directory.clone(), PasswordHasher::new(4))
    }

    #[test]
    fn correct_credentials_return_the_account() {
        let dir = FixtureDirectory::new();
        let role = dir.add_role("Viewer", &[]);
        let id = dir.add_account("alice@example.com", "secret123", role);

        let account = verifier(&dir).verify(" Alice@Example.com ", "secret123").unwrap();
        assert_eq!(account.id, id);
    }

    #[test]
    fn unknown_email_and_wrong_password_look_the_same() {
        let dir = FixtureDirectory::new();
        let role = dir.add_role("Viewer", &[]);
        dir.add_account("alice@example.com", "secret123", role);
        let v = verifier(&dir);

        let unknown = v.verify("bob@example.com", "secret123").unwrap_err();
        let wrong = v.verify("alice@example.com", "wrong-password").unwrap_err();
        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    fn fastest_of(runs: usize, mut attempt: impl FnMut()) -> Duration {
        (0..runs)
            .map(|_| {
                let started = Instant::now();
                attempt();
                started.elapsed()
            })
            .min()
            .unwrap()
    }

    #[test]
    fn decoy_hash_uses_the_configured_cost() {
        let dir = FixtureDirectory::new();
        let v = CredentialVerifier::new(dir, PasswordHasher::new(5));
        assert!(v.decoy.as_str().starts_with("$2b$05$"));
        assert!(!v.hasher.verify("secret123", &v.decoy));
    }

    #[test]
    fn unknown_email_costs_as_much_as_wrong_password() {
        let dir = FixtureDirectory::new();
        let role = dir.add_role("Viewer", &[]);
        dir.add_account("alice@example.com", "secret123", role);
        let deleted = dir.add_account("carol@example.com", "secret123", role);
        dir.delete_account(&deleted);
        let v = verifier(&dir);

        let wrong = fastest_of(5, || {
            let _ = v.verify("alice@example.com", "wrong-password");
        });
        let unknown = fastest_of(5, || {
            let _ = v.verify("bob@example.com", "wrong-password");
        });
        let gone = fastest_of(5, || {
            let _ = v.verify("carol@example.com", "wrong-password");
        });

        // Both miss paths run a full bcrypt verification; allow generous jitter.
        assert!(unknown * 3 >= wrong, "unknown {unknown:?} vs wrong {wrong:?}");
        assert!(gone * 3 >= wrong, "deleted {gone:?} vs wrong {wrong:?}");
    }

    #[test]
    fn deleted_account_cannot_sign_in() {
        let dir = FixtureDirectory::new();
        let role = dir.add_role("Viewer", &[]);
        let id = dir.add_account("alice@example.com", "secret123", role);
        dir.delete_account(&id);

        assert_eq!(
            verifier(&dir).verify("alice@example.com", "secret123"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn malformed_input_is_rejected_before_lookup() {
        let dir = FixtureDirectory::new();
        dir.fail_reads();
        let v = verifier(&dir);

        assert!(matches!(v.verify("", "secret123"), Err(AuthError::Validation(_))));
        assert!(matches!(v.verify("alice@example.com", ""), Err(AuthError::Validation(_))));
        assert!(matches!(v.verify("not-an-email", "secret123"), Err(AuthError::Validation(_))));
        assert!(matches!(v.verify("alice@example.com", "12345"), Err(AuthError::Validation(_))));
    }

    #[test]
    fn storage_failure_is_internal() {
        let dir = FixtureDirectory::new();
        dir.fail_reads();
        assert!(matches!(
            verifier(&dir).verify("alice@example.com", "secret123"),
            Err(AuthError::Internal(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn inactive_account_always_fails_inactive(password in "[a-zA-Z0-9]{6,16}", correct in any::<bool>()) {
            let dir = FixtureDirectory::new();
            let role = dir.add_role("Viewer", &[]);
            let id = dir.add_account("alice@example.com", "secret123", role);
            dir.set_account_status(&id, AccountStatus::Inactive);

            let attempt = if correct { "secret123".to_string() } else { password };
            prop_assert_eq!(
                verifier(&dir).verify("alice@example.com", &attempt),
                Err(AuthError::AccountInactive)
            );
        }
    }
}
