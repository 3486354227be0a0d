//! In-memory [`Directory`] for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use rolegate_core::{AccountId, PermissionId, RoleId};

use crate::{
    Account, AccountStatus, Directory, PasswordHasher, Permission, PermissionGrant, PermissionRef,
    Role, RoleRef, RoleStatus, StoreError,
};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    roles: HashMap<RoleId, Role>,
    grants: HashMap<PermissionId, PermissionGrant>,
    failing: bool,
}

/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub(crate) struct FixtureDirectory {
    state: Arc<Mutex<State>>,
}

impl FixtureDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Every read fails with [`StoreError::Unavailable`] from now on.
    pub fn fail_reads(&self) {
        self.with(|s| s.failing = true);
    }

    /// Active role holding `permissions`; grants are created on first use.
    pub fn add_role(&self, name: &str, permissions: &[Permission]) -> RoleId {
        self.with(|s| {
            let mut role = Role::new(name, Utc::now());
            for permission in permissions {
                let existing = s
                    .grants
                    .values()
                    .find(|g| g.is_same_pair(permission))
                    .map(|g| g.id);
                let id = existing.unwrap_or_else(|| {
                    let grant =
                        PermissionGrant::new(permission.module(), permission.action(), Utc::now());
                    let id = grant.id;
                    s.grants.insert(id, grant);
                    id
                });
                role.permissions.push(PermissionRef::Reference(id));
            }
            let id = role.id;
            s.roles.insert(id, role);
            id
        })
    }

    pub fn add_account(&self, email: &str, password: &str, role: RoleId) -> AccountId {
        let password_hash = PasswordHasher::new(4).hash(password).unwrap();
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            user_name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash,
            status: AccountStatus::Active,
            role: RoleRef::Reference(role),
            hobbies: Vec::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        let id = account.id;
        self.with(|s| s.accounts.insert(id, account));
        id
    }

    pub fn role(&self, id: &RoleId) -> Role {
        self.with(|s| s.roles[id].clone())
    }

    pub fn put_role(&self, role: Role) {
        self.with(|s| s.roles.insert(role.id, role));
    }

    pub fn grant(&self, id: &PermissionId) -> PermissionGrant {
        self.with(|s| s.grants[id].clone())
    }

    pub fn delete_account(&self, id: &AccountId) {
        self.with(|s| s.accounts.get_mut(id).unwrap().is_deleted = true);
    }

    pub fn set_account_status(&self, id: &AccountId, status: AccountStatus) {
        self.with(|s| s.accounts.get_mut(id).unwrap().status = status);
    }

    pub fn set_account_role(&self, id: &AccountId, role: RoleRef) {
        self.with(|s| s.accounts.get_mut(id).unwrap().role = role);
    }

    pub fn delete_role(&self, id: &RoleId) {
        self.with(|s| s.roles.get_mut(id).unwrap().is_deleted = true);
    }

    pub fn set_role_status(&self, id: &RoleId, status: RoleStatus) {
        self.with(|s| s.roles.get_mut(id).unwrap().status = status);
    }

    pub fn delete_grant(&self, permission: &Permission) {
        self.with(|s| {
            for grant in s.grants.values_mut().filter(|g| g.is_same_pair(permission)) {
                grant.is_deleted = true;
            }
        });
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> Option<T>) -> Result<Option<T>, StoreError> {
        self.with(|s| {
            if s.failing {
                Err(StoreError::Unavailable("fixture offline".into()))
            } else {
                Ok(f(s))
            }
        })
    }
}

impl Directory for FixtureDirectory {
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.read(|s| {
            s.accounts
                .values()
                .find(|a| !a.is_deleted && a.email == email)
                .cloned()
        })
    }

    fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        self.read(|s| s.accounts.get(id).filter(|a| !a.is_deleted).cloned())
    }

    fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        self.read(|s| s.roles.get(id).filter(|r| !r.is_deleted).cloned())
    }

    fn find_permission_by_id(&self, id: &PermissionId) -> Result<Option<PermissionGrant>, StoreError> {
        self.read(|s| s.grants.get(id).filter(|g| !g.is_deleted).cloned())
    }
}
