use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info};

use rolegate_auth::account::{normalize_email, validate_email, validate_user_name};
use rolegate_auth::roles::validate_role_name;
use rolegate_auth::{
    Account, Directory, Permission, PermissionGrant, PermissionRef, Role, RoleRef, RoleStatus,
    StoreError,
};
use rolegate_core::{AccountId, DomainError, Entity, PermissionId, RoleId};

use super::{AccountChanges, ModuleAction, ModuleGroup, NewAccount, NewRole, RoleChanges, WriteError};
use crate::query::{AccountQuery, AccountSortKey, Page, RoleQuery, RoleSortKey, matches_search};

/// In-memory directory for dev and tests.
///
/// Locks are always taken in the order grants, roles, accounts. Entities are
/// never removed from the maps; deletion only sets their flag.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    grants: RwLock<HashMap<PermissionId, PermissionGrant>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    accounts: RwLock<HashMap<AccountId, Account>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
}

fn expand(role: &Role, grants: &HashMap<PermissionId, PermissionGrant>) -> Role {
    let mut expanded = role.clone();
    expanded.permissions = role
        .permissions
        .iter()
        .map(|reference| match grants.get(&reference.id()) {
            Some(grant) => PermissionRef::Expanded(grant.clone()),
            None => reference.clone(),
        })
        .collect();
    expanded
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Grants
    // ─────────────────────────────────────────────────────────────────────

    /// The live grant for `permission`, created if absent.
    pub fn ensure_grant(&self, permission: &Permission) -> Result<(PermissionGrant, bool), StoreError> {
        let mut grants = write(&self.grants)?;
        if let Some(existing) = grants
            .values()
            .find(|g| g.is_live() && g.is_same_pair(permission))
        {
            return Ok((existing.clone(), false));
        }
        let grant = PermissionGrant::new(permission.module(), permission.action(), Utc::now());
        grants.insert(grant.id, grant.clone());
        Ok((grant, true))
    }

    pub fn delete_grant(&self, id: &PermissionId) -> Result<(), WriteError> {
        let mut grants = write(&self.grants)?;
        match grants.get_mut(id).filter(|g| g.is_live()) {
            Some(grant) => {
                grant.is_deleted = true;
                grant.updated_at = Utc::now();
                info!(permission_id = %id, "grant soft-deleted");
                Ok(())
            }
            None => Err(DomainError::not_found("Permission").into()),
        }
    }

    /// Live grants sorted by module, then action.
    pub fn grants(&self) -> Result<Vec<PermissionGrant>, StoreError> {
        let grants = read(&self.grants)?;
        let mut live: Vec<PermissionGrant> = grants.values().filter(|g| g.is_live()).cloned().collect();
        live.sort_by(|a, b| {
            a.module_name
                .cmp(&b.module_name)
                .then_with(|| a.action.cmp(&b.action))
        });
        Ok(live)
    }

    pub fn grouped_grants(&self) -> Result<Vec<ModuleGroup>, StoreError> {
        let mut groups: BTreeMap<String, Vec<ModuleAction>> = BTreeMap::new();
        for grant in self.grants()? {
            groups.entry(grant.module_name).or_default().push(ModuleAction {
                id: grant.id,
                action: grant.action,
            });
        }
        Ok(groups
            .into_iter()
            .map(|(module_name, actions)| ModuleGroup { module_name, actions })
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────

    fn check_grant_ids(
        grants: &HashMap<PermissionId, PermissionGrant>,
        ids: &[PermissionId],
    ) -> Result<Vec<PermissionRef>, DomainError> {
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !grants.get(*id).is_some_and(|g| g.is_live()))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "Some permissions do not exist or are deleted: {}",
                missing.join(", ")
            )));
        }

        let mut refs: Vec<PermissionRef> = Vec::with_capacity(ids.len());
        for id in ids {
            if !refs.iter().any(|r| r.id() == *id) {
                refs.push(PermissionRef::Reference(*id));
            }
        }
        Ok(refs)
    }

    fn check_role_name(roles: &HashMap<RoleId, Role>, name: &str, except: Option<RoleId>) -> Result<(), DomainError> {
        let taken = roles
            .values()
            .any(|r| r.is_live() && Some(r.id) != except && r.has_name(name));
        if taken {
            return Err(DomainError::conflict("Role name already exists"));
        }
        Ok(())
    }

    pub fn create_role(&self, new: NewRole) -> Result<Role, WriteError> {
        let name = validate_role_name(&new.name)?;

        let grants = read(&self.grants)?;
        let permissions = Self::check_grant_ids(&grants, &new.permission_ids)?;
        let mut roles = write(&self.roles)?;
        Self::check_role_name(&roles, &name, None)?;

        let mut role = Role::new(name, Utc::now());
        role.status = new.status;
        role.permissions = permissions;
        roles.insert(role.id, role.clone());

        info!(role_id = %role.id, name = %role.name, "role created");
        Ok(expand(&role, &grants))
    }

    pub fn update_role(&self, id: &RoleId, changes: RoleChanges) -> Result<Role, WriteError> {
        let grants = read(&self.grants)?;
        let mut roles = write(&self.roles)?;
        if !roles.get(id).is_some_and(|r| r.is_live()) {
            return Err(DomainError::not_found("Role").into());
        }

        let name = changes.name.as_deref().map(validate_role_name).transpose()?;
        let permissions = changes
            .permission_ids
            .as_deref()
            .map(|ids| Self::check_grant_ids(&grants, ids))
            .transpose()?;
        if let Some(name) = &name {
            Self::check_role_name(&roles, name, Some(*id))?;
        }

        let role = roles
            .get_mut(id)
            .ok_or(DomainError::not_found("Role"))?;
        if let Some(name) = name {
            role.name = name;
        }
        if let Some(status) = changes.status {
            role.status = status;
        }
        if let Some(permissions) = permissions {
            role.permissions = permissions;
        }
        role.updated_at = Utc::now();

        info!(role_id = %id, status = %role.status, "role updated");
        Ok(expand(role, &grants))
    }

    /// Soft-delete. Accounts keep their link but gain nothing from it.
    pub fn delete_role(&self, id: &RoleId) -> Result<(), WriteError> {
        let mut roles = write(&self.roles)?;
        match roles.get_mut(id).filter(|r| r.is_live()) {
            Some(role) => {
                role.is_deleted = true;
                role.updated_at = Utc::now();
                info!(role_id = %id, "role soft-deleted");
                Ok(())
            }
            None => Err(DomainError::not_found("Role").into()),
        }
    }

    /// Find a live role by name (case-insensitive).
    pub fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let grants = read(&self.grants)?;
        let roles = read(&self.roles)?;
        Ok(roles
            .values()
            .find(|r| r.is_live() && r.has_name(name))
            .map(|r| expand(r, &grants)))
    }

    pub fn list_roles(&self, query: &RoleQuery) -> Result<Page<Role>, StoreError> {
        let grants = read(&self.grants)?;
        let roles = read(&self.roles)?;

        let mut matching: Vec<&Role> = roles
            .values()
            .filter(|r| r.is_live())
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .filter(|r| matches_search(query.search.as_deref(), &[r.name.as_str()]))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                RoleSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                RoleSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                RoleSortKey::RoleName => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                RoleSortKey::Status => a.status.to_string().cmp(&b.status.to_string()),
            };
            query.order.apply(ordering).then_with(|| a.id.cmp(&b.id))
        });

        Ok(Page::slice(matching, query.page).map(|r| expand(r, &grants)))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    fn check_assignable_role(roles: &HashMap<RoleId, Role>, id: &RoleId) -> Result<(), DomainError> {
        match roles.get(id) {
            Some(role) if role.is_live() && role.status == RoleStatus::Active => Ok(()),
            _ => Err(DomainError::validation("Invalid or inactive role")),
        }
    }

    fn check_account_unique(
        accounts: &HashMap<AccountId, Account>,
        email: Option<&str>,
        user_name: Option<&str>,
        except: Option<AccountId>,
    ) -> Result<(), DomainError> {
        let others = || {
            accounts
                .values()
                .filter(move |a| a.is_live() && Some(a.id) != except)
        };
        if let Some(email) = email {
            if others().any(|a| a.email == email) {
                return Err(DomainError::conflict("Email already exists"));
            }
        }
        if let Some(user_name) = user_name {
            if others().any(|a| a.user_name == user_name) {
                return Err(DomainError::conflict("Username already exists"));
            }
        }
        Ok(())
    }

    pub fn create_account(&self, new: NewAccount) -> Result<Account, WriteError> {
        let user_name = validate_user_name(&new.user_name)?;
        let email = validate_email(&new.email)?;

        let roles = read(&self.roles)?;
        let mut accounts = write(&self.accounts)?;
        Self::check_account_unique(&accounts, Some(&email), Some(&user_name), None)?;
        Self::check_assignable_role(&roles, &new.role_id)?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            user_name,
            email,
            password_hash: new.password_hash,
            status: new.status,
            role: RoleRef::Reference(new.role_id),
            hobbies: new.hobbies,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());

        info!(account_id = %account.id, role_id = %new.role_id, "account created");
        Ok(account)
    }

    pub fn update_account(&self, id: &AccountId, changes: AccountChanges) -> Result<Account, WriteError> {
        let user_name = changes.user_name.as_deref().map(validate_user_name).transpose()?;
        let email = changes.email.as_deref().map(validate_email).transpose()?;

        let roles = read(&self.roles)?;
        let mut accounts = write(&self.accounts)?;
        if !accounts.get(id).is_some_and(|a| a.is_live()) {
            return Err(DomainError::not_found("User").into());
        }
        Self::check_account_unique(&accounts, email.as_deref(), user_name.as_deref(), Some(*id))?;
        if let Some(role_id) = &changes.role_id {
            Self::check_assignable_role(&roles, role_id)?;
        }

        let account = accounts
            .get_mut(id)
            .ok_or(DomainError::not_found("User"))?;
        if let Some(user_name) = user_name {
            account.user_name = user_name;
        }
        if let Some(email) = email {
            account.email = email;
        }
        if let Some(hash) = changes.password_hash {
            account.password_hash = hash;
        }
        if let Some(role_id) = changes.role_id {
            account.role = RoleRef::Reference(role_id);
        }
        if let Some(status) = changes.status {
            account.status = status;
        }
        if let Some(hobbies) = changes.hobbies {
            account.hobbies = hobbies;
        }
        account.updated_at = Utc::now();

        info!(account_id = %id, "account updated");
        Ok(account.clone())
    }

    pub fn delete_account(&self, id: &AccountId) -> Result<(), WriteError> {
        let mut accounts = write(&self.accounts)?;
        match accounts.get_mut(id).filter(|a| a.is_live()) {
            Some(account) => {
                account.is_deleted = true;
                account.updated_at = Utc::now();
                info!(account_id = %id, "account soft-deleted");
                Ok(())
            }
            None => Err(DomainError::not_found("User").into()),
        }
    }

    pub fn list_accounts(&self, query: &AccountQuery) -> Result<Page<Account>, StoreError> {
        let accounts = read(&self.accounts)?;

        let mut matching: Vec<&Account> = accounts
            .values()
            .filter(|a| a.is_live())
            .filter(|a| query.status.is_none_or(|s| a.status == s))
            .filter(|a| query.role_id.is_none_or(|r| a.role_id() == r))
            .filter(|a| matches_search(query.search.as_deref(), &[a.user_name.as_str(), a.email.as_str()]))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                AccountSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                AccountSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                AccountSortKey::UserName => a.user_name.to_lowercase().cmp(&b.user_name.to_lowercase()),
                AccountSortKey::Email => a.email.cmp(&b.email),
                AccountSortKey::Status => a.status.to_string().cmp(&b.status.to_string()),
            };
            query.order.apply(ordering).then_with(|| a.id.cmp(&b.id))
        });

        debug!(total = matching.len(), "accounts listed");
        Ok(Page::slice(matching, query.page).map(Account::clone))
    }
}

impl Directory for InMemoryDirectory {
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = normalize_email(email);
        let accounts = read(&self.accounts)?;
        Ok(accounts
            .values()
            .find(|a| a.is_live() && a.email == email)
            .cloned())
    }

    fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = read(&self.accounts)?;
        Ok(accounts.get(id).filter(|a| a.is_live()).cloned())
    }

    fn find_role_by_id(&self, id: &RoleId) -> Result<Option<Role>, StoreError> {
        let grants = read(&self.grants)?;
        let roles = read(&self.roles)?;
        Ok(roles
            .get(id)
            .filter(|r| r.is_live())
            .map(|r| expand(r, &grants)))
    }

    fn find_permission_by_id(&self, id: &PermissionId) -> Result<Option<PermissionGrant>, StoreError> {
        let grants = read(&self.grants)?;
        Ok(grants.get(id).filter(|g| g.is_live()).cloned())
    }
}
