//! Built-in modules and actions guarded by the admin application.

use crate::Permission;

pub const MODULE_USERS: &str = "Users";
pub const MODULE_ROLES: &str = "Roles";

pub const USERS_CREATE: Permission = Permission::from_static(MODULE_USERS, "create");
pub const USERS_LIST: Permission = Permission::from_static(MODULE_USERS, "list");
pub const USERS_EXPORT: Permission = Permission::from_static(MODULE_USERS, "export");
pub const USERS_UPLOAD: Permission = Permission::from_static(MODULE_USERS, "upload");
pub const USERS_EDIT_SELF: Permission = Permission::from_static(MODULE_USERS, "edit_self");
pub const USERS_EDIT_ANY: Permission = Permission::from_static(MODULE_USERS, "edit_any");
pub const USERS_DELETE: Permission = Permission::from_static(MODULE_USERS, "delete");

pub const ROLES_CREATE: Permission = Permission::from_static(MODULE_ROLES, "create");
pub const ROLES_LIST: Permission = Permission::from_static(MODULE_ROLES, "list");
pub const ROLES_EDIT: Permission = Permission::from_static(MODULE_ROLES, "edit");
pub const ROLES_DELETE: Permission = Permission::from_static(MODULE_ROLES, "delete");

/// Every built-in grant, in seeding order.
pub fn all() -> Vec<Permission> {
    vec![
        USERS_CREATE,
        USERS_LIST,
        USERS_EXPORT,
        USERS_UPLOAD,
        USERS_EDIT_SELF,
        USERS_EDIT_ANY,
        USERS_DELETE,
        ROLES_CREATE,
        ROLES_LIST,
        ROLES_EDIT,
        ROLES_DELETE,
    ]
}
