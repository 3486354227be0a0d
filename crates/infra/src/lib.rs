//! Infrastructure layer: persistence for accounts, roles and grants.

pub mod directory;
pub mod query;
pub mod seed;

pub use directory::{
    AccountChanges, InMemoryDirectory, ModuleAction, ModuleGroup, NewAccount, NewRole, RoleChanges,
    WriteError,
};
pub use query::{AccountQuery, AccountSortKey, Page, PageRequest, RoleQuery, RoleSortKey, SortOrder};
pub use seed::{SeedConfig, SeedReport, seed_defaults};
