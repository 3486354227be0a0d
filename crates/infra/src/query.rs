//! Listing parameters and paged results.

use serde::{Deserialize, Serialize};

use rolegate_auth::{AccountStatus, RoleStatus};
use rolegate_core::RoleId;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: core::cmp::Ordering) -> core::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    UserName,
    Email,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    RoleName,
    Status,
}

/// 1-based page window. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// Cut one window out of an already filtered and sorted list.
    pub fn slice(sorted: Vec<T>, request: PageRequest) -> Self {
        let total = sorted.len();
        let items = sorted
            .into_iter()
            .skip(request.offset())
            .take(request.limit as usize)
            .collect();
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    pub fn total_pages(&self) -> u32 {
        (self.total as u32).div_ceil(self.limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountQuery {
    /// Case-insensitive substring of user name or email.
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub role_id: Option<RoleId>,
    pub sort_by: AccountSortKey,
    pub order: SortOrder,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    /// Case-insensitive substring of the role name.
    pub search: Option<String>,
    pub status: Option<RoleStatus>,
    pub sort_by: RoleSortKey,
    pub order: SortOrder,
    pub page: PageRequest,
}

pub(crate) fn matches_search(needle: Option<&str>, haystacks: &[&str]) -> bool {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn page_window_and_totals() {
        let page = Page::slice((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::slice(vec![1, 2, 3], PageRequest::new(5, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn request_is_clamped() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 0).limit(), 1);
    }

    #[test]
    fn sort_keys_use_camel_case() {
        let key: AccountSortKey = serde_json::from_str("\"userName\"").unwrap();
        assert_eq!(key, AccountSortKey::UserName);
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
    }

    #[test]
    fn search_is_case_insensitive_and_blank_matches_all() {
        assert!(matches_search(Some("ALI"), &["alice", "alice@example.com"]));
        assert!(!matches_search(Some("bob"), &["alice", "alice@example.com"]));
        assert!(matches_search(Some("  "), &["alice"]));
        assert!(matches_search(None, &["alice"]));
    }

    proptest! {
        #[test]
        fn pages_partition_the_list(len in 0usize..300, limit in 0u32..150) {
            let request = PageRequest::new(1, limit);
            let first = Page::slice((0..len).collect::<Vec<_>>(), request);
            let mut seen = Vec::new();
            for page in 1..=first.total_pages().max(1) {
                let slice = Page::slice((0..len).collect::<Vec<_>>(), PageRequest::new(page, limit));
                prop_assert!(slice.items.len() <= slice.limit as usize);
                prop_assert_eq!(slice.total, len);
                seen.extend(slice.items);
            }
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }
}
