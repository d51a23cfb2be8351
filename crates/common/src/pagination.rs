//! Pagination utilities shared by the service and HTTP layers
//!
//! Provides a simple `Pagination` struct, helpers to normalize inputs and
//! the `Page<T>` envelope returned to callers.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index; 0 is treated as the first page
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new(page: u32, per_page: u32) -> Self { Self { page, per_page } }

    /// Clamp to sane defaults and convert to a zero-based `(page_idx, per_page)`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based index of this page
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Build a page from the normalized request and store totals.
    pub fn new(items: Vec<T>, opts: Pagination, total_items: u64) -> Self {
        let (page_idx, per_page) = opts.normalize();
        Self {
            items,
            page: page_idx + 1,
            per_page,
            total_items,
            total_pages: total_items.div_ceil(per_page),
        }
    }

    /// Slice an already ordered, complete result set.
    pub fn from_slice(all: &[T], opts: Pagination) -> Self
    where
        T: Clone,
    {
        let (page_idx, per_page) = opts.normalize();
        let items = all
            .iter()
            .skip((page_idx * per_page) as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        Self::new(items, opts, all.len() as u64)
    }
}
