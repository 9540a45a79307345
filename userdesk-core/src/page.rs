//! Pagination arithmetic and the paged result envelope.
//!
//! [`PaginationParams`] turns a 1-indexed page number and a page size into the
//! offset/limit pair a [`Query`](crate::query::Query) needs, and [`Page`] is what goes
//! back to the caller once the page has been fetched and the total counted.

use serde::{Deserialize, Serialize};

/// A single page of results plus the numbers needed to navigate the rest.
///
/// Serialized with camelCase keys:
///
/// ```json
/// { "page": 2, "limit": 5, "total": 12, "totalPages": 3, "data": [] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The page number (1-indexed).
    pub page: usize,
    /// The page size that was requested.
    pub limit: usize,
    /// Number of matching items across all pages.
    pub total: u64,
    /// `ceil(total / limit)`, zero when nothing matched.
    pub total_pages: u64,
    /// The items on this page.
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Maps every item on the page, keeping the navigation numbers.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Parameters for paginating through a result set.
///
/// Pages are 1-indexed and both numbers are always at least 1.
///
/// # Example
///
/// ```ignore
/// use userdesk_core::page::PaginationParams;
///
/// let params = PaginationParams::new(3, 20);
/// assert_eq!(params.offset(), 40);
/// assert_eq!(params.total_pages(41), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PaginationParams {
    /// The page number (1-indexed).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl PaginationParams {
    /// Creates new pagination parameters, clamping both numbers to at least 1.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page: page.max(1), per_page: per_page.max(1) }
    }

    /// Number of items to skip to reach this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of pages needed to hold `total` items.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page as u64)
    }

    /// Wraps a fetched page of items and the total match count into a [`Page`].
    pub fn page_of<T>(&self, data: Vec<T>, total: u64) -> Page<T> {
        Page {
            page: self.page,
            limit: self.per_page,
            total,
            total_pages: self.total_pages(total),
            data,
        }
    }
}
