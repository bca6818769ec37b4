//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use domain::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Validated page request (1-indexed page, bounded page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub per_page: u64,
}

impl PaginationParams {
    /// Clamp into the accepted ranges.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset of the first item, or `None` when it is beyond what
    /// storage can address (SQL offsets are signed 64-bit).
    pub fn offset(&self) -> Option<u64> {
        self.page_index()
            .checked_mul(self.per_page)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    /// Zero-based page number, as SeaORM's paginator expects
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub per_page: u64,
    /// Number of matching users across all pages
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(params: PaginationParams, total: u64) -> Self {
        let PaginationParams { page, per_page } = params;
        let pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_for_25_items() {
        let first = PaginationMeta::new(PaginationParams::new(1, 10), 25);
        assert_eq!(first.pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = PaginationMeta::new(PaginationParams::new(3, 10), 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_meta_for_empty_table() {
        let meta = PaginationMeta::new(PaginationParams::default(), 0);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_page_past_the_end() {
        let meta = PaginationMeta::new(PaginationParams::new(9, 10), 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_params_are_clamped() {
        let params = PaginationParams::new(0, 1000);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationParams::new(1, 20).offset(), Some(0));
        assert_eq!(PaginationParams::new(3, 10).offset(), Some(20));
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(PaginationParams::new(i64::MAX as u64, 100).offset(), None);
        assert_eq!(PaginationParams::new(u64::MAX, 2).offset(), None);
    }

    #[test]
    fn test_meta_for_huge_page() {
        let meta = PaginationMeta::new(PaginationParams::new(i64::MAX as u64, 100), 25);
        assert_eq!(meta.pages, 1);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }
}
