//! Page window arithmetic and the paged result container

use crate::domain::{DomainError, DomainResult};

/// One page of `T` plus the paging metadata it was fetched with.
///
/// Built fresh by a repository for each request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Number of `T` in the store, independent of paging.
    pub total_items: u64,
    /// 1-based page that was requested.
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_items: u64, page_number: u64, page_size: u64) -> Self {
        Self {
            items,
            total_items,
            page_number,
            page_size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    /// Convert the items while keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

/// Largest offset or limit a store accepts; SQL backends bind both as `i64`.
pub const MAX_WINDOW_VALUE: u64 = i64::MAX as u64;

/// Offset/limit window for a 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// `offset = (page_number - 1) * page_size`, `limit = page_size`.
    ///
    /// Page numbers and sizes start at 1; zero is rejected rather than
    /// producing a negative or empty window. A page size above
    /// [`MAX_WINDOW_VALUE`] is rejected. An offset beyond it (or beyond
    /// `u64`) saturates to `u64::MAX`; see [`is_addressable`](Self::is_addressable).
    pub fn new(page_number: u64, page_size: u64) -> DomainResult<Self> {
        if page_number == 0 {
            return Err(DomainError::Validation(
                "page number must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        if page_size > MAX_WINDOW_VALUE {
            return Err(DomainError::Validation(format!(
                "page size must be at most {}",
                MAX_WINDOW_VALUE
            )));
        }

        let offset = (page_number - 1)
            .checked_mul(page_size)
            .unwrap_or(u64::MAX);

        Ok(Self {
            offset,
            limit: page_size,
        })
    }

    /// `false` when the offset lies past any row a store can hold; such a
    /// window is past the end and need not be queried.
    pub fn is_addressable(&self) -> bool {
        self.offset <= MAX_WINDOW_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        let window = PageWindow::new(1, 10).unwrap();
        assert_eq!(window, PageWindow { offset: 0, limit: 10 });
    }

    #[test]
    fn third_page_skips_two_pages() {
        let window = PageWindow::new(3, 10).unwrap();
        assert_eq!(window.offset, 20);
        assert_eq!(window.limit, 10);
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(matches!(
            PageWindow::new(0, 10),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn page_size_zero_is_rejected() {
        assert!(matches!(
            PageWindow::new(1, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        assert!(matches!(
            PageWindow::new(1, MAX_WINDOW_VALUE + 1),
            Err(DomainError::Validation(_))
        ));
        assert!(PageWindow::new(1, MAX_WINDOW_VALUE).is_ok());
    }

    #[test]
    fn offset_beyond_i64_is_not_addressable() {
        let window = PageWindow::new(1_000_000_000_000_000_001, 10).unwrap();
        assert!(!window.is_addressable());

        let overflow = PageWindow::new(u64::MAX, 3).unwrap();
        assert_eq!(overflow.offset, u64::MAX);
        assert!(!overflow.is_addressable());
    }

    #[test]
    fn offset_just_under_i64_max_is_addressable() {
        let window = PageWindow::new(922_337_203_685_477_581, 10).unwrap();
        assert_eq!(window.offset, 9_223_372_036_854_775_800);
        assert!(window.is_addressable());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PagedResult::new(vec![1, 2, 3, 4, 5], 25, 3, 10);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn empty_store_has_no_pages() {
        let page: PagedResult<u32> = PagedResult::new(vec![], 0, 1, 10);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = PagedResult::new(vec![1, 2], 12, 2, 10).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_items, 12);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 10);
    }
}
