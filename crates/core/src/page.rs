//! Shared pagination value object.

use serde::{Deserialize, Serialize};

/// One page of a larger result set.
///
/// `total` always reflects the unpaginated count, so callers can render
/// page controls without a second query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Slice a full result set into one page.
    ///
    /// `page` is 1-based. An out-of-range page yields an empty `items` with
    /// the correct `total`; it never panics.
    pub fn paginate(mut items: Vec<T>, page: u32, size: u32) -> Self {
        let total = items.len() as u64;
        if page == 0 || size == 0 {
            return Self {
                items: Vec::new(),
                total,
            };
        }
        let start = (page as usize - 1).saturating_mul(size as usize);
        if start >= items.len() {
            return Self {
                items: Vec::new(),
                total,
            };
        }
        let end = start.saturating_add(size as usize).min(items.len());
        let items = items.drain(start..end).collect();
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_one_based_pages() {
        let page = PageResult::paginate(vec![1, 2, 3, 4, 5], 2, 2);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn paginate_last_partial_page() {
        let page = PageResult::paginate(vec![1, 2, 3, 4, 5], 3, 2);
        assert_eq!(page.items, vec![5]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn paginate_out_of_range_is_empty_with_total() {
        let page = PageResult::paginate(vec![1, 2, 3], 9, 2);
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn paginate_zero_page_or_size_is_empty() {
        assert!(PageResult::paginate(vec![1, 2, 3], 0, 2).is_empty());
        assert!(PageResult::paginate(vec![1, 2, 3], 1, 0).is_empty());
    }
}
