//! Page navigation over ordered sequences.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Direction for a page navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    First,
    Next,
    Previous,
}

/// Zero-based page cursor over an ordered sequence.
///
/// The paginator stores only the page size and current index; page count
/// is recomputed from whatever sequence length the caller passes in, so
/// a sequence that shrinks under the cursor clamps the index instead of
/// pointing past the end. Navigation never wraps: `next` at the last
/// page and `previous` at the first page are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// Creates a paginator at page 0, returning error if `page_size` is zero.
    pub fn new(page_size: usize) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::out_of_range(
                "page_size",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        Ok(Self {
            page_size,
            current_page: 0,
        })
    }

    /// Returns the fixed page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the current zero-based page index.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the number of pages for a sequence of `item_count` items.
    ///
    /// An empty sequence has zero pages.
    pub fn page_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size)
    }

    /// Moves to the first page.
    pub fn go_to_first(&mut self) {
        self.current_page = 0;
    }

    /// Resets to the first page. Must be called whenever the underlying
    /// sequence changes (new query or new filter).
    pub fn reset(&mut self) {
        self.current_page = 0;
    }

    /// Advances one page, clamped at the last page.
    pub fn next(&mut self, item_count: usize) {
        let last = self.page_count(item_count).saturating_sub(1);
        self.current_page = (self.current_page + 1).min(last);
    }

    /// Goes back one page, clamped at the first page.
    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    /// Clamps the current index to the last valid page of a sequence of
    /// `item_count` items.
    pub fn clamp(&mut self, item_count: usize) {
        let last = self.page_count(item_count).saturating_sub(1);
        self.current_page = self.current_page.min(last);
    }

    /// Returns the `[start, end)` item range of the current page.
    pub fn page_bounds(&self, item_count: usize) -> (usize, usize) {
        let start = (self.current_page * self.page_size).min(item_count);
        let end = (start + self.page_size).min(item_count);
        (start, end)
    }

    /// Returns the slice of `items` on the current page.
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.page_bounds(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_page_size() {
        assert!(Paginator::new(0).is_err());
        assert!(Paginator::new(1).is_ok());
    }

    #[test]
    fn page_count_is_ceiling_of_len_over_size() {
        let p = Paginator::new(5).unwrap();
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.page_count(1), 1);
        assert_eq!(p.page_count(5), 1);
        assert_eq!(p.page_count(6), 2);
        assert_eq!(p.page_count(11), 3);
    }

    #[test]
    fn next_advances_until_last_page_then_stops() {
        let mut p = Paginator::new(5).unwrap();
        p.next(12); // 3 pages
        assert_eq!(p.current_page(), 1);
        p.next(12);
        assert_eq!(p.current_page(), 2);
        p.next(12);
        assert_eq!(p.current_page(), 2);
    }

    #[test]
    fn previous_at_first_page_is_a_no_op() {
        let mut p = Paginator::new(5).unwrap();
        p.previous();
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn previous_steps_back_one_page() {
        let mut p = Paginator::new(5).unwrap();
        p.next(20);
        p.next(20);
        p.previous();
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn reset_returns_to_page_zero() {
        let mut p = Paginator::new(5).unwrap();
        p.next(20);
        p.next(20);
        p.reset();
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn clamp_pulls_index_back_when_sequence_shrinks() {
        let mut p = Paginator::new(5).unwrap();
        p.next(30);
        p.next(30);
        p.next(30); // page 3 of 6
        assert_eq!(p.current_page(), 3);

        p.clamp(7); // now only 2 pages
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn clamp_on_empty_sequence_returns_to_zero() {
        let mut p = Paginator::new(5).unwrap();
        p.next(30);
        p.clamp(0);
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn next_on_empty_sequence_stays_at_zero() {
        let mut p = Paginator::new(5).unwrap();
        p.next(0);
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn page_of_returns_the_expected_slice() {
        let items: Vec<u32> = (0..12).collect();
        let mut p = Paginator::new(5).unwrap();
        assert_eq!(p.page_of(&items), &[0, 1, 2, 3, 4]);

        p.next(items.len());
        assert_eq!(p.page_of(&items), &[5, 6, 7, 8, 9]);

        p.next(items.len());
        assert_eq!(p.page_of(&items), &[10, 11]);
    }

    #[test]
    fn page_of_empty_sequence_is_empty() {
        let items: Vec<u32> = Vec::new();
        let p = Paginator::new(5).unwrap();
        assert!(p.page_of(&items).is_empty());
    }

    #[test]
    fn page_bounds_never_exceed_item_count() {
        let mut p = Paginator::new(5).unwrap();
        p.next(12);
        p.next(12);
        let (start, end) = p.page_bounds(12);
        assert_eq!((start, end), (10, 12));
    }
}
