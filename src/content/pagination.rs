//! Pagination over an ordered slice of items

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("per_page must be at least 1")]
    ZeroPerPage,
}

/// A window onto an ordered slice. Pages are 1-based; a page outside
/// the valid range yields an empty window rather than an error.
#[derive(Debug)]
pub struct Pagination<'a, T> {
    items: &'a [T],
    page: usize,
    per_page: usize,
}

impl<'a, T> Pagination<'a, T> {
    pub fn new(items: &'a [T], page: usize, per_page: usize) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPerPage);
        }
        Ok(Self {
            items,
            page,
            per_page,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// The items on this page
    pub fn items(&self) -> &'a [T] {
        if self.page == 0 {
            return &[];
        }
        let start = (self.page - 1).saturating_mul(self.per_page);
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.per_page).min(self.items.len());
        &self.items[start..end]
    }
}
