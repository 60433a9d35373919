// crates/blog-core/src/core/pagination.rs
// ============================================================================
// Module: Blog Pagination
// Description: Page arithmetic for post listings.
// Purpose: Validate page requests and derive offsets and navigation flags.
// Dependencies: crate::core::error
// ============================================================================

//! ## Overview
//! Pages are 1-based. An empty result still has one (empty) page, so page 1 is
//! always addressable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::error::BlogError;

// ============================================================================
// SECTION: Page
// ============================================================================

/// Computed page window for a listing.
///
/// # Invariants
/// - `1 <= number <= last_page`.
/// - `offset == (number - 1) * size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Requested page number.
    pub number: u64,
    /// Page size.
    pub size: u64,
    /// Number of rows to skip.
    pub offset: u64,
    /// Last page number.
    pub last_page: u64,
    /// True when a previous page exists.
    pub has_prev: bool,
    /// True when a following page exists.
    pub has_next: bool,
}

/// Validated page parameters before the matching total is known.
///
/// # Invariants
/// - `number >= 1` and `size >= 1`.
/// - `offset == (number - 1) * size`, saturating at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page number.
    pub number: u64,
    /// Page size.
    pub size: u64,
    /// Number of rows to skip.
    pub offset: u64,
}

impl PageRequest {
    /// Validates raw page parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] when `page_number` or `page_size` is below 1.
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, BlogError> {
        let number = positive(page_number, "pageNumber")?;
        let size = positive(page_size, "pageSize")?;
        Ok(Self { number, size, offset: (number - 1).saturating_mul(size) })
    }

    /// Resolves navigation for `total` matching rows.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::BadRequest`] when the page is past the last page.
    pub fn resolve(self, total: u64) -> Result<Page, BlogError> {
        let last_page = if total == 0 { 1 } else { total.div_ceil(self.size) };
        if self.number > last_page {
            return Err(BlogError::BadRequest(
                "Requested page exceeds the total number of pages.".to_string(),
            ));
        }
        Ok(Page {
            number: self.number,
            size: self.size,
            offset: self.offset,
            last_page,
            has_prev: self.number > 1,
            has_next: self.number < last_page,
        })
    }
}

/// Converts a raw page parameter into a positive value.
fn positive(raw: i64, field: &str) -> Result<u64, BlogError> {
    u64::try_from(raw)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| BlogError::Validation(format!("{field}: must be greater than or equal to 1")))
}

#[cfg(test)]
mod tests;
