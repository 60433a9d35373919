// crates/blog-core/src/core/pagination/tests.rs
// ============================================================================
// Module: Blog Pagination Tests
// Description: Unit tests for page arithmetic.
// Purpose: Pin last-page, flag, and bounds behavior.
// Dependencies: blog-core
// ============================================================================

//! ## Overview
//! Covers empty listings, exact and partial last pages, and rejected inputs.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use super::Page;
use super::PageRequest;
use crate::core::error::BlogError;

fn compute(page_number: i64, page_size: i64, total: u64) -> Result<Page, BlogError> {
    PageRequest::new(page_number, page_size)?.resolve(total)
}

#[test]
fn empty_listing_has_single_page() {
    let page = compute(1, 10, 0).unwrap();
    assert_eq!(page.last_page, 1);
    assert_eq!(page.offset, 0);
    assert!(!page.has_prev);
    assert!(!page.has_next);
}

#[test]
fn partial_last_page_rounds_up() {
    let page = compute(2, 10, 21).unwrap();
    assert_eq!(page.last_page, 3);
    assert_eq!(page.offset, 10);
    assert!(page.has_prev);
    assert!(page.has_next);
}

#[test]
fn exact_last_page_has_no_next() {
    let page = compute(2, 10, 20).unwrap();
    assert_eq!(page.last_page, 2);
    assert!(!page.has_next);
}

#[test]
fn page_past_end_is_bad_request() {
    let err = compute(3, 10, 20).unwrap_err();
    assert_eq!(
        err,
        BlogError::BadRequest("Requested page exceeds the total number of pages.".to_string())
    );
}

#[test]
fn page_two_of_empty_listing_is_bad_request() {
    assert!(matches!(compute(2, 5, 0), Err(BlogError::BadRequest(_))));
}

#[test]
fn non_positive_inputs_are_validation_errors() {
    assert!(matches!(compute(0, 10, 5), Err(BlogError::Validation(_))));
    assert!(matches!(compute(1, 0, 5), Err(BlogError::Validation(_))));
    assert!(matches!(compute(-4, 10, 5), Err(BlogError::Validation(_))));
}

#[test]
fn request_offset_saturates_for_huge_pages() {
    let request = PageRequest::new(i64::MAX, i64::MAX).unwrap();
    assert_eq!(request.offset, u64::MAX);
    assert!(matches!(request.resolve(10), Err(BlogError::BadRequest(_))));
}

#[test]
fn request_resolves_against_total() {
    let page = PageRequest::new(3, 4).unwrap().resolve(9).unwrap();
    assert_eq!(page.offset, 8);
    assert_eq!(page.last_page, 3);
    assert!(!page.has_next);
}
