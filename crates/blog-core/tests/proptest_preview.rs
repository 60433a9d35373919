// crates/blog-core/tests/proptest_preview.rs
// ============================================================================
// Module: Preview and Search Property-Based Tests
// Description: Property tests for text previews and search parsing.
// Purpose: Check truncation bounds and parse invariants across arbitrary text.
// ============================================================================

//! Property-based tests for preview truncation and search parsing.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use blog_core::ELLIPSIS;
use blog_core::PREVIEW_LIMIT;
use blog_core::SearchQuery;
use blog_core::TAG_PREFIX;
use blog_core::truncate_preview;
use proptest::prelude::*;

proptest! {
    #[test]
    fn preview_is_bounded_prefix(text in "\\PC{0,300}") {
        let preview = truncate_preview(&text);
        let chars = text.chars().count();
        if chars <= PREVIEW_LIMIT {
            prop_assert_eq!(&preview, &text);
        } else {
            prop_assert_eq!(preview.chars().count(), PREVIEW_LIMIT + 1);
            prop_assert!(preview.ends_with(ELLIPSIS));
            let body: String = preview.chars().take(PREVIEW_LIMIT).collect();
            prop_assert!(text.starts_with(&body));
        }
    }

    #[test]
    fn search_parts_are_lowercase_and_trimmed(search in "[ #a-zA-Z\u{00c0}-\u{00ff}]{0,80}") {
        let query = SearchQuery::parse(&search);
        prop_assert_eq!(query.title.trim(), query.title.as_str());
        prop_assert!(!query.title.contains("  "));
        prop_assert_eq!(query.title.to_lowercase(), query.title.clone());
        for tag in &query.tags {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(tag.to_lowercase(), tag.clone());
        }
    }

    #[test]
    fn every_tag_word_is_collected(words in prop::collection::vec("[a-z]{1,8}", 0 .. 6)) {
        let search: Vec<String> = words.iter().map(|word| format!("{TAG_PREFIX}{word}")).collect();
        let query = SearchQuery::parse(&search.join(" "));
        prop_assert!(query.title.is_empty());
        for word in &words {
            prop_assert!(query.tags.contains(word));
        }
    }
}
