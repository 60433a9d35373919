// crates/blog-core/src/core/search.rs
// ============================================================================
// Module: Blog Search Parsing
// Description: Parses the free-form search string used by post listings.
// Purpose: Split a search into a title substring and a set of required tags.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Words prefixed with [`TAG_PREFIX`] select tags; every other word becomes
//! part of a case-insensitive title substring. `"#rust  Hello #Web world"`
//! yields tags `{rust, web}` and title `"hello world"`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

// ============================================================================
// SECTION: Search Query
// ============================================================================

/// Prefix marking a tag word in a search string.
pub const TAG_PREFIX: char = '#';

/// Parsed search filter.
///
/// # Invariants
/// - `title` is lower-case, words joined by single spaces.
/// - `tags` are lower-case, non-empty, without the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Title substring filter; empty matches every title.
    pub title: String,
    /// Tags a post must carry, all of them.
    pub tags: BTreeSet<String>,
}

impl SearchQuery {
    /// Parses a raw search string.
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let mut words = Vec::new();
        let mut tags = BTreeSet::new();
        for word in search.split_whitespace() {
            match word.strip_prefix(TAG_PREFIX) {
                Some(tag) if !tag.is_empty() => {
                    tags.insert(tag.to_lowercase());
                }
                _ => words.push(word.to_lowercase()),
            }
        }
        Self { title: words.join(" "), tags }
    }
}
