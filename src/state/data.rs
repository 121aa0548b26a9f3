//! Shared data structures for the gallery state
//!
//! These structs represent the data model that flows between
//! the catalog layer, the gallery controller and the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category label that matches every card
pub const ALL_CATEGORIES: &str = "all";

/// Represents a single image card in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCard {
    /// Unique catalog ID
    pub id: i64,
    /// Category label used by the filter bar (e.g., "nature")
    pub category: String,
    /// Full path to the image shown in the lightbox
    pub source: String,
    /// Path to the cached grid thumbnail (None if not yet generated)
    pub thumbnail: Option<String>,
    /// Caption title
    pub title: String,
    /// Caption description (may be empty)
    pub description: String,
}

impl ImageCard {
    /// Path the grid should display: the thumbnail when cached, the source otherwise
    pub fn grid_source(&self) -> &str {
        self.thumbnail.as_deref().unwrap_or(&self.source)
    }
}

/// Active category filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub enum Filter {
    /// Show every card
    #[default]
    All,
    /// Show only cards whose category equals this label
    Category(String),
}

impl Filter {
    /// Parse a filter label; "all" (any case) or an empty label selects every card
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Filter::All
        } else {
            Filter::Category(label.to_string())
        }
    }

    /// Check whether a card belongs to this filter
    pub fn matches(&self, card: &ImageCard) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => card.category == *category,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL_CATEGORIES),
            Filter::Category(category) => f.write_str(category),
        }
    }
}

/// Lightbox navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}
