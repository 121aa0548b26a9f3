/// State management module
///
/// This module handles all gallery state, including:
/// - The gallery controller: filter and lightbox navigation (gallery.rs)
/// - Shared data structures (data.rs)
/// - The SQLite catalog of cards (catalog.rs)
/// - Folder and manifest imports (import.rs, manifest.rs)

pub mod catalog;
pub mod data;
pub mod gallery;
pub mod import;
pub mod manifest;

pub use data::{Direction, Filter, ImageCard};
pub use gallery::{Gallery, Lightbox, LightboxView, NavigationKey};
