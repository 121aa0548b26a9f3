/// UI views
///
/// Pure projections of the gallery state into iced widgets:
/// - Filter bar, card grid and header (grid.rs)
/// - Lightbox overlay (lightbox.rs)

pub mod grid;
pub mod lightbox;
