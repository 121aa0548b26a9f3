//! Image gallery: a category-filtered grid of image cards with a lightbox
//! viewer, backed by a SQLite catalog.
//!
//! The [`state::Gallery`] controller holds all filter and lightbox state and
//! has no UI dependencies; [`app::GalleryApp`] routes iced messages to it.

pub mod app;
pub mod config;
pub mod error;
pub mod state;
pub mod thumbnail;
pub mod ui;
