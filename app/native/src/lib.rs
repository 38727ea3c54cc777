//! Startpage - the widget grid behind a personal browser start page.
//!
//! The board is a fixed grid of square cells holding rectangular widgets
//! that never overlap and never leave the grid. Widgets are placed at the
//! first free position, moved and resized with pointer gestures that show
//! a live preview, and committed only when the preview is valid.
//!
//! [`grid::Session`] owns one board and is the entry point for every
//! mutation. The library also provides the settings document and its
//! debounced persistence, configuration loading and the `startpage` CLI.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod persistence;
pub mod platform;
pub mod schema;
pub mod widgets;

pub use error::StartpageError;
pub use grid::{Session, SessionOptions};
