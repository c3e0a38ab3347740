//! UI layer for the desktop GUI: app shell, board view, grid view, theming.

pub mod app;
pub mod board;
pub mod grid;
pub mod theme;

pub use app::JourneyBoardApp;
