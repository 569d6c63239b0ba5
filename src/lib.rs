pub mod api;
pub mod config;
pub mod feedback;
pub mod tui;
