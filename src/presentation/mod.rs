// Presentation layer - Read-only HTTP status surface
pub mod app_state;
pub mod handlers;
