// src/ui/mod.rs
mod details_screen;
mod form_screen;
mod layout;
mod list_screen;
mod modals;
mod status_bar;

// Re-export the main render function
pub use layout::render_ui;
