// src/app.rs
mod actions;
pub mod form;
mod navigation_helpers;
pub mod state;

pub use form::FormField;
pub use state::{ActiveModal, App};
