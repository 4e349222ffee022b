//! Ratatui front-end: one screen with the contact form on top and the live
//! contact list below.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use forms::{ContactDraft, DraftField, DraftMsg};
pub use terminal::run_app;
