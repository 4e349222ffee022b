//! Core library surface for the Contact Book TUI application.
//!
//! The pieces are usable on their own: [`mask`] is a pure phone formatter,
//! [`store`] wraps the SQLite table with keyed upserts and change
//! subscriptions, and [`ui`] drives the terminal screen on top of both.
pub mod db;
pub mod logging;
pub mod mask;
pub mod models;
pub mod store;
pub mod ui;

/// Persistence entry points used by `main.rs` and tests.
pub use db::{data_dir, open_database};

pub use logging::init_logging;
pub use models::Contact;
pub use store::{RecordStore, Subscription};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
