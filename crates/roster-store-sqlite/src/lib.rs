//! SQLite backend for the roster loader.
//!
//! Wraps [`tokio_rusqlite`] so the single connection lives on its own thread
//! and every statement is issued in order from the caller's task.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
