//! Core types and trait definitions for the roster loader.
//!
//! This crate is free of database dependencies. It owns the domain model,
//! record decoding, the [`RosterStore`](store::RosterStore) abstraction and the
//! driving procedure that normalizes records into a store.

pub mod entity;
pub mod error;
pub mod loader;
pub mod record;
pub mod store;
pub mod verify;

pub use error::{Error, Result};
