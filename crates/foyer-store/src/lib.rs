//! # foyer-store
//!
//! SQLite persistence for the Foyer household board.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed operations for every relation:
//! weekly schedule blocks, notices, read receipts, the unread counter, and
//! the household roster.  Migrations run before any other operation.

pub mod auth;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod schedule;
pub mod unread;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
