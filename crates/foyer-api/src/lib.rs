//! # foyer-api
//!
//! Request/response contracts exposed to the route layer, independent of
//! transport.  Each handler takes a [`foyer_store::Database`] and a request
//! DTO, delegates to the store, and maps failures onto [`ApiError`] signals
//! (`status()` carries the HTTP-equivalent code).  Field names are camelCase
//! on the wire, matching what the board UI consumes.

pub mod handlers;

mod error;

pub use error::ApiError;
