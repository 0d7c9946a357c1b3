//! Contract handlers.
//!
//! Each sub-module groups related request/response contracts by domain.
//! Handlers are plain functions over a [`foyer_store::Database`]; the route
//! layer that invokes them owns the transport.

pub mod messages;
pub mod schedule;
pub mod users;

use serde::{Deserialize, Serialize};

/// Generic mutation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
