//! Shared types for the Tread analytics workspace
//!
//! Row models read from the storefront database, the unified error system,
//! and time helpers used by both the analytics engine and the admin server.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
