//! Mortgage HTTP Client
//!
//! [`HttpCollectionClient`] implements the editor's store contract against the
//! mortgage collection REST API.
//!
//! # Overview
//!
//! - **HttpCollectionClient**: list, create, update and delete over JSON
//! - **HttpSetupError**: base URL and client construction failures
//!
//! Per-request failures come back as `mortgage_core::ClientError` so the
//! editor treats every store the same way.

#![warn(missing_docs)]

pub mod client;
pub mod error;
mod wire;

// Re-exports
pub use client::{HttpCollectionClient, RISK_SCORE_ATTRIBUTE};
pub use error::HttpSetupError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
