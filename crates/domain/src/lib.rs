//! # DevicePlat Domain
//!
//! Domain types shared by the DevicePlat SDK crates.
//!
//! This crate contains:
//! - The error taxonomy surfaced to SDK callers
//! - Configuration structures for the API client and OAuth flows
//! - API payload types used by the resource façades
//! - Domain constants (default endpoints, timeouts, retry policy)
//!
//! ## Architecture
//! - Depends only on `deviceplat-common` and serde/thiserror
//! - No I/O; everything networked lives in `deviceplat-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
