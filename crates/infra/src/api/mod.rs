//! Request pipeline for the device platform REST API
//!
//! `ApiClient` owns the transport and a token provider and runs every call
//! through the same sequence:
//!
//! - Build the URL from the base URL, path and query pairs
//! - Attach a fresh bearer token and the layered default headers
//! - Classify non-2xx responses into authentication, rate-limit and API
//!   errors
//! - Retry transient failures with `Retry-After` or jittered backoff

pub mod client;
pub mod request;
mod response;

pub use client::{ApiClient, ApiClientBuilder};
pub use request::{RequestBody, RequestOptions};
pub use reqwest::Method;
