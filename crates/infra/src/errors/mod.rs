//! Error conversions at the infrastructure boundary

mod conversions;

pub use conversions::{client_build_error, transport_error};
