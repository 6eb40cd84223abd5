//! Structured HTTP error payloads in both directions.
//!
//! - [`client`]: decode a non-2xx response body (`application/json` or
//!   `application/xml`) into an [`errors::ErrorRecord`] and rebuild the
//!   [`client::RemoteException`] the server declared, through an explicit
//!   [`client::ExceptionRegistry`].
//! - [`api`]: render request-validation failures as 400 responses whose
//!   [`errors::ErrorRecord`] body follows the request's `Accept` header.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod metrics;
