//! Wire-level error payload shared by the client and server adapters

pub mod kinds;
pub mod media;
pub mod record;

pub use media::{negotiate, MediaType, APPLICATION_JSON, APPLICATION_XML};
pub use record::ErrorRecord;
