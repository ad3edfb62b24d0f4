//! Backend HTTP API: endpoint descriptors, the response envelope and the
//! transport that performs calls.

pub mod endpoints;
pub mod envelope;
pub mod errors;
pub mod transport;

pub use endpoints::{Endpoint, Method};
pub use envelope::Envelope;
pub use errors::ApiError;
pub use transport::*;
