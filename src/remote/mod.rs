//! Remote status collaborators: query construction and the SSH transport

mod query;
mod transport;

pub use query::build_status_query;
pub use transport::{SshStatusSource, StaticStatusSource, StatusSource, TransportError};
