mod error;
mod issue;
pub mod query;
mod rest;
pub mod search;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod version;

pub use error::{RetrievalError, TrackerError};
pub use issue::Issue;
pub use rest::JiraRestTransport;
pub use search::TrackerSearchClient;
pub use transport::TrackerTransport;
pub use version::{TrackerVersionClient, Version};
