pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use builder::{configure, RequestDescriptor, RequestOptions};
pub use client::RestClient;
pub use config::{RestConfig, RestContext};
pub use error::TransportError;
pub use transport::{HttpTransport, Transport};
