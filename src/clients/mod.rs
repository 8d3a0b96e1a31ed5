pub mod http;
pub mod transport;

pub use http::HttpClient;
pub use transport::{RawResponse, Transport};
