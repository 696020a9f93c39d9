mod http;
mod memory;

pub use http::HttpContentSource;
pub use memory::{Endpoint, MemoryContentSource};
