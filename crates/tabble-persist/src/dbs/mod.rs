pub mod http;
pub mod memory;

pub use http::HttpPersistenceClient;
pub use memory::InMemoryPersistenceClient;
