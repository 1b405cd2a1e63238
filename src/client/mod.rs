pub mod backend;
#[cfg(test)]
pub mod fake;
pub mod http;

pub use backend::{Backend, Endpoint};
pub use http::{BackendGateway, HttpBackend};
