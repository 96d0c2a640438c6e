//! Port implementations

pub mod backend;

pub use backend::HttpBackend;
