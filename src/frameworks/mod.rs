// Frameworks layer: runtime bootstrap, configuration, and the store backend.

pub mod config;
pub mod server;
pub mod store;
