pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod registry;
