pub mod credentials;
pub mod endpoint;
pub mod services;
pub mod template;

pub use credentials::{credentials_add, credentials_check, credentials_list};
pub use endpoint::endpoint;
pub use services::services;
