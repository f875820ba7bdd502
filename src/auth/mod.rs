// Public API - what other modules can use
pub use handlers::{signin, signup};
pub use middleware::jwt_auth;
pub use types::AuthenticatedUser;

// Internal modules
mod handlers;
mod middleware;
pub mod service;
pub mod token;
pub mod types;
