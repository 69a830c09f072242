pub mod auth;
pub mod request_logging;

pub use auth::AuthMiddleware;
pub use request_logging::RequestLogging;
