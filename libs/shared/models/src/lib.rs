pub mod auth;
pub mod error;

pub use auth::Session;
pub use error::AppError;
