pub mod coordination;
pub mod error;

pub use coordination::CoordinationClient;
pub use error::ServiceError;
pub use reqwest::Method;
