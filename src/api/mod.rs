pub mod applicants;
pub mod client;
pub mod error;
pub mod token;
pub mod types;

pub use client::{ApiClient, ClientError};
pub use error::{ApiError, AuthError};
