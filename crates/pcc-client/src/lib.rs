pub mod client;
pub mod config;
pub mod error;

pub use client::{HttpPolicyClient, PolicyClient, AUTHENTICATE_PATH, COMPLIANCE_CONTAINER_PATH};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
