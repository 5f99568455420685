//! Shared library for the Thix invoice relay
//!
//! This library contains the plumbing used by the relay application:
//! - Environment configuration
//! - Error taxonomy and HTTP error responses
//! - The Thix provider HTTP client

pub mod config;
pub mod error;
pub mod service_client;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorResponse, Result};
pub use service_client::{ProviderReply, ServiceClient};
