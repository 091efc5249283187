//! # jumphost-core
//!
//! Shared building blocks for the jumphost crates.
//!
//! This crate holds the error type every other crate returns, the configuration
//! structures callers fill in before deploying a jump host, and the HTTP client
//! settings used by the DigitalOcean client.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP error conversions
//! - [`config`] - API and droplet configuration, including the droplet name template
//! - [`client`] - HTTP client timeouts and connection pool settings
//! - [`query`] - Page cursor and query pairs for paginated list endpoints

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use config::{ApiConfig, DropletConfig, JumpHostConfig, NameFormat};
pub use error::{Error, Result};
