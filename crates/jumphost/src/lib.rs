//! Jump host management on DigitalOcean.
//!
//! A jump host is a single droplet per region whose name is derived from a
//! template. [`DoApi`] wraps the API client and memoizes the image, droplet and
//! ssh key lists; [`DropletManager`] builds deploy/show/drop on top of it.
//!
//! ```no_run
//! use jumphost::{DoApi, DropletManager};
//! use jumphost_core::{ApiConfig, DropletConfig, NameFormat};
//!
//! # async fn run() -> jumphost_core::Result<()> {
//! let api = DoApi::new(ApiConfig::default()).with_token("dop_v1_0123456789abcdef");
//! let droplets = DropletConfig::new()
//!     .with_name_format(NameFormat::parse("jump-%s.your-do.host")?)
//!     .with_default_image_name("my_jump_host_image");
//!
//! let mut manager = DropletManager::new(api, droplets);
//! let state = manager.deploy("ams3", None).await?;
//! println!("{state}");
//! manager.drop("ams3").await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod api;
mod cache;
pub mod droplet;
pub mod facade;

pub use api::{ApiConnector, DoConnector, DropletApi};
pub use droplet::{DropletManager, DropletState};
pub use facade::DoApi;

/// Convenient result alias that reuses the core error type.
pub type Result<T> = jumphost_core::Result<T>;
