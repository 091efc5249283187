//! DigitalOcean client and data models for jump host management.
//!
//! Provides strongly typed models and an asynchronous client for the parts of
//! the DigitalOcean v2 API a jump host needs: images, droplets and account
//! ssh keys.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{DoClient, DoClientBuilder};
pub use models::{
    CreateDropletRequest, Droplet, DropletId, DropletStatus, Image, ImageId, Links, Meta,
    NetworkAddress, Networks, Pages, Region, SshKey, SshKeyId,
};

/// Convenient result alias using the shared jump host error type.
pub type Result<T> = jumphost_core::Result<T>;
