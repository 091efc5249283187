//! The API capability the facade is written against.
//!
//! [`DropletApi`] covers the five calls a jump host needs. [`ApiConnector`]
//! turns a token into a client, which lets the facade rebuild its client on
//! demand and lets tests swap in a fake backend.

use crate::Result;
use async_trait::async_trait;
use jumphost_core::config::ApiConfig;
use jumphost_doapi::{
    CreateDropletRequest, DoClient, DoClientBuilder, Droplet, DropletId, Image, SshKey,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Remote operations on images, droplets and ssh keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DropletApi: Send + Sync {
    /// Every image visible to the account, public ones included.
    async fn list_images(&self) -> Result<Vec<Image>>;

    /// Every droplet on the account.
    async fn list_droplets(&self) -> Result<Vec<Droplet>>;

    /// Create a droplet.
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet>;

    /// Delete a droplet by ID.
    async fn delete_droplet(&self, id: DropletId) -> Result<()>;

    /// Every ssh key on the account.
    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>>;
}

#[async_trait]
impl DropletApi for DoClient {
    async fn list_images(&self) -> Result<Vec<Image>> {
        DoClient::list_images(self).await
    }

    async fn list_droplets(&self) -> Result<Vec<Droplet>> {
        DoClient::list_droplets(self).await
    }

    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet> {
        DoClient::create_droplet(self, request).await
    }

    async fn delete_droplet(&self, id: DropletId) -> Result<()> {
        DoClient::delete_droplet(self, id).await
    }

    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        DoClient::list_ssh_keys(self).await
    }
}

/// Builds an API client from a token.
#[cfg_attr(test, mockall::automock)]
pub trait ApiConnector: Send + Sync {
    /// Create a new client authenticated with `token`.
    fn connect(&self, token: &SecretString) -> Result<Arc<dyn DropletApi>>;
}

/// Connector producing [`DoClient`]s.
#[derive(Debug, Clone, Default)]
pub struct DoConnector {
    config: ApiConfig,
}

impl DoConnector {
    /// Create a connector using the given API settings.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

impl ApiConnector for DoConnector {
    fn connect(&self, token: &SecretString) -> Result<Arc<dyn DropletApi>> {
        let token = SecretString::from(token.expose_secret().to_owned());
        let client = DoClientBuilder::from_config(&self.config, token)?.build()?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn do_connector_uses_configured_url() {
        let config = ApiConfig::new("http://127.0.0.1:1/v2").unwrap();
        let connector = DoConnector::new(config);
        let token = SecretString::from("dop_v1_test".to_string());
        assert!(connector.connect(&token).is_ok());
    }
}
