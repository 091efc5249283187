//! Single point of access to the DigitalOcean API.
//!
//! [`DoApi`] owns the token, the client built from it and one snapshot per
//! resource list. Lists are fetched on first use and kept until a caller asks
//! for a refresh; nothing is invalidated behind the caller's back.

use crate::api::{ApiConnector, DoConnector, DropletApi};
use crate::cache::CachedList;
use crate::Result;
use jumphost_core::config::ApiConfig;
use jumphost_core::Error;
use jumphost_doapi::{Droplet, Image, SshKey};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Memoizing facade over a [`DropletApi`] client.
pub struct DoApi {
    token: Option<SecretString>,
    connector: Box<dyn ApiConnector>,
    client: Option<Arc<dyn DropletApi>>,
    images: CachedList<Image>,
    droplets: CachedList<Droplet>,
    ssh_keys: CachedList<SshKey>,
}

impl DoApi {
    /// Create a facade that talks to DigitalOcean with the given settings.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_connector(Box::new(DoConnector::new(config)))
    }

    /// Create a facade on top of a custom connector.
    #[must_use]
    pub fn with_connector(connector: Box<dyn ApiConnector>) -> Self {
        Self {
            token: None,
            connector,
            client: None,
            images: CachedList::new(),
            droplets: CachedList::new(),
            ssh_keys: CachedList::new(),
        }
    }

    /// Builder-style [`set_token`](Self::set_token).
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Store the API token.
    ///
    /// The token is not validated; a bad token surfaces on the first request.
    /// An already cached client keeps its old token until
    /// [`client(true)`](Self::client) is called.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(SecretString::from(token.into()));
    }

    /// Returns true once a token has been set.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Return the cached client, building one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenNotSet`] without contacting the connector when no
    /// token is configured.
    pub fn client(&mut self, refresh: bool) -> Result<Arc<dyn DropletApi>> {
        let Some(token) = self.token.as_ref() else {
            return Err(Error::TokenNotSet);
        };

        if refresh {
            self.client = None;
        }
        if let Some(client) = &self.client {
            return Ok(Arc::clone(client));
        }

        debug!(refresh, "Building DigitalOcean client");
        let client = self.connector.connect(token)?;
        self.client = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Private (non-public) images.
    pub async fn images(&mut self, refresh: bool) -> Result<&[Image]> {
        if refresh {
            self.images.invalidate();
        }

        if !self.images.is_populated() {
            let client = self.client(false)?;
            let private: Vec<Image> = client
                .list_images()
                .await?
                .into_iter()
                .filter(|image| !image.public)
                .collect();
            debug!(refresh, count = private.len(), "Cached private images");
            return Ok(self.images.store(private));
        }

        Ok(self.images.get().unwrap_or_default())
    }

    /// All droplets on the account.
    pub async fn droplets(&mut self, refresh: bool) -> Result<&[Droplet]> {
        if refresh {
            self.droplets.invalidate();
        }

        if !self.droplets.is_populated() {
            let client = self.client(false)?;
            let droplets = client.list_droplets().await?;
            debug!(refresh, count = droplets.len(), "Cached droplets");
            return Ok(self.droplets.store(droplets));
        }

        Ok(self.droplets.get().unwrap_or_default())
    }

    /// All ssh keys on the account.
    pub async fn ssh_keys(&mut self, refresh: bool) -> Result<&[SshKey]> {
        if refresh {
            self.ssh_keys.invalidate();
        }

        if !self.ssh_keys.is_populated() {
            let client = self.client(false)?;
            let keys = client.list_ssh_keys().await?;
            debug!(refresh, count = keys.len(), "Cached ssh keys");
            return Ok(self.ssh_keys.store(keys));
        }

        Ok(self.ssh_keys.get().unwrap_or_default())
    }

    /// When the image snapshot was taken, if there is one.
    #[must_use]
    pub fn images_fetched_at(&self) -> Option<Instant> {
        self.images.fetched_at()
    }

    /// When the droplet snapshot was taken, if there is one.
    #[must_use]
    pub fn droplets_fetched_at(&self) -> Option<Instant> {
        self.droplets.fetched_at()
    }

    /// When the ssh key snapshot was taken, if there is one.
    #[must_use]
    pub fn ssh_keys_fetched_at(&self) -> Option<Instant> {
        self.ssh_keys.fetched_at()
    }
}
