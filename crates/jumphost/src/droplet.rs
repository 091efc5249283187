//! Jump host lifecycle: deploy, show and drop one droplet per region.

use crate::facade::DoApi;
use crate::Result;
use jumphost_core::config::{DropletConfig, NameFormat};
use jumphost_core::Error;
use jumphost_doapi::{CreateDropletRequest, Droplet, DropletStatus, ImageId};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Observable state of a jump host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropletState {
    /// Lifecycle status reported by the API.
    pub status: DropletStatus,
    /// Public IPv4 address, absent while the droplet is still provisioning.
    pub public_ip: Option<Ipv4Addr>,
}

impl From<&Droplet> for DropletState {
    fn from(droplet: &Droplet) -> Self {
        Self {
            status: droplet.status,
            public_ip: droplet.public_ipv4(),
        }
    }
}

impl fmt::Display for DropletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.public_ip {
            Some(ip) => write!(f, "{} {ip}", self.status),
            None => write!(f, "{} -", self.status),
        }
    }
}

/// Manages jump hosts named after a [`NameFormat`] template.
pub struct DropletManager {
    api: DoApi,
    config: DropletConfig,
}

impl DropletManager {
    /// Create a manager on top of an API facade.
    #[must_use]
    pub fn new(api: DoApi, config: DropletConfig) -> Self {
        Self { api, config }
    }

    /// Replace the naming template.
    pub fn set_name_format(&mut self, format: NameFormat) {
        self.config.name_format = Some(format);
    }

    /// Replace or clear the fallback image name.
    pub fn set_default_image_name(&mut self, name: Option<String>) {
        self.config.default_image_name = name;
    }

    /// Current droplet settings.
    #[must_use]
    pub fn config(&self) -> &DropletConfig {
        &self.config
    }

    /// The underlying facade.
    #[must_use]
    pub fn api(&self) -> &DoApi {
        &self.api
    }

    /// Mutable access to the facade, e.g. to rotate the token.
    pub fn api_mut(&mut self) -> &mut DoApi {
        &mut self.api
    }

    /// Create the jump host for `region` and return its state.
    ///
    /// The existence check runs against the cached droplet list, so a droplet
    /// created elsewhere after the last fetch is not seen. The returned state
    /// comes from a fresh listing; the API may not list a new droplet right
    /// away, in which case this fails with [`Error::NotDeployed`].
    ///
    /// # Errors
    ///
    /// [`Error::NameFormatNotSet`], [`Error::Exists`],
    /// [`Error::NoImageFound`], or any API error.
    pub async fn deploy(
        &mut self,
        region: &str,
        image_name: Option<&str>,
    ) -> Result<DropletState> {
        let name = self.name(region)?;

        if self.find(&name, false).await?.is_some() {
            return Err(Error::Exists(name));
        }

        let image = self.find_image(image_name).await?;
        let ssh_keys = self
            .api
            .ssh_keys(false)
            .await?
            .iter()
            .map(|key| key.id)
            .collect();

        let request = CreateDropletRequest {
            name: name.clone(),
            region: region.to_string(),
            size: self.config.size.clone(),
            image,
            ssh_keys,
        };

        info!(name = %name, region, image, size = %request.size, "Deploying jump host");
        self.api.client(false)?.create_droplet(&request).await?;

        self.show(region).await
    }

    /// Look up the jump host for `region` in a freshly fetched droplet list.
    ///
    /// # Errors
    ///
    /// [`Error::NameFormatNotSet`], [`Error::NotDeployed`], or any API error.
    pub async fn show(&mut self, region: &str) -> Result<DropletState> {
        let name = self.name(region)?;
        match self.find(&name, true).await? {
            Some(droplet) => Ok(DropletState::from(droplet)),
            None => Err(Error::NotDeployed(name)),
        }
    }

    /// Delete the jump host for `region`.
    ///
    /// The lookup uses the cached droplet list and the cache is left as is
    /// afterwards; call `show` or refresh the facade to observe the deletion.
    ///
    /// # Errors
    ///
    /// [`Error::NameFormatNotSet`], [`Error::NotDeployed`], or any API error.
    pub async fn drop(&mut self, region: &str) -> Result<()> {
        let name = self.name(region)?;
        let Some(id) = self.find(&name, false).await?.map(|droplet| droplet.id) else {
            return Err(Error::NotDeployed(name));
        };

        info!(name = %name, id, "Dropping jump host");
        self.api.client(false)?.delete_droplet(id).await
    }

    /// Private images available for deployment.
    pub async fn list_images(&mut self) -> Result<&[jumphost_doapi::Image]> {
        self.api.images(false).await
    }

    fn name(&self, region: &str) -> Result<String> {
        self.config
            .name_format
            .as_ref()
            .map(|format| format.render(region))
            .ok_or(Error::NameFormatNotSet)
    }

    async fn find(&mut self, name: &str, refresh: bool) -> Result<Option<&Droplet>> {
        let droplets = self.api.droplets(refresh).await?;
        Ok(droplets.iter().find(|droplet| droplet.name == name))
    }

    /// Explicit name, then the configured default, then the first image.
    async fn find_image(&mut self, image_name: Option<&str>) -> Result<ImageId> {
        let selector = image_name
            .map(str::to_owned)
            .or_else(|| self.config.default_image_name.clone());
        let images = self.api.images(false).await?;

        let found = match selector.as_deref() {
            Some(wanted) => images.iter().find(|image| image.name == wanted),
            None => images.first(),
        };

        match found {
            Some(image) => {
                debug!(id = image.id, name = %image.name, "Resolved image");
                Ok(image.id)
            }
            None => Err(Error::NoImageFound(
                selector.unwrap_or_else(|| "no private images available".to_string()),
            )),
        }
    }
}
