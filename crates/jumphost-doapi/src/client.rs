//! Asynchronous DigitalOcean client implementation.

use crate::models::{
    CreateDropletRequest, Droplet, DropletId, DropletListResponse, DropletResponse, Image,
    ImageListResponse, ListPage, SshKey, SshKeyListResponse,
};
use crate::Result;
use jumphost_core::client::{ClientConfig, MAX_PER_PAGE};
use jumphost_core::config::ApiConfig;
use jumphost_core::query::Page;
use jumphost_core::Error;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("jumphost-doapi/", env!("CARGO_PKG_VERSION"));

/// Builder for [`DoClient`].
#[derive(Debug)]
pub struct DoClientBuilder {
    base_url: Url,
    token: SecretString,
    http_config: ClientConfig,
    per_page: u32,
}

impl DoClientBuilder {
    /// Create a builder targeting the public DigitalOcean API.
    pub fn new(token: SecretString) -> Result<Self> {
        Self::from_config(&ApiConfig::default(), token)
    }

    /// Create a builder from an [`ApiConfig`].
    pub fn from_config(config: &ApiConfig, token: SecretString) -> Result<Self> {
        Ok(Self {
            base_url: config.parse_api_url()?,
            token,
            http_config: ClientConfig::new().with_timeout(config.timeout()),
            per_page: config.per_page,
        })
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let config = ApiConfig {
            api_url: base_url.as_ref().to_string(),
            ..ApiConfig::default()
        };
        self.base_url = config.parse_api_url()?;
        Ok(self)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the page size used by list calls.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DoClient> {
        let http = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .gzip(self.http_config.enable_compression)
            .build()
            .map_err(|err| {
                Error::ConfigError(format!("Failed to build DigitalOcean HTTP client: {err}"))
            })?;

        Ok(DoClient {
            http,
            base_url: self.base_url,
            token: self.token,
            per_page: self.per_page,
        })
    }
}

/// Asynchronous DigitalOcean client.
pub struct DoClient {
    http: Client,
    base_url: Url,
    token: SecretString,
    per_page: u32,
}

impl DoClient {
    /// Construct a client for the public API with default settings.
    pub fn new(token: SecretString) -> Result<Self> {
        DoClientBuilder::new(token)?.build()
    }

    /// Start a builder.
    pub fn builder(token: SecretString) -> Result<DoClientBuilder> {
        DoClientBuilder::new(token)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List every image visible to the account, following pagination.
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        self.list_all::<ImageListResponse>("images").await
    }

    /// List every droplet on the account, following pagination.
    pub async fn list_droplets(&self) -> Result<Vec<Droplet>> {
        self.list_all::<DropletListResponse>("droplets").await
    }

    /// List every ssh key on the account, following pagination.
    pub async fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.list_all::<SshKeyListResponse>("account/keys").await
    }

    /// Create a droplet. The returned droplet is in the `new` state.
    pub async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet> {
        info!(
            name = %request.name,
            region = %request.region,
            size = %request.size,
            image = request.image,
            ssh_keys = request.ssh_keys.len(),
            "Creating droplet"
        );
        let response: DropletResponse = self
            .send_json(Method::POST, "droplets", Some(request), &[])
            .await?;
        info!(droplet_id = response.droplet.id, "Droplet created");
        Ok(response.droplet)
    }

    /// Delete a droplet by ID.
    pub async fn delete_droplet(&self, id: DropletId) -> Result<()> {
        info!(droplet_id = id, "Deleting droplet");
        let path = format!("droplets/{id}");
        self.execute::<()>(Method::DELETE, &path, None, &[])
            .await
            .map(|_| ())
    }

    async fn list_all<P>(&self, path: &str) -> Result<Vec<P::Item>>
    where
        P: ListPage + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = Page::first(self.per_page);

        loop {
            let response: P = self
                .send_json::<(), P>(Method::GET, path, None, &page.to_pairs())
                .await?;
            let (batch, links) = response.into_parts();
            let exhausted = batch.is_empty() || !links.has_next();
            items.extend(batch);

            if exhausted {
                break;
            }
            page = page.next();
        }

        debug!(path = %path, pages = page.number, count = items.len(), "Listed resources");
        Ok(items)
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(method, path, body, params).await?;

        response.json::<R>().await.map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse DigitalOcean response for `{path}`: {err}"
            ))
        })
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        debug!(%method, path = %path, ?params, "Sending DigitalOcean request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_status_to_error(status, text))
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid DigitalOcean path `{path}`: {err}"))
        })
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("DigitalOcean authentication failed: {text}"))
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("DigitalOcean temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("DigitalOcean server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("DigitalOcean error {status}: {text}")),
    }
}
