//! Configuration structures for jump host deployments.
//!
//! [`ApiConfig`] controls how the DigitalOcean client is reached, [`DropletConfig`]
//! holds the naming and image conventions, and [`JumpHostConfig`] bundles both
//! for loading from a JSON file. The API token is deliberately absent: it is
//! handed to the facade at runtime and never serialized.

use crate::client::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT, MAX_PER_PAGE};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Placeholder replaced by the region in a [`NameFormat`].
pub const REGION_SLOT: &str = "%s";

/// Droplet size slug used when none is configured.
pub const DEFAULT_DROPLET_SIZE: &str = "512mb";

/// Template for the canonical jump host name of a region.
///
/// The template carries exactly one `%s` slot, e.g. `jump-%s.example.net`
/// renders to `jump-ams3.example.net` for region `ams3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameFormat(String);

impl NameFormat {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] unless the template contains exactly one
    /// `%s` slot.
    pub fn parse(template: impl Into<String>) -> Result<Self, Error> {
        let template = template.into();
        match template.matches(REGION_SLOT).count() {
            1 => Ok(Self(template)),
            found => Err(Error::ConfigError(format!(
                "name format `{template}` must contain exactly one `{REGION_SLOT}` slot, found {found}"
            ))),
        }
    }

    /// Substitute the region into the template.
    #[must_use]
    pub fn render(&self, region: &str) -> String {
        self.0.replacen(REGION_SLOT, region, 1)
    }

    /// The raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NameFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NameFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        Self::parse(value)
    }
}

impl From<NameFormat> for String {
    fn from(format: NameFormat) -> Self {
        format.0
    }
}

impl fmt::Display for NameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How to reach the DigitalOcean API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size for list requests
    #[validate(range(min = 1, max = 200))]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

const fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

impl ApiConfig {
    /// Create an API configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid API configuration: {e}")))?;

        Ok(config)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the list page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the base URL, making sure relative paths join below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            per_page: default_per_page(),
        }
    }
}

/// Naming and provisioning conventions for jump host droplets.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DropletConfig {
    /// Template for the droplet name, one `%s` slot for the region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_format: Option<NameFormat>,

    /// Image picked when deploy is not given one explicitly
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image_name: Option<String>,

    /// Droplet size slug
    #[validate(length(min = 1))]
    #[serde(default = "default_size")]
    pub size: String,
}

fn default_size() -> String {
    DEFAULT_DROPLET_SIZE.to_string()
}

impl DropletConfig {
    /// Create an empty droplet configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name format.
    #[must_use]
    pub fn with_name_format(mut self, format: NameFormat) -> Self {
        self.name_format = Some(format);
        self
    }

    /// Set the default image name.
    #[must_use]
    pub fn with_default_image_name(mut self, name: impl Into<String>) -> Self {
        self.default_image_name = Some(name.into());
        self
    }

    /// Set the droplet size slug.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }
}

impl Default for DropletConfig {
    fn default() -> Self {
        Self {
            name_format: None,
            default_image_name: None,
            size: default_size(),
        }
    }
}

/// Complete configuration, as loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JumpHostConfig {
    /// API connection settings
    #[validate(nested)]
    #[serde(default)]
    pub api: ApiConfig,

    /// Droplet conventions
    #[validate(nested)]
    #[serde(default)]
    pub droplet: DropletConfig,
}

impl JumpHostConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is malformed or a value
    /// is out of range.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration file: {e}")))?;
        config.validated()
    }

    /// Run field validation, returning the config unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the offending fields.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_format_render() {
        let format = NameFormat::parse("jump-%s.your-do.host").unwrap();
        assert_eq!(format.render("nyc3"), "jump-nyc3.your-do.host");
        assert_eq!(format.to_string(), "jump-%s.your-do.host");
    }

    #[test]
    fn test_name_format_requires_one_slot() {
        assert!(matches!(
            NameFormat::parse("jump.your-do.host"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            NameFormat::parse("%s-jump-%s"),
            Err(Error::ConfigError(_))
        ));
        assert!("%s".parse::<NameFormat>().is_ok());
    }

    #[test]
    fn test_api_config_new() {
        let config = ApiConfig::new("https://api.example.com/v2").unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.per_page, 200);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_api_config_invalid_url() {
        assert!(ApiConfig::new("not-a-url").is_err());
    }

    #[test]
    fn test_parse_api_url_adds_trailing_slash() {
        let config = ApiConfig::new("https://api.example.com/v2").unwrap();
        let url = config.parse_api_url().unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/");
        assert_eq!(
            url.join("account/keys").unwrap().as_str(),
            "https://api.example.com/v2/account/keys"
        );
    }

    #[test]
    fn test_api_config_validation_ranges() {
        let mut config = ApiConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.per_page = 201;
        assert!(config.validate().is_err());

        config.per_page = 25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_droplet_config_defaults() {
        let config = DropletConfig::new();
        assert!(config.name_format.is_none());
        assert!(config.default_image_name.is_none());
        assert_eq!(config.size, "512mb");
    }

    #[test]
    fn test_from_json() {
        let config = JumpHostConfig::from_json(
            r#"{
                "api": {"per_page": 50},
                "droplet": {
                    "name_format": "jump-%s.example.net",
                    "default_image_name": "bastion-2024"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.api.api_url, DEFAULT_API_URL);
        assert_eq!(config.api.per_page, 50);
        assert_eq!(
            config.droplet.name_format.unwrap().render("lon1"),
            "jump-lon1.example.net"
        );
        assert_eq!(
            config.droplet.default_image_name.as_deref(),
            Some("bastion-2024")
        );
        assert_eq!(config.droplet.size, DEFAULT_DROPLET_SIZE);
    }

    #[test]
    fn test_from_json_rejects_bad_format() {
        let result = JumpHostConfig::from_json(r#"{"droplet": {"name_format": "jump"}}"#);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_from_json_rejects_out_of_range() {
        let result = JumpHostConfig::from_json(r#"{"api": {"request_timeout_secs": 0}}"#);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = JumpHostConfig {
            api: ApiConfig::default(),
            droplet: DropletConfig::new()
                .with_name_format(NameFormat::parse("jump-%s").unwrap())
                .with_size("s-1vcpu-512mb-10gb"),
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized = JumpHostConfig::from_json(&json).unwrap();

        assert_eq!(deserialized.droplet.name_format, config.droplet.name_format);
        assert_eq!(deserialized.droplet.size, "s-1vcpu-512mb-10gb");
        assert!(!json.contains("default_image_name"));
    }
}
