//! DigitalOcean request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Numeric droplet identifier.
pub type DropletId = u64;
/// Numeric image identifier.
pub type ImageId = u64;
/// Numeric ssh key identifier.
pub type SshKeyId = u64;

// ============================================================================
// Images
// ============================================================================

/// Disk image (distribution image, snapshot or backup).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// Image ID.
    pub id: ImageId,
    /// Image name.
    pub name: String,
    /// Whether the image is publicly available. Snapshots are private.
    pub public: bool,
    /// Image kind: "base", "snapshot", "backup", "custom".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    /// Distribution name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    /// Slug, only set for public images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Regions the image is available in.
    #[serde(default)]
    pub regions: Vec<String>,
    /// Minimum disk size in GB required by the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_disk_size: Option<u64>,
    /// Image size in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gigabytes: Option<f64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Droplets
// ============================================================================

/// Droplet lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    /// Being provisioned.
    New,
    /// Running.
    Active,
    /// Powered off.
    Off,
    /// Being archived or destroyed.
    Archive,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl DropletStatus {
    /// Returns the status as sent by the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Off => "off",
            Self::Archive => "archive",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DropletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Droplet (virtual machine) as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Droplet {
    /// Droplet ID.
    pub id: DropletId,
    /// Droplet name.
    pub name: String,
    /// Lifecycle status.
    pub status: DropletStatus,
    /// Region the droplet runs in.
    pub region: Region,
    /// Attached networks.
    #[serde(default)]
    pub networks: Networks,
    /// Size slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_slug: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Droplet {
    /// First public IPv4 address, if one has been assigned yet.
    #[must_use]
    pub fn public_ipv4(&self) -> Option<Ipv4Addr> {
        self.networks
            .v4
            .iter()
            .filter(|address| address.is_public())
            .find_map(|address| address.ip_address.parse().ok())
    }
}

/// Region information embedded in a droplet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    /// Region slug, e.g. "ams3".
    pub slug: String,
    /// Human readable name.
    #[serde(default)]
    pub name: String,
}

/// Network configuration of a droplet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Networks {
    /// IPv4 addresses.
    #[serde(default)]
    pub v4: Vec<NetworkAddress>,
    /// IPv6 addresses.
    #[serde(default)]
    pub v6: Vec<NetworkAddress>,
}

/// A single network address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkAddress {
    /// IP address.
    pub ip_address: String,
    /// Netmask (v4) or prefix length (v6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<serde_json::Value>,
    /// Gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Type: "public" or "private".
    #[serde(rename = "type")]
    pub address_type: String,
}

impl NetworkAddress {
    /// Returns true for publicly routed addresses.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.address_type == "public"
    }
}

/// Request body for creating a droplet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateDropletRequest {
    /// Droplet name.
    pub name: String,
    /// Region slug.
    pub region: String,
    /// Size slug.
    pub size: String,
    /// Image ID.
    pub image: ImageId,
    /// SSH key IDs to install.
    pub ssh_keys: Vec<SshKeyId>,
}

// ============================================================================
// SSH keys
// ============================================================================

/// SSH public key registered on the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshKey {
    /// Key ID.
    pub id: SshKeyId,
    /// Key name.
    #[serde(default)]
    pub name: String,
    /// Key fingerprint.
    #[serde(default)]
    pub fingerprint: String,
    /// Public key material.
    #[serde(default)]
    pub public_key: String,
}

// ============================================================================
// Envelopes
// ============================================================================

/// Pagination links.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    /// Page links, absent when everything fits in one page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
}

impl Links {
    /// Returns true when the API advertises another page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pages.as_ref().is_some_and(|pages| pages.next.is_some())
    }
}

/// Page links.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pages {
    /// First page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Response metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
}

/// A list response page: items plus pagination links.
pub(crate) trait ListPage {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Links);
}

macro_rules! list_page {
    ($name:ident, $field:ident, $item:ty) => {
        #[derive(Debug, Deserialize)]
        pub(crate) struct $name {
            $field: Vec<$item>,
            #[serde(default)]
            links: Links,
        }

        impl ListPage for $name {
            type Item = $item;

            fn into_parts(self) -> (Vec<$item>, Links) {
                (self.$field, self.links)
            }
        }
    };
}

list_page!(ImageListResponse, images, Image);
list_page!(DropletListResponse, droplets, Droplet);
list_page!(SshKeyListResponse, ssh_keys, SshKey);

/// Single droplet response.
#[derive(Debug, Deserialize)]
pub(crate) struct DropletResponse {
    pub(crate) droplet: Droplet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn droplet_with_networks(networks: serde_json::Value) -> Droplet {
        serde_json::from_value(json!({
            "id": 3164494,
            "name": "jump-nyc3.example.net",
            "status": "active",
            "region": {"slug": "nyc3", "name": "New York 3"},
            "networks": networks
        }))
        .unwrap()
    }

    #[test]
    fn public_ipv4_skips_private_addresses() {
        let droplet = droplet_with_networks(json!({
            "v4": [
                {"ip_address": "10.128.192.124", "netmask": "255.255.0.0", "gateway": "nil", "type": "private"},
                {"ip_address": "192.241.165.154", "netmask": "255.255.255.0", "gateway": "192.241.165.1", "type": "public"}
            ],
            "v6": []
        }));
        assert_eq!(
            droplet.public_ipv4(),
            Some(Ipv4Addr::new(192, 241, 165, 154))
        );
    }

    #[test]
    fn public_ipv4_absent_while_provisioning() {
        let droplet = droplet_with_networks(json!({"v4": [], "v6": []}));
        assert_eq!(droplet.public_ipv4(), None);
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let droplet: Droplet = serde_json::from_value(json!({
            "id": 1,
            "name": "jump-ams3",
            "status": "migrating",
            "region": {"slug": "ams3"}
        }))
        .unwrap();
        assert_eq!(droplet.status, DropletStatus::Unknown);
        assert!(droplet.networks.v4.is_empty());
    }

    #[test]
    fn links_has_next() {
        let links: Links = serde_json::from_value(json!({
            "pages": {"last": "https://api.digitalocean.com/v2/images?page=2", "next": "https://api.digitalocean.com/v2/images?page=2"}
        }))
        .unwrap();
        assert!(links.has_next());
        assert!(!Links::default().has_next());
    }

    #[test]
    fn create_request_serializes_image_id() {
        let request = CreateDropletRequest {
            name: "jump-lon1".into(),
            region: "lon1".into(),
            size: "512mb".into(),
            image: 7555620,
            ssh_keys: vec![512189, 512190],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "jump-lon1",
                "region": "lon1",
                "size": "512mb",
                "image": 7555620,
                "ssh_keys": [512189, 512190]
            })
        );
    }
}
