use std::net::SocketAddr;

use serde::Deserialize;
use storefront_core::error::{Result, StorefrontError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorefrontConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub pagination: PaginationSection,

    #[serde(default)]
    pub store: StoreSection,
}

impl StorefrontConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StorefrontError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.pagination.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Time between flipping `/readyz` to 503 and closing the listener.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.shutdown_grace_ms > 60_000 {
            return Err(StorefrontError::BadRequest(
                "server.shutdown_grace_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            StorefrontError::BadRequest(format!(
                "server.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationSection {
    #[serde(default = "default_page_size")]
    pub default_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_size: u32,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: default_max_page_size(),
        }
    }
}

impl PaginationSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.max_size) {
            return Err(StorefrontError::BadRequest(
                "pagination.max_size must be between 1 and 1000".into(),
            ));
        }
        if !(1..=self.max_size).contains(&self.default_size) {
            return Err(StorefrontError::BadRequest(
                "pagination.default_size must be between 1 and pagination.max_size".into(),
            ));
        }
        Ok(())
    }
}

fn default_page_size() -> u32 {
    10
}
fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub seed_demo_data: bool,
}
