//! Service configuration loaded from the environment.
//!
//! `main` loads `.env` through `dotenvy` before calling [`Config::from_env`].
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NETWORK` | `local` |
//! | `CHAIN_ID` | network chain id (required for `local`) |
//! | `RPC_URL` | network public endpoint (none for `local`) |
//! | `REPUTATION_ADDR` | network deployment (required for `local`) |
//! | `TERMINUSDID_ADDR` | network deployment (required for `local`) |
//! | `TAG_TYPE_DOMAIN` | `otmoic.reputation` |
//! | `TAG_NAME` | `complaints` |
//! | `COMPLAINT_STORE_TABLE_NAME` | unset (in-memory store) |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |

use alloy::primitives::Address;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use url::Url;

use crate::network::{get_deployment, Network};

pub const DEFAULT_TAG_TYPE_DOMAIN: &str = "otmoic.reputation";
pub const DEFAULT_TAG_NAME: &str = "complaints";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("CHAIN_ID {configured} does not match {network} ({expected})")]
    ChainIdMismatch {
        network: Network,
        expected: u64,
        configured: u64,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub chain_id: u64,
    /// JSON-RPC endpoint; without one the service runs against an in-memory registry
    pub rpc_url: Option<Url>,
    pub reputation: Address,
    pub terminus_did: Address,
    pub tag_type_domain: String,
    pub tag_name: String,
    pub complaint_store_table: Option<String>,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network = match get("NETWORK") {
            Some(value) => parse::<Network>("NETWORK", &value)?,
            None => Network::Local,
        };
        let deployment = get_deployment(&network);

        let configured_chain_id = get("CHAIN_ID")
            .map(|v| parse::<u64>("CHAIN_ID", &v))
            .transpose()?;
        let chain_id = match (network.chain_id(), configured_chain_id) {
            (Some(expected), Some(configured)) if expected != configured => {
                return Err(ConfigError::ChainIdMismatch {
                    network,
                    expected,
                    configured,
                })
            }
            (Some(expected), _) => expected,
            (None, Some(configured)) => configured,
            (None, None) => return Err(ConfigError::Missing("CHAIN_ID")),
        };

        let rpc_url = match get("RPC_URL") {
            Some(value) => Some(parse::<Url>("RPC_URL", &value)?),
            None => network
                .default_rpc_url()
                .map(|url| parse::<Url>("RPC_URL", url))
                .transpose()?,
        };

        let reputation = match get("REPUTATION_ADDR") {
            Some(value) => parse::<Address>("REPUTATION_ADDR", &value)?,
            None => deployment
                .map(|d| d.reputation)
                .ok_or(ConfigError::Missing("REPUTATION_ADDR"))?,
        };

        let terminus_did = match get("TERMINUSDID_ADDR") {
            Some(value) => parse::<Address>("TERMINUSDID_ADDR", &value)?,
            None => deployment
                .map(|d| d.terminus_did)
                .ok_or(ConfigError::Missing("TERMINUSDID_ADDR"))?,
        };

        let host = match get("HOST") {
            Some(value) => parse::<IpAddr>("HOST", &value)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match get("PORT") {
            Some(value) => parse::<u16>("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            network,
            chain_id,
            rpc_url,
            reputation,
            terminus_did,
            tag_type_domain: get("TAG_TYPE_DOMAIN")
                .unwrap_or_else(|| DEFAULT_TAG_TYPE_DOMAIN.to_string()),
            tag_name: get("TAG_NAME").unwrap_or_else(|| DEFAULT_TAG_NAME.to_string()),
            complaint_store_table: get("COMPLAINT_STORE_TABLE_NAME"),
            host,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value.trim()).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
