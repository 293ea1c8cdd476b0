//! Startup configuration read from environment variables.
//!
//! | variable                     | default                    |
//! |------------------------------|----------------------------|
//! | `DEX_LISTEN_ADDR`            | `0.0.0.0:8080`             |
//! | `DEX_NETWORK_INTERFACE`      | unset (sum all interfaces) |
//! | `DEX_MAX_CONCURRENT_FETCHES` | `16`                       |
//! | `DEX_FETCH_TIMEOUT_SECS`     | `10`                       |
//!
//! The daemon connection follows the usual `DOCKER_HOST`, `DOCKER_TLS_VERIFY`
//! and `DOCKER_CERT_PATH` variables, see [`crate::docker::DockerClient::connect_with_defaults`].

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::collector::{CollectorOptions, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENT_FETCHES};
use crate::stats::NetworkSelection;

pub const LISTEN_ADDR_VAR: &str = "DEX_LISTEN_ADDR";
pub const NETWORK_INTERFACE_VAR: &str = "DEX_NETWORK_INTERFACE";
pub const MAX_CONCURRENT_FETCHES_VAR: &str = "DEX_MAX_CONCURRENT_FETCHES";
pub const FETCH_TIMEOUT_SECS_VAR: &str = "DEX_FETCH_TIMEOUT_SECS";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{var}` is not a valid socket address `{value}`: {source}")]
    InvalidListenAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("`{var}` must be an integer between 1 and {max}, but was `{value}`")]
    InvalidPositiveInteger {
        var: &'static str,
        value: String,
        max: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub network: NetworkSelection,
    pub max_concurrent_fetches: usize,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_addr = lookup(LISTEN_ADDR_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .map_err(|source| Error::InvalidListenAddr {
                var: LISTEN_ADDR_VAR,
                value: listen_addr.clone(),
                source,
            })?;

        // The semaphore bounding the fan-out can't hold more permits than this.
        let max_concurrent_fetches = positive_integer(
            MAX_CONCURRENT_FETCHES_VAR,
            lookup(MAX_CONCURRENT_FETCHES_VAR),
            Semaphore::MAX_PERMITS as u64,
        )?
        .map_or(DEFAULT_MAX_CONCURRENT_FETCHES, |n| n as usize);

        let fetch_timeout = positive_integer(
            FETCH_TIMEOUT_SECS_VAR,
            lookup(FETCH_TIMEOUT_SECS_VAR),
            u64::MAX,
        )?
        .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs);

        Ok(Self {
            listen_addr,
            network: NetworkSelection::from_interface_name(lookup(NETWORK_INTERFACE_VAR)),
            max_concurrent_fetches,
            fetch_timeout,
        })
    }

    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            network: self.network.clone(),
            max_concurrent_fetches: self.max_concurrent_fetches,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

/// Parses an optional integer in `1..=max`.
fn positive_integer(var: &'static str, value: Option<String>, max: u64) -> Result<Option<u64>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if (1..=max).contains(&n) => Ok(Some(n)),
        _ => Err(Error::InvalidPositiveInteger { var, value, max }),
    }
}
