//! Process-wide defaults, read once from a JSON file at startup.
//!
//! Every key is optional in the file; anything left out falls back to the
//! built-in default. A minimal file looks like:
//!
//! ```json
//! {
//!   "authorisation": { "create": "my-api-key" },
//!   "specification": { "source": { "type": "country", "value": "NL", "requested": 10 } }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{
        CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ENDPOINT, DEFAULT_PING_PACKETS,
        DEFAULT_PING_SIZE, DEFAULT_STREAM_IDLE_TIMEOUT, DEFAULT_STREAM_POLL_INTERVAL,
        DEFAULT_TRACEROUTE_TIMEOUT,
    },
    error::{Error, Result},
    measurement::{AddressFamily, Protocol, SourceSpec},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub authorisation: Authorisation,
    pub specification: Specification,
    #[serde(rename = "ripe-ncc")]
    pub ripe_ncc: RipeNcc,
    pub streaming: Streaming,
    pub reports: Reports,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorisation {
    /// API key used to create measurements
    pub create: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specification {
    pub af: AddressFamily,
    pub description: String,
    /// Probe selection used when no `--from-*` flag is given
    pub source: SourceSpec,
    pub types: TypeDefaults,
    pub times: Times,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            af: AddressFamily::V4,
            description: String::new(),
            source: SourceSpec::default(),
            types: TypeDefaults::default(),
            times: Times::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDefaults {
    pub ping: PingDefaults,
    pub traceroute: TracerouteDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingDefaults {
    pub packets: u32,
    /// Payload size in bytes
    pub size: u32,
}

impl Default for PingDefaults {
    fn default() -> Self {
        Self {
            packets: DEFAULT_PING_PACKETS,
            size: DEFAULT_PING_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerouteDefaults {
    pub protocol: Protocol,
    /// Per-packet timeout in milliseconds
    pub timeout: u32,
}

impl Default for TracerouteDefaults {
    fn default() -> Self {
        Self {
            protocol: Protocol::Icmp,
            timeout: DEFAULT_TRACEROUTE_TIMEOUT,
        }
    }
}

/// Recurrence policy. With `one-off` disabled an `interval` must be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Times {
    #[serde(rename = "one-off")]
    pub one_off: bool,
    pub interval: Option<u64>,
}

impl Default for Times {
    fn default() -> Self {
        Self {
            one_off: true,
            interval: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RipeNcc {
    pub endpoint: String,
}

impl Default for RipeNcc {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Streaming {
    /// Seconds between polls of the results endpoint
    pub poll_interval: u64,
    /// Seconds without new results before giving up
    pub idle_timeout: u64,
}

impl Default for Streaming {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_STREAM_POLL_INTERVAL,
            idle_timeout: DEFAULT_STREAM_IDLE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reports {
    /// Directory of custom templates. The bundled ones are used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user file is read if
    /// present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidConfiguration(format!(
                "Could not parse configuration file {}: {e}",
                path.display()
            ))
        })
    }
}

/// `$XDG_CONFIG_HOME/atlas-cli/config.json`, falling back to `~/.config`.
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
