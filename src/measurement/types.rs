use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum MeasurementType {
    /// ICMP echo
    #[default]
    Ping,
    /// Path discovery
    Traceroute,
    /// DNS query
    Dns,
    /// TLS certificate retrieval
    #[serde(rename = "sslcert")]
    Ssl,
    /// NTP query
    Ntp,
}

impl MeasurementType {
    /// Whether packet count and size apply to this type.
    pub fn sends_packets(self) -> bool {
        matches!(self, MeasurementType::Ping | MeasurementType::Traceroute)
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementType::Ping => write!(f, "ping"),
            MeasurementType::Traceroute => write!(f, "traceroute"),
            MeasurementType::Dns => write!(f, "dns"),
            MeasurementType::Ssl => write!(f, "ssl"),
            MeasurementType::Ntp => write!(f, "ntp"),
        }
    }
}

/// IP address family. Serialized as the bare number the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(try_from = "u8", into = "u8")]
pub enum AddressFamily {
    #[default]
    #[value(name = "4")]
    V4,
    #[value(name = "6")]
    V6,
}

impl From<AddressFamily> for u8 {
    fn from(af: AddressFamily) -> Self {
        match af {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 6,
        }
    }
}

impl TryFrom<u8> for AddressFamily {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(AddressFamily::V4),
            6 => Ok(AddressFamily::V6),
            other => Err(Error::InvalidArgument(format!(
                "The address family must be either 4 or 6, not {other}"
            ))),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum Protocol {
    #[default]
    Icmp,
    Udp,
    Tcp,
}

/// Geographic areas the API can pick probes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Area {
    #[serde(rename = "WW")]
    #[value(name = "WW")]
    Worldwide,
    #[value(name = "West")]
    West,
    #[serde(rename = "North-Central")]
    #[value(name = "North-Central")]
    NorthCentral,
    #[serde(rename = "South-Central")]
    #[value(name = "South-Central")]
    SouthCentral,
    #[serde(rename = "North-East")]
    #[value(name = "North-East")]
    NorthEast,
    #[serde(rename = "South-East")]
    #[value(name = "South-East")]
    SouthEast,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Area::Worldwide => "WW",
            Area::West => "West",
            Area::NorthCentral => "North-Central",
            Area::SouthCentral => "South-Central",
            Area::NorthEast => "North-East",
            Area::SouthEast => "South-East",
        };
        f.write_str(name)
    }
}

/// Where the probes for a measurement come from. Built from whichever single
/// `--from-*` flag was given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Country(String),
    Area(Area),
    Prefix(String),
    Asn(u32),
    Probes(String),
    Measurement(u64),
}

impl Origin {
    pub fn kind(&self) -> SourceKind {
        match self {
            Origin::Country(_) => SourceKind::Country,
            Origin::Area(_) => SourceKind::Area,
            Origin::Prefix(_) => SourceKind::Prefix,
            Origin::Asn(_) => SourceKind::Asn,
            Origin::Probes(_) => SourceKind::Probes,
            Origin::Measurement(_) => SourceKind::Msm,
        }
    }

    pub fn value(&self) -> String {
        match self {
            Origin::Country(code) => code.clone(),
            Origin::Area(area) => area.to_string(),
            Origin::Prefix(prefix) => prefix.clone(),
            Origin::Asn(asn) => asn.to_string(),
            Origin::Probes(ids) => ids.clone(),
            Origin::Measurement(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Area,
    Country,
    Prefix,
    Asn,
    Probes,
    Msm,
}

/// Probe selection sent alongside the measurement definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Number of probes asked for
    #[serde(default = "default_requested")]
    pub requested: u32,
}

fn default_requested() -> u32 {
    crate::constants::DEFAULT_REQUESTED_PROBES
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            kind: Some(SourceKind::Area),
            value: Some(Area::Worldwide.to_string()),
            requested: default_requested(),
        }
    }
}

impl SourceSpec {
    /// How many probes can answer. An explicit probe list caps the requested count.
    pub fn expected_results(&self) -> u32 {
        match (self.kind, self.value.as_deref()) {
            (Some(SourceKind::Probes), Some(ids)) => {
                let listed = ids.split(',').filter(|id| !id.is_empty()).count();
                self.requested.min(u32::try_from(listed).unwrap_or(u32::MAX))
            }
            _ => self.requested,
        }
    }
}

/// A single measurement definition as the creation endpoint expects it.
///
/// Type-specific fields stay `None` for types they do not apply to and are
/// left out of the serialized payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRequest {
    #[serde(rename = "type")]
    pub kind: MeasurementType,
    pub af: AddressFamily,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub is_oneoff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_probe_resolver: Option<bool>,
}
