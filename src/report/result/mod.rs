use chrono::DateTime;
use serde_json::Value;

pub use dns::*;
pub use ntp::*;
pub use ping::*;
pub use ssl::*;
pub use traceroute::*;

mod dns;
mod ntp;
mod ping;
mod ssl;
mod traceroute;

use super::{Report, Substitutions};
use crate::{
    error::{Error, Result},
    measurement::MeasurementType,
};

/// Turns one raw measurement result into template substitutions.
pub trait Formatter {
    fn kind(&self) -> ReportKind;

    fn substitutions(&self, result: &Value) -> Substitutions;

    fn render(&self, report: &Report, result: &Value) -> Result<()> {
        report.render(self.kind().template(), &self.substitutions(result))
    }
}

/// The report kinds bundled with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Ping,
    Traceroute,
    Dns,
    Ssl,
    Ntp,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Ping,
        ReportKind::Traceroute,
        ReportKind::Dns,
        ReportKind::Ssl,
        ReportKind::Ntp,
    ];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ping" => Ok(ReportKind::Ping),
            "traceroute" => Ok(ReportKind::Traceroute),
            "dns" => Ok(ReportKind::Dns),
            "ssl" | "sslcert" => Ok(ReportKind::Ssl),
            "ntp" => Ok(ReportKind::Ntp),
            _ => Err(Error::UnknownFormatter(name.to_string())),
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            ReportKind::Ping => "ping.txt",
            ReportKind::Traceroute => "traceroute.txt",
            ReportKind::Dns => "dns.txt",
            ReportKind::Ssl => "ssl.txt",
            ReportKind::Ntp => "ntp.txt",
        }
    }

    /// Template text compiled into the binary.
    pub fn bundled_template(self) -> &'static str {
        match self {
            ReportKind::Ping => include_str!("../../../templates/ping.txt"),
            ReportKind::Traceroute => include_str!("../../../templates/traceroute.txt"),
            ReportKind::Dns => include_str!("../../../templates/dns.txt"),
            ReportKind::Ssl => include_str!("../../../templates/ssl.txt"),
            ReportKind::Ntp => include_str!("../../../templates/ntp.txt"),
        }
    }

    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            ReportKind::Ping => Box::new(PingReport),
            ReportKind::Traceroute => Box::new(TracerouteReport),
            ReportKind::Dns => Box::new(DnsReport),
            ReportKind::Ssl => Box::new(SslReport),
            ReportKind::Ntp => Box::new(NtpReport),
        }
    }
}

impl From<MeasurementType> for ReportKind {
    fn from(kind: MeasurementType) -> Self {
        match kind {
            MeasurementType::Ping => ReportKind::Ping,
            MeasurementType::Traceroute => ReportKind::Traceroute,
            MeasurementType::Dns => ReportKind::Dns,
            MeasurementType::Ssl => ReportKind::Ssl,
            MeasurementType::Ntp => ReportKind::Ntp,
        }
    }
}

/// Looks up the formatter for a report name such as `ping` or `sslcert`.
pub fn formatter(name: &str) -> Result<Box<dyn Formatter>> {
    ReportKind::from_name(name).map(ReportKind::formatter)
}

/// Fields every result carries: probe, time and destination.
fn common(result: &Value) -> Substitutions {
    let mut subs = Substitutions::new();
    subs.insert("probe".to_string(), probe_id(result));
    subs.insert("timestamp".to_string(), timestamp(result));
    subs.insert("target".to_string(), target(result));
    subs
}

fn probe_id(result: &Value) -> String {
    result["prb_id"]
        .as_u64()
        .map_or_else(|| "?".to_string(), |id| id.to_string())
}

fn timestamp(result: &Value) -> String {
    result["timestamp"]
        .as_i64()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}

fn target(result: &Value) -> String {
    result["dst_name"]
        .as_str()
        .or_else(|| result["dst_addr"].as_str())
        .unwrap_or("*")
        .to_string()
}

/// Milliseconds with three decimals; Atlas uses negative values for "no reply".
fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) if ms >= 0.0 => format!("{ms:.3}"),
        _ => "*".to_string(),
    }
}
