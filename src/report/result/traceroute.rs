use serde_json::Value;

use super::{Formatter, ReportKind, common, format_ms};
use crate::report::Substitutions;

pub struct TracerouteReport;

impl Formatter for TracerouteReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Traceroute
    }

    fn substitutions(&self, result: &Value) -> Substitutions {
        let mut subs = common(result);
        let hops = result["result"]
            .as_array()
            .map(|hops| hops.iter().map(hop_line).collect::<String>())
            .unwrap_or_default();
        subs.insert("hops".to_string(), hops);
        subs
    }
}

/// One line per hop: the first responding address and every packet's RTT.
fn hop_line(hop: &Value) -> String {
    let number = hop["hop"].as_u64().unwrap_or(0);
    let packets = hop["result"].as_array().map(Vec::as_slice).unwrap_or(&[]);

    let from = packets
        .iter()
        .find_map(|p| p["from"].as_str())
        .unwrap_or("*");
    let rtts = packets
        .iter()
        .map(|p| format_ms(p["rtt"].as_f64()))
        .collect::<Vec<_>>()
        .join("  ");

    format!("{number:>3}  {from:<39} {rtts}\n")
}
