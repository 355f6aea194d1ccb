use serde_json::Value;

use super::{Formatter, ReportKind, common, format_ms};
use crate::report::Substitutions;

pub struct NtpReport;

impl Formatter for NtpReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Ntp
    }

    fn substitutions(&self, result: &Value) -> Substitutions {
        let mut subs = common(result);

        let packets = result["result"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        let offsets = packets
            .iter()
            .map(|p| match p["offset"].as_f64() {
                Some(offset) => format!("{offset:+.6}s"),
                None => "*".to_string(),
            })
            .collect::<Vec<_>>();
        let rtts = packets
            .iter()
            .map(|p| format_ms(p["rtt"].as_f64()))
            .collect::<Vec<_>>();

        subs.insert(
            "stratum".to_string(),
            result["stratum"]
                .as_u64()
                .map_or_else(|| "?".to_string(), |s| s.to_string()),
        );
        subs.insert("offsets".to_string(), join_or_star(&offsets));
        subs.insert("rtts".to_string(), join_or_star(&rtts));
        subs
    }
}

fn join_or_star(values: &[String]) -> String {
    if values.is_empty() {
        "*".to_string()
    } else {
        values.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ntp_packets() {
        let result = json!({
            "prb_id": 44,
            "dst_name": "pool.ntp.org",
            "stratum": 2,
            "result": [
                { "offset": 0.001234, "rtt": 20.0 },
                { "x": "*" }
            ]
        });
        let subs = NtpReport.substitutions(&result);
        assert_eq!(subs["stratum"], "2");
        assert_eq!(subs["offsets"], "+0.001234s *");
        assert_eq!(subs["rtts"], "20.000 *");
    }

    #[test]
    fn test_ntp_without_packets() {
        let subs = NtpReport.substitutions(&json!({ "prb_id": 44 }));
        assert_eq!(subs["stratum"], "?");
        assert_eq!(subs["offsets"], "*");
        assert_eq!(subs["rtts"], "*");
    }
}
