use serde_json::Value;

use super::{Formatter, ReportKind, common, format_ms};
use crate::report::Substitutions;

pub struct DnsReport;

impl Formatter for DnsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Dns
    }

    fn substitutions(&self, result: &Value) -> Substitutions {
        let mut subs = common(result);

        // Queries sent to the probe's own resolvers come back as a result set.
        let answers: Vec<&Value> = match result["resultset"].as_array() {
            Some(set) => set.iter().collect(),
            None => vec![result],
        };
        let summary = answers
            .iter()
            .copied()
            .map(summarize)
            .collect::<Vec<_>>()
            .join("; ");

        subs.insert("summary".to_string(), summary);
        subs
    }
}

fn summarize(answer: &Value) -> String {
    let resolver = answer["dst_addr"].as_str();
    let outcome = match answer.get("result") {
        Some(result) => format!(
            "{} answer(s) in {} ms",
            result["ANCOUNT"].as_u64().unwrap_or(0),
            format_ms(result["rt"].as_f64())
        ),
        None => match answer.get("error") {
            Some(error) => format!("error: {}", error_text(error)),
            None => "no response".to_string(),
        },
    };
    match resolver {
        Some(resolver) => format!("{resolver}: {outcome}"),
        None => outcome,
    }
}

fn error_text(error: &Value) -> String {
    match error {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v.as_str() {
                Some(s) => format!("{k} {s}"),
                None => format!("{k} {v}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_dns_answer() {
        let result = json!({
            "prb_id": 12,
            "dst_addr": "193.0.14.129",
            "result": { "ANCOUNT": 2, "rt": 23.456, "size": 120 }
        });
        let subs = DnsReport.substitutions(&result);
        assert_eq!(subs["summary"], "193.0.14.129: 2 answer(s) in 23.456 ms");
    }

    #[test]
    fn test_dns_error() {
        let result = json!({ "prb_id": 12, "error": { "timeout": 5000 } });
        let subs = DnsReport.substitutions(&result);
        assert_eq!(subs["summary"], "error: timeout 5000");
    }

    #[test]
    fn test_dns_probe_resolvers() {
        let result = json!({
            "prb_id": 12,
            "resultset": [
                { "dst_addr": "10.0.0.53", "result": { "ANCOUNT": 1, "rt": 5.0 } },
                { "dst_addr": "10.0.1.53", "error": { "socket": "connect failed" } }
            ]
        });
        let subs = DnsReport.substitutions(&result);
        assert_eq!(
            subs["summary"],
            "10.0.0.53: 1 answer(s) in 5.000 ms; 10.0.1.53: error: socket connect failed"
        );
        assert_eq!(subs["target"], "*");
    }
}
