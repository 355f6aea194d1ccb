use serde_json::Value;

use super::{Formatter, ReportKind, common, format_ms};
use crate::report::Substitutions;

pub struct SslReport;

impl Formatter for SslReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Ssl
    }

    fn substitutions(&self, result: &Value) -> Substitutions {
        let mut subs = common(result);

        let summary = if let Some(err) = result["err"].as_str() {
            format!("error: {err}")
        } else if let Some(alert) = result.get("alert") {
            format!("alert: {alert}")
        } else {
            let certificates = result["cert"].as_array().map_or(0, Vec::len);
            format!(
                "{certificates} certificate(s), TLS {}, {} ms",
                result["ver"].as_str().unwrap_or("?"),
                format_ms(result["rt"].as_f64())
            )
        };

        let port = match &result["dst_port"] {
            Value::String(port) => port.clone(),
            Value::Number(port) => port.to_string(),
            _ => "443".to_string(),
        };

        subs.insert("port".to_string(), port);
        subs.insert("summary".to_string(), summary);
        subs
    }
}
