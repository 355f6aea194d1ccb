use serde_json::Value;

use super::{Formatter, ReportKind, common, format_ms};
use crate::report::Substitutions;

pub struct PingReport;

impl Formatter for PingReport {
    fn kind(&self) -> ReportKind {
        ReportKind::Ping
    }

    fn substitutions(&self, result: &Value) -> Substitutions {
        let mut subs = common(result);
        subs.insert("sent".to_string(), count(&result["sent"]));
        subs.insert("received".to_string(), count(&result["rcvd"]));
        subs.insert("min".to_string(), format_ms(result["min"].as_f64()));
        subs.insert("avg".to_string(), format_ms(result["avg"].as_f64()));
        subs.insert("max".to_string(), format_ms(result["max"].as_f64()));
        subs
    }
}

fn count(value: &Value) -> String {
    value.as_u64().unwrap_or(0).to_string()
}
