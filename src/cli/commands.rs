use clap::{ArgGroup, Args, Subcommand};

use super::validators::{validate_country_code, validate_probe_list};
use crate::measurement::{AddressFamily, Area, MeasureOptions, MeasurementType, Origin, Protocol};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a measurement and optionally wait for the results
    Measure(MeasureArgs),
}

/// Flags for `measure`. Anything left unset falls back to the configuration file.
#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("origin").multiple(false)))]
pub struct MeasureArgs {
    /// The type of measurement you want to create
    #[arg(value_enum, value_name = "TYPE")]
    pub kind: MeasurementType,

    /// The API key you want to use to create the measurement
    #[arg(long)]
    pub auth: Option<String>,

    /// The address family, either 4 or 6
    #[arg(long, value_enum)]
    pub af: Option<AddressFamily>,

    /// A free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// The target, either a domain name or IP address
    #[arg(long)]
    pub target: Option<String>,

    /// Don't wait for results, just print where the measurement can be found later
    #[arg(long)]
    pub no_report: bool,

    /// Create a recurring measurement with this many seconds between runs. Implies --no-report
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// The area from which you'd like to select your probes
    #[arg(long, value_enum, group = "origin")]
    pub from_area: Option<Area>,

    /// Two-letter ISO code of the country to select probes from. Example: --from-country=GR
    #[arg(long, value_name = "COUNTRY", value_parser = validate_country_code, group = "origin")]
    pub from_country: Option<String>,

    /// The prefix to select probes from. Example: --from-prefix=82.92.0.0/14
    #[arg(long, value_name = "PREFIX", group = "origin")]
    pub from_prefix: Option<String>,

    /// The ASN to select probes from. Example: --from-asn=3265
    #[arg(long, value_name = "ASN", group = "origin")]
    pub from_asn: Option<u32>,

    /// Comma-separated probe ids to use. Example: --from-probes=1,2,34,157,10006
    #[arg(long, value_name = "PROBES", value_parser = validate_probe_list, group = "origin")]
    pub from_probes: Option<String>,

    /// Reuse the probes of an existing measurement. Example: --from-measurement=1000192
    #[arg(long, value_name = "MEASUREMENT_ID", group = "origin")]
    pub from_measurement: Option<u64>,

    /// The number of probes you want to use
    #[arg(long)]
    pub probes: Option<u32>,

    /// The number of packets sent
    #[arg(long, help_heading = "Ping and Traceroute Measurements")]
    pub packets: Option<u32>,

    /// The size of packets sent
    #[arg(long, help_heading = "Ping and Traceroute Measurements")]
    pub size: Option<u32>,

    /// The traceroute protocol used
    #[arg(long, value_enum, help_heading = "Traceroute Only Measurements")]
    pub protocol: Option<Protocol>,

    /// The timeout per-packet, in milliseconds
    #[arg(long, help_heading = "Traceroute Only Measurements")]
    pub timeout: Option<u32>,

    /// Query the probe's own resolver instead of a target
    #[arg(long, help_heading = "DNS Measurements")]
    pub use_probe_resolver: bool,
}

impl MeasureArgs {
    /// The single origin flag that was set, checked in a fixed priority order.
    pub fn origin(&self) -> Option<Origin> {
        if let Some(country) = &self.from_country {
            Some(Origin::Country(country.clone()))
        } else if let Some(area) = self.from_area {
            Some(Origin::Area(area))
        } else if let Some(prefix) = &self.from_prefix {
            Some(Origin::Prefix(prefix.clone()))
        } else if let Some(asn) = self.from_asn {
            Some(Origin::Asn(asn))
        } else if let Some(probes) = &self.from_probes {
            Some(Origin::Probes(probes.clone()))
        } else {
            self.from_measurement.map(Origin::Measurement)
        }
    }

    pub fn into_options(self) -> MeasureOptions {
        let origin = self.origin();
        MeasureOptions {
            kind: self.kind,
            af: self.af,
            description: self.description,
            target: self.target,
            no_report: self.no_report,
            interval: self.interval,
            origin,
            probes: self.probes,
            packets: self.packets,
            size: self.size,
            protocol: self.protocol,
            timeout: self.timeout,
            use_probe_resolver: self.use_probe_resolver,
        }
    }
}
