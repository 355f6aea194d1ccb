use tracing::debug;

use super::types::{
    AddressFamily, MeasurementRequest, MeasurementType, Origin, Protocol, SourceSpec,
};
use crate::{
    config::Config,
    error::{Error, Result},
};

/// Parsed `measure` arguments with the origin flags already collapsed.
/// `None` means "use the configured default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureOptions {
    pub kind: MeasurementType,
    pub af: Option<AddressFamily>,
    pub description: Option<String>,
    pub target: Option<String>,
    pub no_report: bool,
    pub interval: Option<u64>,
    pub origin: Option<Origin>,
    pub probes: Option<u32>,
    pub packets: Option<u32>,
    pub size: Option<u32>,
    pub protocol: Option<Protocol>,
    pub timeout: Option<u32>,
    pub use_probe_resolver: bool,
}

/// Everything needed to submit a measurement and decide what to do afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPlan {
    pub request: MeasurementRequest,
    pub source: SourceSpec,
    /// Whether to stream results once the measurement exists
    pub wait_for_report: bool,
}

/// Merges command line options with configuration defaults.
pub fn build_plan(options: &MeasureOptions, config: &Config) -> Result<MeasurementPlan> {
    let spec = &config.specification;
    let target = resolve_target(options)?;

    let mut wait_for_report = !options.no_report;
    // An interval of zero counts as unset.
    let recurring = options
        .interval
        .filter(|i| *i > 0)
        .or(spec.times.interval.filter(|i| *i > 0));
    let (is_oneoff, interval) = match recurring {
        Some(interval) => {
            wait_for_report = false;
            (false, Some(interval))
        }
        None if !spec.times.one_off => {
            return Err(Error::InvalidConfiguration(
                "Your configuration file appears to be setup to not create one-offs, but \
                 also offers no interval value. Without one of these, we cannot create a \
                 measurement."
                    .to_string(),
            ));
        }
        None => (true, None),
    };

    let mut request = MeasurementRequest {
        kind: options.kind,
        af: options.af.unwrap_or(spec.af),
        description: options
            .description
            .clone()
            .unwrap_or_else(|| spec.description.clone()),
        target,
        is_oneoff,
        interval,
        packets: None,
        size: None,
        protocol: None,
        timeout: None,
        use_probe_resolver: None,
    };

    if options.kind.sends_packets() {
        request.packets = Some(options.packets.unwrap_or(spec.types.ping.packets));
        request.size = Some(options.size.unwrap_or(spec.types.ping.size));
    }
    if options.kind == MeasurementType::Traceroute {
        request.protocol = Some(options.protocol.unwrap_or(spec.types.traceroute.protocol));
        request.timeout = Some(options.timeout.unwrap_or(spec.types.traceroute.timeout));
    }
    if options.kind == MeasurementType::Dns && options.use_probe_resolver {
        request.use_probe_resolver = Some(true);
    }

    let source = resolve_source(options, config);
    debug!(?request, ?source, wait_for_report, "Built measurement plan");

    Ok(MeasurementPlan {
        request,
        source,
        wait_for_report,
    })
}

/// DNS measurements using the probe's resolver must not name a target; all
/// others must.
fn resolve_target(options: &MeasureOptions) -> Result<Option<String>> {
    let target = options.target.as_ref().filter(|t| !t.is_empty());

    if options.kind == MeasurementType::Dns && options.use_probe_resolver {
        return match target {
            Some(_) => Err(Error::ConflictingArgument(
                "You may not specify a target for a DNS measurement that uses the probe's \
                 resolver"
                    .to_string(),
            )),
            None => Ok(None),
        };
    }

    match target {
        Some(target) => Ok(Some(target.clone())),
        None => Err(Error::MissingArgument(
            "You must specify a target for that kind of measurement".to_string(),
        )),
    }
}

/// An explicit origin flag replaces the configured source type and value;
/// otherwise the configured source is used as is.
fn resolve_source(options: &MeasureOptions, config: &Config) -> SourceSpec {
    let mut source = config.specification.source.clone();
    if let Some(origin) = &options.origin {
        source.kind = Some(origin.kind());
        source.value = Some(origin.value());
    }
    if let Some(requested) = options.probes {
        source.requested = requested;
    }
    source
}
