//! Value parsers for command line arguments that need more than a type check.

use crate::error::Error;

/// Accepts a two-letter ISO country code and returns it uppercased.
pub fn validate_country_code(value: &str) -> Result<String, Error> {
    let mut chars = value.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            Ok(value.to_ascii_uppercase())
        }
        _ => Err(Error::InvalidArgument(
            "Countries must be defined with a two-letter ISO code".to_string(),
        )),
    }
}

/// Accepts a comma-separated list of probe ids. No range checking is done.
pub fn validate_probe_list(value: &str) -> Result<String, Error> {
    let well_formed = value
        .split(',')
        .all(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()));

    if well_formed {
        Ok(value.to_string())
    } else {
        Err(Error::InvalidArgument(
            "The probe ids supplied were not in the correct format. Note that you must \
             specify them as a list of comma-separated integers without spaces. \
             Example: --from-probes=1,2,34,157,10006"
                .to_string(),
        ))
    }
}
