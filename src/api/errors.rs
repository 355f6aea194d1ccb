use serde::Deserialize;

use super::ApiFailure;
use crate::{constants::SUPPORT_ADDRESS, error::Error};

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Turns a failed creation into the error the command exits with.
///
/// The nested `error.message` detail is best effort: if the body is missing or
/// not the JSON we expect, the message is just shorter.
pub fn api_error(failure: &ApiFailure) -> Error {
    let Some(http_msg) = &failure.http_msg else {
        return Error::Api(format!(
            "There was a problem found in the attempt to create your measurement. Please \
             send the command you tried to execute to {SUPPORT_ADDRESS} and we'll try to \
             address it."
        ));
    };

    let mut message = format!(
        "There was a problem communicating with the RIPE Atlas infrastructure. The \
         message given was:\n\n  {http_msg}"
    );

    if let Some(detail) = failure
        .additional_msg
        .as_deref()
        .and_then(|body| serde_json::from_str::<ErrorBody>(body).ok())
    {
        message.push_str("\n  ");
        message.push_str(&detail.error.message);
    }

    Error::Api(message)
}
