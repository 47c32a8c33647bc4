use serde_json::{Map, Value};

use crate::domain::{ErrorResponse, OK_CODE, SuccessResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decoded response body, already split into success and failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(SuccessResponse),
    Failure(ErrorResponse),
}

/// Decode a response body regardless of its HTTP status.
///
/// The vendor reports some business errors with HTTP 200, so success requires a
/// 2xx status and either no `Code` at all or `Code == "OK"`. A `null` or empty
/// `Code` counts as absent. Any JSON object that is not a success becomes a
/// failure; only a body that is not a JSON object is an error.
pub fn decode_response(status: u16, body: &str) -> Result<Outcome, TransportError> {
    let object: Map<String, Value> = serde_json::from_str(body)?;
    let business_ok = match object.get("Code") {
        None | Some(Value::Null) => true,
        Some(Value::String(code)) => code.is_empty() || code == OK_CODE,
        Some(_) => false,
    };

    if (200..=299).contains(&status) && business_ok {
        Ok(Outcome::Success(serde_json::from_value(Value::Object(
            object,
        ))?))
    } else {
        // Kept whole: classification only needs `Code`, whatever else the body holds.
        Ok(Outcome::Failure(ErrorResponse::new(object)))
    }
}
