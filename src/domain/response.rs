use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `Code` value the vendor uses for business-level success.
pub const OK_CODE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Successful response body.
///
/// The known core fields are typed; every action-specific field (`BizId`,
/// `EnvId`, `Data`, ...) is kept in [`SuccessResponse::extra`].
pub struct SuccessResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SuccessResponse {
    /// Look up an action-specific field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Look up an action-specific field that holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Error response body, retained verbatim for diagnostics.
///
/// The decoded JSON object is kept as is, so serializing it again yields the
/// vendor's payload unchanged (including `null` values and fields of an
/// unexpected type). The core fields are read through string accessors.
pub struct ErrorResponse(Map<String, Value>);

impl ErrorResponse {
    pub fn new(body: Map<String, Value>) -> Self {
        Self(body)
    }

    /// Look up any field of the body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// `Code`, when present as a string.
    pub fn code(&self) -> Option<&str> {
        self.get_str("Code")
    }

    pub fn request_id(&self) -> Option<&str> {
        self.get_str("RequestId")
    }

    pub fn message(&self) -> Option<&str> {
        self.get_str("Message")
    }

    pub fn host_id(&self) -> Option<&str> {
        self.get_str("HostId")
    }

    pub fn recommend(&self) -> Option<&str> {
        self.get_str("Recommend")
    }

    /// The whole decoded body.
    pub fn body(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ErrorResponse {
    fn from(body: Map<String, Value>) -> Self {
        Self(body)
    }
}
