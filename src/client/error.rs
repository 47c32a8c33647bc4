//! Classification of vendor error responses.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::domain::ErrorResponse;

const DAY_LIMIT_CONTROL: &str = "isv.DAY_LIMIT_CONTROL";
const MONTH_LIMIT_CONTROL: &str = "isv.MONTH_LIMIT_CONTROL";
const BUSINESS_LIMIT_CONTROL: &str = "isv.BUSINESS_LIMIT_CONTROL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Category of a classified vendor error.
pub enum ErrorKind {
    Generic,
    QuotaExceeded,
    RateLimitExceeded,
}

impl ErrorKind {
    /// Stable error name used in the textual and serialized forms.
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "AliyunError",
            Self::QuotaExceeded => "AliyunQuotaExceededError",
            Self::RateLimitExceeded => "AliyunRateLimitExceededError",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    pub message: String,
    pub response: ErrorResponse,
}

#[derive(Debug, Clone, PartialEq)]
/// A failed call, classified by the vendor's error `Code`.
///
/// The raw error body is always retained in [`ApiError::response`].
pub enum ApiError {
    Generic(ApiErrorDetail),
    /// Daily or monthly sending quota is used up.
    QuotaExceeded(ApiErrorDetail),
    /// Flow control kicked in; retrying later may succeed.
    RateLimitExceeded(ApiErrorDetail),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Generic(_) => ErrorKind::Generic,
            Self::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            Self::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn message(&self) -> &str {
        &self.detail().message
    }

    pub fn response(&self) -> &ErrorResponse {
        &self.detail().response
    }

    /// Vendor error code, when the body carried one.
    pub fn code(&self) -> Option<&str> {
        self.response().code()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RateLimitExceeded
    }

    fn detail(&self) -> &ApiErrorDetail {
        match self {
            Self::Generic(detail) | Self::QuotaExceeded(detail) | Self::RateLimitExceeded(detail) => {
                detail
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiError", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("message", self.message())?;
        state.serialize_field("response", self.response())?;
        state.end()
    }
}

/// Classify an error response under a human-readable title.
///
/// Pure: the same title and response always give an equal error.
pub fn classify(title: &str, response: ErrorResponse) -> ApiError {
    let (kind, detail) = match response.code() {
        Some(DAY_LIMIT_CONTROL) => (ErrorKind::QuotaExceeded, Some("day quota is exceeded")),
        Some(MONTH_LIMIT_CONTROL) => (ErrorKind::QuotaExceeded, Some("month quota is exceeded")),
        Some(BUSINESS_LIMIT_CONTROL) => {
            (ErrorKind::RateLimitExceeded, Some("rate limit is exceeded"))
        }
        _ => (ErrorKind::Generic, None),
    };

    let message = match detail {
        Some(detail) => format_message(title, detail),
        None => title.to_owned(),
    };
    let detail = ApiErrorDetail { message, response };

    match kind {
        ErrorKind::Generic => ApiError::Generic(detail),
        ErrorKind::QuotaExceeded => ApiError::QuotaExceeded(detail),
        ErrorKind::RateLimitExceeded => ApiError::RateLimitExceeded(detail),
    }
}

// "'X' is failed." + "rate limit is exceeded" -> "'X' is failed: rate limit is exceeded."
fn format_message(title: &str, detail: &str) -> String {
    match title.strip_suffix('.') {
        Some(stem) => format!("{stem}: {detail}."),
        None => format!("{title}: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(code: Option<&str>) -> ErrorResponse {
        let mut body = json!({
            "RequestId": "F655A8D5-B967-440B-8683-DAD6FF8DE990",
            "Message": "触发天级流控Permits:10",
        });
        if let Some(code) = code {
            body["Code"] = json!(code);
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn classification_table() {
        let title = "'SendSms' is failed.";
        let cases = [
            (
                Some("isv.DAY_LIMIT_CONTROL"),
                ErrorKind::QuotaExceeded,
                "'SendSms' is failed: day quota is exceeded.",
            ),
            (
                Some("isv.MONTH_LIMIT_CONTROL"),
                ErrorKind::QuotaExceeded,
                "'SendSms' is failed: month quota is exceeded.",
            ),
            (
                Some("isv.BUSINESS_LIMIT_CONTROL"),
                ErrorKind::RateLimitExceeded,
                "'SendSms' is failed: rate limit is exceeded.",
            ),
            (
                Some("isv.MOBILE_NUMBER_ILLEGAL"),
                ErrorKind::Generic,
                "'SendSms' is failed.",
            ),
            (None, ErrorKind::Generic, "'SendSms' is failed."),
        ];

        for (code, kind, message) in cases {
            let err = classify(title, response(code));
            assert_eq!(err.kind(), kind, "code: {code:?}");
            assert_eq!(err.message(), message, "code: {code:?}");
            assert_eq!(err.response(), &response(code));
        }
    }

    #[test]
    fn title_without_trailing_period() {
        let err = classify("Send failed", response(Some("isv.BUSINESS_LIMIT_CONTROL")));
        assert_eq!(err.message(), "Send failed: rate limit is exceeded");

        let err = classify("Send failed", response(Some("isv.OTHER")));
        assert_eq!(err.message(), "Send failed");
    }

    #[test]
    fn classification_is_idempotent() {
        let first = classify("'SendSms' is failed.", response(Some("isv.DAY_LIMIT_CONTROL")));
        let second = classify("'SendSms' is failed.", response(Some("isv.DAY_LIMIT_CONTROL")));
        assert_eq!(first, second);
    }

    #[test]
    fn names_and_retryability() {
        assert_eq!(
            classify("t.", response(None)).name(),
            "AliyunError"
        );
        let quota = classify("t.", response(Some("isv.MONTH_LIMIT_CONTROL")));
        assert_eq!(quota.name(), "AliyunQuotaExceededError");
        assert!(!quota.is_retryable());

        let rate = classify("t.", response(Some("isv.BUSINESS_LIMIT_CONTROL")));
        assert_eq!(rate.name(), "AliyunRateLimitExceededError");
        assert!(rate.is_retryable());
    }

    #[test]
    fn display_is_name_and_message() {
        let err = classify("'SendSms' is failed.", response(Some("isv.BUSINESS_LIMIT_CONTROL")));
        assert_eq!(
            err.to_string(),
            "AliyunRateLimitExceededError: 'SendSms' is failed: rate limit is exceeded."
        );
    }

    #[test]
    fn serializes_exactly_name_message_response() {
        let body = json!({
            "RequestId": "F655A8D5-B967-440B-8683-DAD6FF8DE990",
            "Code": "isv.DAY_LIMIT_CONTROL",
            "Message": "触发天级流控Permits:10",
            "Recommend": "https://next.api.aliyun.com"
        });
        let err = classify(
            "'SendSms' is failed.",
            serde_json::from_value(body).unwrap(),
        );

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "AliyunQuotaExceededError",
                "message": "'SendSms' is failed: day quota is exceeded.",
                "response": {
                    "RequestId": "F655A8D5-B967-440B-8683-DAD6FF8DE990",
                    "Code": "isv.DAY_LIMIT_CONTROL",
                    "Message": "触发天级流控Permits:10",
                    "Recommend": "https://next.api.aliyun.com"
                }
            })
        );
    }

    #[test]
    fn null_code_is_generic_and_kept_in_response() {
        let body = json!({"RequestId": "r", "Code": null, "Message": "boom"});
        let err = classify("'SendSms' is failed.", serde_json::from_value(body.clone()).unwrap());
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.code(), None);

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["response"], body);
    }

    #[test]
    fn non_string_code_is_generic() {
        let body = json!({"RequestId": 12345, "Code": 404});
        let err = classify("'SendSms' is failed.", serde_json::from_value(body.clone()).unwrap());
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.message(), "'SendSms' is failed.");
        assert_eq!(serde_json::to_value(&err).unwrap()["response"], body);
    }
}
