//! Client layer: signs requests, performs the HTTP call and classifies failures.

mod config;
mod email;
mod error;
mod sms;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::domain::{SuccessResponse, ValidationError};
use crate::transport::{
    CommonParams, Outcome, ParamLayers, Params, Priority, TransportError, decode_response, sign,
};

pub use config::{
    ACCESS_KEY_ID_ENV, ACCESS_KEY_SECRET_ENV, Credentials, EMAIL_API_VERSION, EMAIL_ENDPOINT,
    EndpointConfig, SMS_API_VERSION, SMS_ENDPOINT,
};
pub use email::EmailApi;
pub use error::{ApiError, ApiErrorDetail, ErrorKind, classify};
pub use sms::SmsApi;

const MAX_ERROR_BODY_CHARS: usize = 200;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            // `form` keeps the pair order, so the body is the signed order.
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`AliyunClient`] and the service façades.
pub enum OpenApiError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The body was not a JSON object, so it cannot be classified.
    #[error("unparsable response (HTTP {status}): {body}")]
    Parse {
        status: u16,
        /// Body truncated to a short prefix.
        body: String,
        #[source]
        source: TransportError,
    },

    /// The vendor reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl OpenApiError {
    /// The classified vendor error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.api().map(ApiError::kind)
    }
}

#[derive(Debug, Clone)]
/// Builder for [`AliyunClient`].
pub struct AliyunClientBuilder {
    credentials: Credentials,
    endpoint: EndpointConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl AliyunClientBuilder {
    pub fn new(credentials: Credentials, endpoint: EndpointConfig) -> Self {
        Self {
            credentials,
            endpoint,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<AliyunClient, OpenApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| OpenApiError::Transport(Box::new(err)))?;

        Ok(AliyunClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// RPC-style client bound to one product endpoint and API version.
///
/// Each call gets a fresh nonce and timestamp, is signed with HMAC-SHA1 and
/// posted as a form. A call succeeds only when the HTTP status is 2xx and the
/// body's `Code` is absent or `OK`; everything else is classified into an
/// [`ApiError`]. The client is cheap to clone and safe to share across tasks.
pub struct AliyunClient {
    credentials: Credentials,
    endpoint: EndpointConfig,
    http: Arc<dyn HttpTransport>,
}

impl AliyunClient {
    /// Create a client with default HTTP settings.
    ///
    /// For a timeout or user-agent, use [`AliyunClient::builder`].
    pub fn new(credentials: Credentials, endpoint: EndpointConfig) -> Self {
        Self {
            credentials,
            endpoint,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    pub fn builder(credentials: Credentials, endpoint: EndpointConfig) -> AliyunClientBuilder {
        AliyunClientBuilder::new(credentials, endpoint)
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Call `action` with caller-supplied parameters.
    ///
    /// The parameters may override any protocol default except `Signature`.
    pub async fn send(&self, action: &str, params: Params) -> Result<SuccessResponse, OpenApiError> {
        self.send_layered(action, ParamLayers::new().layer(Priority::Caller, params))
            .await
    }

    /// Call `action` with an explicit set of parameter layers.
    pub async fn send_layered(
        &self,
        action: &str,
        layers: ParamLayers,
    ) -> Result<SuccessResponse, OpenApiError> {
        let common = CommonParams::fresh(
            action,
            self.endpoint.version(),
            self.credentials.access_key_id().as_str(),
        );
        let signed = sign(self.credentials.access_key_secret().expose(), common, layers);

        let url = self.endpoint.url();
        debug!("POST {action} to {url}");
        let response = self
            .http
            .post_form(url, signed.into_pairs())
            .await
            .map_err(OpenApiError::Transport)?;
        debug!("{action} answered with HTTP {}", response.status);

        let outcome =
            decode_response(response.status, &response.body).map_err(|source| {
                OpenApiError::Parse {
                    status: response.status,
                    body: truncate_str(&response.body, MAX_ERROR_BODY_CHARS).to_owned(),
                    source,
                }
            })?;

        match outcome {
            Outcome::Success(body) => Ok(body),
            Outcome::Failure(body) => {
                debug!(
                    "{action} failed with code {:?}, request id {:?}",
                    body.code(),
                    body.request_id()
                );
                Err(classify(&format!("'{action}' is failed."), body).into())
            }
        }
    }
}

fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_params: Vec<(String, String)>,
        calls: usize,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        pub(crate) fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_params: Vec::new(),
                    calls: 0,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        pub(crate) fn last_request(&self) -> (Option<String>, Vec<(String, String)>) {
            let state = self.state.lock().unwrap();
            (state.last_url.clone(), state.last_params.clone())
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_params = params;
                    state.calls += 1;
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    struct FailingTransport;

    impl HttpTransport for FailingTransport {
        fn post_form<'a>(
            &'a self,
            _url: &'a str,
            _params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                Err::<HttpResponse, _>(Box::<dyn StdError + Send + Sync>::from(
                    "connection refused",
                ))
            })
        }
    }

    pub(crate) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    pub(crate) fn make_client(endpoint: EndpointConfig, transport: FakeTransport) -> AliyunClient {
        AliyunClient {
            credentials: Credentials::new("testid", "testsecret").unwrap(),
            endpoint,
            http: Arc::new(transport),
        }
    }

    fn sms_client(transport: FakeTransport) -> AliyunClient {
        make_client(EndpointConfig::sms(), transport)
    }

    fn sms_params() -> Params {
        Params::new()
            .with("PhoneNumbers", "13812345678")
            .with("SignName", "阿里云短信测试")
            .with("TemplateCode", "SMS_154950909")
            .with("TemplateParam", r#"{"code":"1234"}"#)
    }

    #[tokio::test]
    async fn send_posts_signed_params_and_returns_body() {
        let json = r#"{"Message":"OK","RequestId":"r-1","BizId":"900619746936498440^0","Code":"OK"}"#;
        let transport = FakeTransport::new(200, json);
        let client = sms_client(transport.clone());

        let response = client.send("SendSms", sms_params()).await.unwrap();
        assert_eq!(response.request_id.as_deref(), Some("r-1"));
        assert_eq!(response.get_str("BizId"), Some("900619746936498440^0"));

        let (url, params) = transport.last_request();
        assert_eq!(url.as_deref(), Some("https://dysmsapi.aliyuncs.com/"));
        assert_param(&params, "Action", "SendSms");
        assert_param(&params, "Version", "2017-05-25");
        assert_param(&params, "Format", "JSON");
        assert_param(&params, "AccessKeyId", "testid");
        assert_param(&params, "SignatureMethod", "HMAC-SHA1");
        assert_param(&params, "SignatureVersion", "1.0");
        assert_param(&params, "SignName", "阿里云短信测试");
        assert_eq!(params.last().map(|(k, _)| k.as_str()), Some("Signature"));
        assert!(params.iter().any(|(k, _)| k == "SignatureNonce"));
        assert!(params.iter().any(|(k, _)| k == "Timestamp"));
    }

    #[tokio::test]
    async fn missing_code_with_200_is_success() {
        let transport = FakeTransport::new(200, r#"{"RequestId":"r-2","EnvId":"201663123603"}"#);
        let client = sms_client(transport);

        let response = client.send("QuerySendStatistics", Params::new()).await.unwrap();
        assert_eq!(response.get_str("EnvId"), Some("201663123603"));
    }

    #[tokio::test]
    async fn business_error_with_200_is_rate_limited() {
        let json = r#"{"RequestId":"r-3","Code":"isv.BUSINESS_LIMIT_CONTROL","Message":"触发分钟级流控Permits:1"}"#;
        let client = sms_client(FakeTransport::new(200, json));

        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RateLimitExceeded));
        let api = err.api().unwrap();
        assert_eq!(api.message(), "'SendSms' is failed: rate limit is exceeded.");
        assert_eq!(api.response().request_id(), Some("r-3"));
        assert!(api.is_retryable());
        assert_eq!(
            err.to_string(),
            "AliyunRateLimitExceededError: 'SendSms' is failed: rate limit is exceeded."
        );
    }

    #[tokio::test]
    async fn non_2xx_is_generic_failure() {
        let json = r#"{"RequestId":"r-4","Code":"InvalidAccessKeyId.NotFound","Message":"Specified access key is not found.","HostId":"dysmsapi.aliyuncs.com"}"#;
        let client = sms_client(FakeTransport::new(404, json));

        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        let api = err.api().unwrap();
        assert_eq!(api.kind(), ErrorKind::Generic);
        assert_eq!(api.message(), "'SendSms' is failed.");
        assert_eq!(api.code(), Some("InvalidAccessKeyId.NotFound"));
        assert_eq!(api.response().host_id(), Some("dysmsapi.aliyuncs.com"));
    }

    #[tokio::test]
    async fn non_2xx_with_ok_code_is_still_failure() {
        let client = sms_client(FakeTransport::new(500, r#"{"RequestId":"r-5","Code":"OK"}"#));
        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Generic));
    }

    #[tokio::test]
    async fn numeric_request_id_is_still_classified() {
        let json = r#"{"RequestId":12345,"Code":"isv.DAY_LIMIT_CONTROL","Message":"触发天级流控Permits:10"}"#;
        let client = sms_client(FakeTransport::new(200, json));

        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::QuotaExceeded));
        let api = err.api().unwrap();
        assert_eq!(api.response().request_id(), None);
        assert_eq!(api.response().get("RequestId"), Some(&serde_json::Value::from(12345)));
    }

    #[tokio::test]
    async fn error_body_is_serialized_verbatim() {
        let json = r#"{"RequestId":"r","Code":null,"Message":"boom"}"#;
        let client = sms_client(FakeTransport::new(500, json));

        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Generic));
        let value = serde_json::to_value(err.api().unwrap()).unwrap();
        assert_eq!(
            value["response"],
            serde_json::json!({"RequestId": "r", "Code": null, "Message": "boom"})
        );
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let body = "x".repeat(500);
        let client = sms_client(FakeTransport::new(502, body));

        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        match err {
            OpenApiError::Parse { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let client = AliyunClient {
            credentials: Credentials::new("testid", "testsecret").unwrap(),
            endpoint: EndpointConfig::sms(),
            http: Arc::new(FailingTransport),
        };
        let err = client.send("SendSms", sms_params()).await.unwrap_err();
        assert!(matches!(err, OpenApiError::Transport(_)));
        assert_eq!(err.kind(), None);
    }

    #[tokio::test]
    async fn caller_cannot_supply_signature() {
        let transport = FakeTransport::new(200, r#"{"Code":"OK"}"#);
        let client = sms_client(transport.clone());

        client
            .send("SendSms", sms_params().with("Signature", "forged"))
            .await
            .unwrap();

        let (_, params) = transport.last_request();
        let signatures = params
            .iter()
            .filter(|(k, _)| k == "Signature")
            .collect::<Vec<_>>();
        assert_eq!(signatures.len(), 1);
        assert_ne!(signatures[0].1, "forged");
    }

    #[tokio::test]
    async fn each_call_gets_a_fresh_nonce() {
        let transport = FakeTransport::new(200, r#"{"Code":"OK"}"#);
        let client = sms_client(transport.clone());

        client.send("SendSms", sms_params()).await.unwrap();
        let (_, first) = transport.last_request();
        client.send("SendSms", sms_params()).await.unwrap();
        let (_, second) = transport.last_request();

        let nonce = |params: &[(String, String)]| {
            params
                .iter()
                .find(|(k, _)| k == "SignatureNonce")
                .map(|(_, v)| v.clone())
        };
        assert_ne!(nonce(&first), nonce(&second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_sends_share_one_client() {
        let transport = FakeTransport::new(200, r#"{"Code":"OK"}"#);
        let client = sms_client(transport.clone());

        let handles = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.send("SendSms", sms_params()).await })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(transport.calls(), 8);
    }

    #[test]
    fn builder_applies_settings() {
        let client = AliyunClient::builder(
            Credentials::new("testid", "testsecret").unwrap(),
            EndpointConfig::email(),
        )
        .timeout(Duration::from_secs(5))
        .user_agent("aliyun-openapi-tests")
        .build()
        .unwrap();
        assert_eq!(client.endpoint().url(), "https://dm.aliyuncs.com/");
    }

    #[test]
    fn truncate_str_respects_char_boundaries() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
        assert_eq!(truncate_str("流控流控", 2), "流控");
    }
}
