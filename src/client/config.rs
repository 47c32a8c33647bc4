use std::env;

use url::Url;

use crate::domain::{AccessKeyId, AccessKeySecret, ApiVersion, ValidationError};

pub const ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

pub const SMS_API_VERSION: &str = "2017-05-25";
pub const SMS_ENDPOINT: &str = "dysmsapi.aliyuncs.com";
pub const EMAIL_API_VERSION: &str = "2015-11-23";
pub const EMAIL_ENDPOINT: &str = "dm.aliyuncs.com";

#[derive(Debug, Clone)]
/// AccessKey pair used to sign every request.
///
/// The secret is redacted from `Debug` output.
pub struct Credentials {
    access_key_id: AccessKeyId,
    access_key_secret: AccessKeySecret,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            access_key_id: AccessKeyId::new(access_key_id)?,
            access_key_secret: AccessKeySecret::new(access_key_secret)?,
        })
    }

    /// Read `ALIBABA_CLOUD_ACCESS_KEY_ID` and `ALIBABA_CLOUD_ACCESS_KEY_SECRET`.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ValidationError::MissingEnv { name })
        };
        Self::new(read(ACCESS_KEY_ID_ENV)?, read(ACCESS_KEY_SECRET_ENV)?)
    }

    pub fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    pub(crate) fn access_key_secret(&self) -> &AccessKeySecret {
        &self.access_key_secret
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Product endpoint and API version a client talks to.
pub struct EndpointConfig {
    version: String,
    endpoint: String,
    url: String,
}

impl EndpointConfig {
    /// `endpoint` is either a bare host (`dysmsapi.aliyuncs.com`, served over
    /// HTTPS) or a full `http(s)://` URL.
    pub fn new(
        version: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let version = ApiVersion::new(version)?.as_str().to_owned();
        let endpoint = endpoint.into().trim().to_owned();
        if endpoint.is_empty() {
            return Err(ValidationError::Empty { field: "Endpoint" });
        }

        let candidate = if endpoint.contains("://") {
            endpoint.clone()
        } else {
            format!("https://{endpoint}")
        };
        let url = Url::parse(&candidate)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .ok_or_else(|| ValidationError::InvalidEndpoint {
                input: endpoint.clone(),
            })?;

        Ok(Self {
            version,
            endpoint,
            url: url.into(),
        })
    }

    /// Short Message Service, `dysmsapi.aliyuncs.com`.
    pub fn sms() -> Self {
        Self::preset(SMS_API_VERSION, SMS_ENDPOINT)
    }

    /// DirectMail, `dm.aliyuncs.com`.
    pub fn email() -> Self {
        Self::preset(EMAIL_API_VERSION, EMAIL_ENDPOINT)
    }

    fn preset(version: &str, host: &str) -> Self {
        Self {
            version: version.to_owned(),
            endpoint: host.to_owned(),
            url: format!("https://{host}/"),
        }
    }

    /// Value of the `Version` parameter.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The endpoint as configured.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Absolute URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}
