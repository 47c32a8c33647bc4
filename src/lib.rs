//! Typed Rust client for Alibaba Cloud RPC-style OpenAPI products.
//!
//! Requests are signed with signature version 1.0 (HMAC-SHA1) and posted as
//! forms. The crate has a domain layer of validated types, a transport layer
//! for parameter layering, signing and response decoding, and a client layer
//! that performs the call and classifies vendor errors (quota and rate limit
//! errors get their own kinds). [`SmsApi`] and [`EmailApi`] wrap the Short
//! Message Service and DirectMail actions.
//!
//! ```rust,no_run
//! use aliyun_openapi::{
//!     AliyunClient, Credentials, EndpointConfig, RawPhoneNumber, SendSms, SendSmsOptions,
//!     SignName, SmsApi, TemplateCode, TemplateParams,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aliyun_openapi::OpenApiError> {
//!     let client = AliyunClient::new(Credentials::from_env()?, EndpointConfig::sms());
//!     let sms = SmsApi::new(client);
//!
//!     let mut params = TemplateParams::new();
//!     params.insert("code".to_owned(), "1234".to_owned());
//!     let request = SendSms::new(
//!         vec![RawPhoneNumber::new("13812345678")?],
//!         SignName::new("阿里云短信测试")?,
//!         TemplateCode::new("SMS_154950909")?,
//!         params,
//!         SendSmsOptions::default(),
//!     )?;
//!     let response = sms.send(&request).await?;
//!     println!("BizId: {:?}", response.get_str("BizId"));
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    AliyunClient, AliyunClientBuilder, ApiError, ApiErrorDetail, Credentials, EmailApi,
    EndpointConfig, ErrorKind, OpenApiError, SmsApi, classify,
};
pub use domain::{
    AccessKeyId, AccessKeySecret, AccountName, AddressType, BatchSendMail, BatchSendMailOptions,
    CstDate, DescAccountSummary, ErrorResponse, HtmlBody, MailAddress, MailStatisticsQuery, MailStatus, PhoneNumber,
    QuerySendDetails, QuerySendStatistics, RawPhoneNumber, ReceiversName, Region, SendBatchSms,
    SendBatchSmsOptions, SendDetailsOptions, SendSms, SendSmsOptions, SignName, SingleSendMail,
    SingleSendMailOptions, SmsStatisticsOptions, Subject, SuccessResponse, TemplateCode,
    TemplateName, TemplateParams, TemplateType, ValidationError, strip_e164, to_cst_date_string,
};
pub use transport::{
    CommonParams, Outcome, ParamLayers, Params, Priority, SIGNATURE, SignedParams,
    TransportError, canonical_query, compute_signature, decode_response, percent_encode, sign,
    string_to_sign,
};
