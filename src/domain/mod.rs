//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    BatchSendMail, BatchSendMailOptions, DescAccountSummary, MailStatisticsQuery, QuerySendDetails,
    QuerySendStatistics, SEND_BATCH_SMS_MAX_RECIPIENTS, SEND_SMS_MAX_RECIPIENTS,
    SINGLE_SEND_MAIL_MAX_RECIPIENTS, SendBatchSms, SendBatchSmsOptions, SendDetailsOptions,
    SendSms, SendSmsOptions, SingleSendMail, SingleSendMailOptions, SmsStatisticsOptions,
    TemplateParams,
};
pub use response::{ErrorResponse, OK_CODE, SuccessResponse};
pub use validation::ValidationError;
pub use value::{
    AccessKeyId, AccessKeySecret, AccountName, AddressType, ApiVersion, CstDate, HtmlBody,
    MailAddress, MailStatus, PhoneNumber, RawPhoneNumber, ReceiversName, Region, SignName,
    Subject, TemplateCode, TemplateName, TemplateType, strip_e164, to_cst_date_string,
};
