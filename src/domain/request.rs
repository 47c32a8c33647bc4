use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    AccountName, AddressType, CstDate, HtmlBody, MailAddress, MailStatus, RawPhoneNumber,
    ReceiversName, Region, SignName, Subject, TemplateCode, TemplateName, TemplateType,
};

pub const SEND_SMS_MAX_RECIPIENTS: usize = 1000;
pub const SEND_BATCH_SMS_MAX_RECIPIENTS: usize = 100;
pub const SINGLE_SEND_MAIL_MAX_RECIPIENTS: usize = 100;

/// Template variables, serialized as a JSON object (`TemplateParam`).
pub type TemplateParams = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct SendSmsOptions {
    pub sms_up_extend_code: Option<String>,
    pub out_id: Option<String>,
}

#[derive(Debug, Clone)]
/// `SendSms`: one template rendered with the same variables for every number.
pub struct SendSms {
    phone_numbers: Vec<RawPhoneNumber>,
    sign_name: SignName,
    template_code: TemplateCode,
    template_param: TemplateParams,
    options: SendSmsOptions,
}

impl SendSms {
    pub const ACTION: &'static str = "SendSms";

    pub fn new(
        phone_numbers: Vec<RawPhoneNumber>,
        sign_name: SignName,
        template_code: TemplateCode,
        template_param: TemplateParams,
        options: SendSmsOptions,
    ) -> Result<Self, ValidationError> {
        check_recipients(phone_numbers.len(), SEND_SMS_MAX_RECIPIENTS, RawPhoneNumber::FIELD)?;
        Ok(Self {
            phone_numbers,
            sign_name,
            template_code,
            template_param,
            options,
        })
    }

    pub fn phone_numbers(&self) -> &[RawPhoneNumber] {
        &self.phone_numbers
    }

    pub fn sign_name(&self) -> &SignName {
        &self.sign_name
    }

    pub fn template_code(&self) -> &TemplateCode {
        &self.template_code
    }

    pub fn template_param(&self) -> &TemplateParams {
        &self.template_param
    }

    pub fn options(&self) -> &SendSmsOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendBatchSmsOptions {
    /// One upstream extend code per recipient, when set.
    pub sms_up_extend_codes: Option<Vec<String>>,
    pub out_id: Option<String>,
}

#[derive(Debug, Clone)]
/// `SendBatchSms`: a per-recipient sign name and template variables.
///
/// Invariant: numbers, sign names and template params have the same non-zero length.
pub struct SendBatchSms {
    phone_numbers: Vec<RawPhoneNumber>,
    sign_names: Vec<SignName>,
    template_code: TemplateCode,
    template_params: Vec<TemplateParams>,
    options: SendBatchSmsOptions,
}

impl SendBatchSms {
    pub const ACTION: &'static str = "SendBatchSms";

    pub fn new(
        phone_numbers: Vec<RawPhoneNumber>,
        sign_names: Vec<SignName>,
        template_code: TemplateCode,
        template_params: Vec<TemplateParams>,
        options: SendBatchSmsOptions,
    ) -> Result<Self, ValidationError> {
        let expected = phone_numbers.len();
        check_recipients(expected, SEND_BATCH_SMS_MAX_RECIPIENTS, "PhoneNumberJson")?;
        check_length("SignNameJson", expected, sign_names.len())?;
        check_length("TemplateParamJson", expected, template_params.len())?;
        if let Some(codes) = options.sms_up_extend_codes.as_ref() {
            check_length("SmsUpExtendCodeJson", expected, codes.len())?;
        }
        Ok(Self {
            phone_numbers,
            sign_names,
            template_code,
            template_params,
            options,
        })
    }

    pub fn phone_numbers(&self) -> &[RawPhoneNumber] {
        &self.phone_numbers
    }

    pub fn sign_names(&self) -> &[SignName] {
        &self.sign_names
    }

    pub fn template_code(&self) -> &TemplateCode {
        &self.template_code
    }

    pub fn template_params(&self) -> &[TemplateParams] {
        &self.template_params
    }

    pub fn options(&self) -> &SendBatchSmsOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmsStatisticsOptions {
    pub page_size: Option<u32>,
    pub page_index: Option<u32>,
    pub template_type: Option<TemplateType>,
    pub sign_name: Option<SignName>,
}

#[derive(Debug, Clone)]
/// `QuerySendStatistics` over a CST date range (within the recent 30 days).
pub struct QuerySendStatistics {
    pub region: Region,
    pub start_date: CstDate,
    pub end_date: CstDate,
    pub options: SmsStatisticsOptions,
}

impl QuerySendStatistics {
    pub const ACTION: &'static str = "QuerySendStatistics";

    pub fn new(region: Region, start_date: CstDate, end_date: CstDate) -> Self {
        Self {
            region,
            start_date,
            end_date,
            options: SmsStatisticsOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SmsStatisticsOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendDetailsOptions {
    pub biz_id: Option<String>,
    pub page_size: Option<u32>,
    pub current_page: Option<u32>,
}

#[derive(Debug, Clone)]
/// `QuerySendDetails` for one number on one CST date.
pub struct QuerySendDetails {
    pub phone_number: RawPhoneNumber,
    pub send_date: CstDate,
    pub options: SendDetailsOptions,
}

impl QuerySendDetails {
    pub const ACTION: &'static str = "QuerySendDetails";

    pub fn new(phone_number: RawPhoneNumber, send_date: CstDate) -> Self {
        Self {
            phone_number,
            send_date,
            options: SendDetailsOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendDetailsOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SingleSendMailOptions {
    pub address_type: Option<AddressType>,
    pub reply_to_address: Option<bool>,
    pub click_trace: Option<bool>,
    pub from_alias: Option<String>,
    pub tag_name: Option<String>,
    pub reply_address: Option<String>,
    pub reply_address_alias: Option<String>,
}

#[derive(Debug, Clone)]
/// `SingleSendMail`: one HTML mail to up to 100 addresses.
pub struct SingleSendMail {
    account_name: AccountName,
    to: Vec<MailAddress>,
    subject: Subject,
    html_body: HtmlBody,
    options: SingleSendMailOptions,
}

impl SingleSendMail {
    pub const ACTION: &'static str = "SingleSendMail";

    pub fn new(
        account_name: AccountName,
        to: Vec<MailAddress>,
        subject: Subject,
        html_body: HtmlBody,
        options: SingleSendMailOptions,
    ) -> Result<Self, ValidationError> {
        check_recipients(to.len(), SINGLE_SEND_MAIL_MAX_RECIPIENTS, MailAddress::FIELD)?;
        Ok(Self {
            account_name,
            to,
            subject,
            html_body,
            options,
        })
    }

    pub fn account_name(&self) -> &AccountName {
        &self.account_name
    }

    pub fn to(&self) -> &[MailAddress] {
        &self.to
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn html_body(&self) -> &HtmlBody {
        &self.html_body
    }

    pub fn options(&self) -> &SingleSendMailOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchSendMailOptions {
    pub address_type: Option<AddressType>,
    pub click_trace: Option<bool>,
    pub tag_name: Option<String>,
    pub reply_address: Option<String>,
    pub reply_address_alias: Option<String>,
}

#[derive(Debug, Clone)]
/// `BatchSendMail`: a stored template sent to a stored receiver list.
pub struct BatchSendMail {
    pub account_name: AccountName,
    pub receivers_name: ReceiversName,
    pub template_name: TemplateName,
    pub options: BatchSendMailOptions,
}

impl BatchSendMail {
    pub const ACTION: &'static str = "BatchSendMail";

    pub fn new(
        account_name: AccountName,
        receivers_name: ReceiversName,
        template_name: TemplateName,
    ) -> Self {
        Self {
            account_name,
            receivers_name,
            template_name,
            options: BatchSendMailOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchSendMailOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default)]
/// `SenderStatisticsDetailByParam` filters; every field is optional.
pub struct MailStatisticsQuery {
    pub account_name: Option<AccountName>,
    pub tag_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub to_address: Option<MailAddress>,
    pub status: Option<MailStatus>,
    pub length: Option<u32>,
    pub next_start: Option<String>,
}

impl MailStatisticsQuery {
    pub const ACTION: &'static str = "SenderStatisticsDetailByParam";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// `DescAccountSummary`: account quotas, domains and templates. Takes no parameters.
pub struct DescAccountSummary;

impl DescAccountSummary {
    pub const ACTION: &'static str = "DescAccountSummary";
}

fn check_recipients(actual: usize, max: usize, field: &'static str) -> Result<(), ValidationError> {
    if actual == 0 {
        return Err(ValidationError::Empty { field });
    }
    if actual > max {
        return Err(ValidationError::TooManyRecipients { max, actual });
    }
    Ok(())
}

fn check_length(
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ValidationError> {
    if expected != actual {
        return Err(ValidationError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
