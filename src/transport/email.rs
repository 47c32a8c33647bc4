use crate::domain::{
    AccountName, AddressType, BatchSendMail, DescAccountSummary, HtmlBody, MailAddress, MailStatisticsQuery,
    ReceiversName, SingleSendMail, Subject, TemplateName,
};
use crate::transport::params::{ParamLayers, Params, Priority};

const ADDRESS_TYPE: &str = "AddressType";
const CLICK_TRACE: &str = "ClickTrace";

pub fn encode_single_send_mail(request: &SingleSendMail) -> ParamLayers {
    let defaults = Params::new()
        .with(ADDRESS_TYPE, AddressType::default().as_param())
        .with("ReplyToAddress", false)
        .with(CLICK_TRACE, 0);

    let to = request
        .to()
        .iter()
        .map(MailAddress::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let options = request.options();
    let mut params = Params::new();
    params
        .insert(AccountName::FIELD, request.account_name().as_str())
        .insert(MailAddress::FIELD, to)
        .insert(Subject::FIELD, request.subject().as_str())
        .insert(HtmlBody::FIELD, request.html_body().as_str())
        .insert_opt(ADDRESS_TYPE, options.address_type.map(AddressType::as_param))
        .insert_opt("ReplyToAddress", options.reply_to_address)
        .insert_opt(CLICK_TRACE, options.click_trace.map(u8::from))
        .insert_opt("FromAlias", options.from_alias.as_deref())
        .insert_opt("TagName", options.tag_name.as_deref())
        .insert_opt("ReplyAddress", options.reply_address.as_deref())
        .insert_opt("ReplyAddressAlias", options.reply_address_alias.as_deref());

    ParamLayers::new()
        .layer(Priority::ActionDefaults, defaults)
        .layer(Priority::Caller, params)
}

pub fn encode_batch_send_mail(request: &BatchSendMail) -> ParamLayers {
    let defaults = Params::new()
        .with(ADDRESS_TYPE, AddressType::default().as_param())
        .with(CLICK_TRACE, 0);

    let options = &request.options;
    let mut params = Params::new();
    params
        .insert(AccountName::FIELD, request.account_name.as_str())
        .insert(ReceiversName::FIELD, request.receivers_name.as_str())
        .insert(TemplateName::FIELD, request.template_name.as_str())
        .insert_opt(ADDRESS_TYPE, options.address_type.map(AddressType::as_param))
        .insert_opt(CLICK_TRACE, options.click_trace.map(u8::from))
        .insert_opt("TagName", options.tag_name.as_deref())
        .insert_opt("ReplyAddress", options.reply_address.as_deref())
        .insert_opt("ReplyAddressAlias", options.reply_address_alias.as_deref());

    ParamLayers::new()
        .layer(Priority::ActionDefaults, defaults)
        .layer(Priority::Caller, params)
}

pub fn encode_account_summary(_request: &DescAccountSummary) -> ParamLayers {
    ParamLayers::new()
}

pub fn encode_mail_statistics(query: &MailStatisticsQuery) -> ParamLayers {
    let mut params = Params::new();
    params
        .insert_opt(
            AccountName::FIELD,
            query.account_name.as_ref().map(AccountName::as_str),
        )
        .insert_opt("TagName", query.tag_name.as_deref())
        .insert_opt("StartTime", query.start_time.as_deref())
        .insert_opt("EndTime", query.end_time.as_deref())
        .insert_opt(
            MailAddress::FIELD,
            query.to_address.as_ref().map(MailAddress::as_str),
        )
        .insert_opt("Status", query.status.map(|status| status.as_param()))
        .insert_opt("Length", query.length)
        .insert_opt("NextStart", query.next_start.as_deref());

    ParamLayers::new().layer(Priority::Caller, params)
}
