use serde_json::Value;

use crate::domain::{
    QuerySendDetails, QuerySendStatistics, RawPhoneNumber, SendBatchSms, SendSms, SignName,
    TemplateCode, TemplateParams,
};
use crate::transport::params::{ParamLayers, Params, Priority};

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_PAGE: u32 = 1;

pub fn encode_send_sms(request: &SendSms) -> ParamLayers {
    let to = request
        .phone_numbers()
        .iter()
        .map(RawPhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(",");

    let mut params = Params::new();
    params
        .insert(RawPhoneNumber::FIELD, to)
        .insert(SignName::FIELD, request.sign_name().as_str())
        .insert(TemplateCode::FIELD, request.template_code().as_str())
        .insert("TemplateParam", template_param_json(request.template_param()))
        .insert_opt(
            "SmsUpExtendCode",
            request.options().sms_up_extend_code.as_deref(),
        )
        .insert_opt("OutId", request.options().out_id.as_deref());

    ParamLayers::new().layer(Priority::Caller, params)
}

pub fn encode_send_batch_sms(request: &SendBatchSms) -> ParamLayers {
    let numbers = request
        .phone_numbers()
        .iter()
        .map(|phone| Value::from(phone.raw()))
        .collect::<Vec<_>>();
    let sign_names = request
        .sign_names()
        .iter()
        .map(|name| Value::from(name.as_str()))
        .collect::<Vec<_>>();
    let template_params = request
        .template_params()
        .iter()
        .map(template_param_value)
        .collect::<Vec<_>>();

    let mut params = Params::new();
    params
        .insert("PhoneNumberJson", Value::Array(numbers))
        .insert("SignNameJson", Value::Array(sign_names))
        .insert(TemplateCode::FIELD, request.template_code().as_str())
        .insert("TemplateParamJson", Value::Array(template_params))
        .insert_opt(
            "SmsUpExtendCodeJson",
            request
                .options()
                .sms_up_extend_codes
                .as_ref()
                .map(|codes| Value::from(codes.clone())),
        )
        .insert_opt("OutId", request.options().out_id.as_deref());

    ParamLayers::new().layer(Priority::Caller, params)
}

pub fn encode_query_send_statistics(request: &QuerySendStatistics) -> ParamLayers {
    let defaults = Params::new()
        .with("PageSize", DEFAULT_PAGE_SIZE)
        .with("PageIndex", DEFAULT_PAGE);

    let options = &request.options;
    let mut params = Params::new();
    params
        .insert("IsGlobe", request.region.as_param())
        .insert("StartDate", request.start_date.as_str())
        .insert("EndDate", request.end_date.as_str())
        .insert_opt("PageSize", options.page_size)
        .insert_opt("PageIndex", options.page_index)
        .insert_opt(
            "TemplateType",
            options.template_type.map(|kind| kind.as_param()),
        )
        .insert_opt(
            SignName::FIELD,
            options.sign_name.as_ref().map(SignName::as_str),
        );

    ParamLayers::new()
        .layer(Priority::ActionDefaults, defaults)
        .layer(Priority::Caller, params)
}

pub fn encode_query_send_details(request: &QuerySendDetails) -> ParamLayers {
    let defaults = Params::new()
        .with("PageSize", DEFAULT_PAGE_SIZE)
        .with("CurrentPage", DEFAULT_PAGE);

    let options = &request.options;
    let mut params = Params::new();
    params
        .insert("PhoneNumber", request.phone_number.without_e164_prefix())
        .insert("SendDate", request.send_date.as_str())
        .insert_opt("BizId", options.biz_id.as_deref())
        .insert_opt("PageSize", options.page_size)
        .insert_opt("CurrentPage", options.current_page);

    ParamLayers::new()
        .layer(Priority::ActionDefaults, defaults)
        .layer(Priority::Caller, params)
}

fn template_param_value(params: &TemplateParams) -> Value {
    Value::Object(
        params
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
            .collect(),
    )
}

fn template_param_json(params: &TemplateParams) -> String {
    template_param_value(params).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::domain::{
        CstDate, Region, SendBatchSmsOptions, SendDetailsOptions, SendSmsOptions,
        SmsStatisticsOptions, TemplateType,
    };

    use super::*;

    fn phone(value: &str) -> RawPhoneNumber {
        RawPhoneNumber::new(value).unwrap()
    }

    fn code_param() -> TemplateParams {
        let mut params = TemplateParams::new();
        params.insert("code".to_owned(), "123456".to_owned());
        params
    }

    fn merged(layers: ParamLayers) -> BTreeMap<String, String> {
        layers.merge()
    }

    #[test]
    fn send_sms_joins_numbers_and_serializes_template() {
        let request = SendSms::new(
            vec![phone("+8613812345678"), phone("13812345679")],
            SignName::new("TestSigner").unwrap(),
            TemplateCode::new("SMS_12345678").unwrap(),
            code_param(),
            SendSmsOptions {
                out_id: Some("order-1".to_owned()),
                ..Default::default()
            },
        )
        .unwrap();

        let params = merged(encode_send_sms(&request));
        assert_eq!(params["PhoneNumbers"], "+8613812345678,13812345679");
        assert_eq!(params["SignName"], "TestSigner");
        assert_eq!(params["TemplateCode"], "SMS_12345678");
        assert_eq!(params["TemplateParam"], r#"{"code":"123456"}"#);
        assert_eq!(params["OutId"], "order-1");
        assert!(!params.contains_key("SmsUpExtendCode"));
    }

    #[test]
    fn send_batch_sms_uses_json_arrays() {
        let request = SendBatchSms::new(
            vec![phone("13812345678"), phone("13812345679")],
            vec![
                SignName::new("A").unwrap(),
                SignName::new("B").unwrap(),
            ],
            TemplateCode::new("SMS_1").unwrap(),
            vec![code_param(), TemplateParams::new()],
            SendBatchSmsOptions {
                sms_up_extend_codes: Some(vec!["90997".to_owned(), "90998".to_owned()]),
                out_id: None,
            },
        )
        .unwrap();

        let params = merged(encode_send_batch_sms(&request));
        assert_eq!(params["PhoneNumberJson"], r#"["13812345678","13812345679"]"#);
        assert_eq!(params["SignNameJson"], r#"["A","B"]"#);
        assert_eq!(params["TemplateParamJson"], r#"[{"code":"123456"},{}]"#);
        assert_eq!(params["SmsUpExtendCodeJson"], r#"["90997","90998"]"#);
    }

    #[test]
    fn query_send_statistics_fills_paging_defaults() {
        let request = QuerySendStatistics::new(
            Region::International,
            CstDate::parse("20230701").unwrap(),
            CstDate::parse("20230704").unwrap(),
        );
        let params = merged(encode_query_send_statistics(&request));
        assert_eq!(params["IsGlobe"], "2");
        assert_eq!(params["StartDate"], "20230701");
        assert_eq!(params["EndDate"], "20230704");
        assert_eq!(params["PageSize"], "10");
        assert_eq!(params["PageIndex"], "1");
        assert!(!params.contains_key("TemplateType"));
    }

    #[test]
    fn query_send_statistics_options_override_defaults() {
        let request = QuerySendStatistics::new(
            Region::Mainland,
            CstDate::parse("20230701").unwrap(),
            CstDate::parse("20230701").unwrap(),
        )
        .with_options(SmsStatisticsOptions {
            page_size: Some(50),
            template_type: Some(TemplateType::Notification),
            ..Default::default()
        });
        let params = merged(encode_query_send_statistics(&request));
        assert_eq!(params["IsGlobe"], "1");
        assert_eq!(params["PageSize"], "50");
        assert_eq!(params["PageIndex"], "1");
        assert_eq!(params["TemplateType"], "1");
    }

    #[test]
    fn query_send_details_strips_country_code() {
        let request = QuerySendDetails::new(
            phone("+8613812345678"),
            CstDate::parse("20230704").unwrap(),
        )
        .with_options(SendDetailsOptions {
            biz_id: Some("628323749491270669^0".to_owned()),
            current_page: Some(3),
            ..Default::default()
        });
        let params = merged(encode_query_send_details(&request));
        assert_eq!(params["PhoneNumber"], "13812345678");
        assert_eq!(params["SendDate"], "20230704");
        assert_eq!(params["BizId"], "628323749491270669^0");
        assert_eq!(params["PageSize"], "10");
        assert_eq!(params["CurrentPage"], "3");
    }
}
