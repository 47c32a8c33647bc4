use std::io;

use aliyun_openapi::{
    AliyunClient, Credentials, EndpointConfig, RawPhoneNumber, SendSms, SendSmsOptions, SignName,
    SmsApi, TemplateCode, TemplateParams,
};

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let phone_raw = required("ALIYUN_SMS_PHONE")?;
    let sign_name = required("ALIYUN_SMS_SIGN_NAME")?;
    let template_code = required("ALIYUN_SMS_TEMPLATE_CODE")?;
    let code = std::env::var("ALIYUN_SMS_CODE").unwrap_or_else(|_| "1234".to_owned());

    let client = AliyunClient::new(Credentials::from_env()?, EndpointConfig::sms());
    let sms = SmsApi::new(client);

    let mut params = TemplateParams::new();
    params.insert("code".to_owned(), code);
    let request = SendSms::new(
        vec![RawPhoneNumber::new(phone_raw)?],
        SignName::new(sign_name)?,
        TemplateCode::new(template_code)?,
        params,
        SendSmsOptions::default(),
    )?;

    match sms.send(&request).await {
        Ok(response) => println!(
            "request_id: {:?}, biz_id: {:?}",
            response.request_id,
            response.get_str("BizId")
        ),
        Err(err) if err.api().is_some_and(|api| api.is_retryable()) => {
            eprintln!("rate limited, try again later: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
