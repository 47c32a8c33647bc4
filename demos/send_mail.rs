use std::io;

use aliyun_openapi::{
    AccountName, AliyunClient, Credentials, EmailApi, EndpointConfig, HtmlBody, MailAddress,
    SingleSendMail, SingleSendMailOptions, Subject,
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
    let account = required("ALIYUN_MAIL_ACCOUNT")?;
    let to = required("ALIYUN_MAIL_TO")?;

    let client = AliyunClient::builder(Credentials::from_env()?, EndpointConfig::email())
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let email = EmailApi::new(client);

    let summary = email.get_account_summary().await?;
    println!("daily quota: {:?}", summary.get("DailyQuota"));

    let request = SingleSendMail::new(
        AccountName::new(account)?,
        vec![MailAddress::new(to)?],
        Subject::new("Hello from aliyun-openapi")?,
        HtmlBody::new("<p>It works.</p>")?,
        SingleSendMailOptions::default(),
    )?;
    let response = email.send(&request).await?;
    println!("env_id: {:?}", response.get_str("EnvId"));

    Ok(())
}
