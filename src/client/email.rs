use crate::client::{AliyunClient, OpenApiError};
use crate::domain::{
    BatchSendMail, DescAccountSummary, MailStatisticsQuery, SingleSendMail, SuccessResponse,
};
use crate::transport::{
    ParamLayers, Params, Priority, encode_account_summary, encode_batch_send_mail,
    encode_mail_statistics, encode_single_send_mail,
};

#[derive(Clone)]
/// DirectMail actions.
///
/// Expects a client configured with
/// [`EndpointConfig::email`](crate::client::EndpointConfig::email).
pub struct EmailApi {
    client: AliyunClient,
    extra: Params,
}

impl EmailApi {
    pub fn new(client: AliyunClient) -> Self {
        Self {
            client,
            extra: Params::new(),
        }
    }

    /// Parameters added to every call, overriding the action defaults.
    pub fn with_extra(mut self, extra: Params) -> Self {
        self.extra = extra;
        self
    }

    pub fn client(&self) -> &AliyunClient {
        &self.client
    }

    pub async fn send(&self, request: &SingleSendMail) -> Result<SuccessResponse, OpenApiError> {
        self.call(SingleSendMail::ACTION, encode_single_send_mail(request))
            .await
    }

    pub async fn send_batch(&self, request: &BatchSendMail) -> Result<SuccessResponse, OpenApiError> {
        self.call(BatchSendMail::ACTION, encode_batch_send_mail(request))
            .await
    }

    /// `DescAccountSummary`: quotas, domains and templates of the account.
    pub async fn get_account_summary(&self) -> Result<SuccessResponse, OpenApiError> {
        self.call(
            DescAccountSummary::ACTION,
            encode_account_summary(&DescAccountSummary),
        )
            .await
    }

    pub async fn query_send_statistics(
        &self,
        query: &MailStatisticsQuery,
    ) -> Result<SuccessResponse, OpenApiError> {
        self.call(MailStatisticsQuery::ACTION, encode_mail_statistics(query))
            .await
    }

    async fn call(&self, action: &str, layers: ParamLayers) -> Result<SuccessResponse, OpenApiError> {
        let layers = if self.extra.is_empty() {
            layers
        } else {
            layers.layer(Priority::Caller, self.extra.clone())
        };
        self.client.send_layered(action, layers).await
    }
}
