use crate::client::{AliyunClient, OpenApiError};
use crate::domain::{QuerySendDetails, QuerySendStatistics, SendBatchSms, SendSms, SuccessResponse};
use crate::transport::{
    ParamLayers, Params, Priority, encode_query_send_details, encode_query_send_statistics,
    encode_send_batch_sms, encode_send_sms,
};

#[derive(Clone)]
/// Short Message Service actions.
///
/// Expects a client configured with [`EndpointConfig::sms`](crate::client::EndpointConfig::sms)
/// or an equivalent endpoint.
pub struct SmsApi {
    client: AliyunClient,
    extra: Params,
}

impl SmsApi {
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

    /// `SendSms`. The response carries `BizId` for delivery queries.
    pub async fn send(&self, request: &SendSms) -> Result<SuccessResponse, OpenApiError> {
        self.call(SendSms::ACTION, encode_send_sms(request)).await
    }

    pub async fn send_batch(&self, request: &SendBatchSms) -> Result<SuccessResponse, OpenApiError> {
        self.call(SendBatchSms::ACTION, encode_send_batch_sms(request))
            .await
    }

    pub async fn query_send_statistics(
        &self,
        request: &QuerySendStatistics,
    ) -> Result<SuccessResponse, OpenApiError> {
        self.call(
            QuerySendStatistics::ACTION,
            encode_query_send_statistics(request),
        )
        .await
    }

    pub async fn query_send_details(
        &self,
        request: &QuerySendDetails,
    ) -> Result<SuccessResponse, OpenApiError> {
        self.call(QuerySendDetails::ACTION, encode_query_send_details(request))
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
