use crate::config::GatewayConfig;
use crate::domain::payment::TransactionRef;
use crate::domain::ports::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentVerdict};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Client for the Chapa transaction API.
///
/// Chapa wraps every response in a `{status, message, data}` envelope. A
/// `status` of `"success"` means the request itself was accepted; for
/// verification the settlement answer sits one level down in
/// `data.status`. Everything that is not a definite answer from the
/// gateway, for instance a 5xx, a timeout, or an unparseable body, is
/// reported as an error distinct from a decline so callers can retry.
pub struct ChapaGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

#[derive(Serialize)]
struct InitializeBody<'a> {
    /// Chapa expects the amount as a decimal string, not a JSON number.
    amount: String,
    currency: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    tx_ref: &'a str,
    callback_url: &'a str,
    return_url: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    status: String,
    message: Option<String>,
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    checkout_url: Option<String>,
    status: Option<String>,
}

impl ChapaGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::from)?;
        Ok(Self { http, config })
    }

    async fn parse_envelope(
        response: reqwest::Response,
    ) -> std::result::Result<Envelope, GatewayError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<Envelope>()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for ChapaGateway {
    async fn initiate(
        &self,
        request: CheckoutRequest,
    ) -> std::result::Result<CheckoutSession, GatewayError> {
        let body = InitializeBody {
            amount: request.amount.to_string(),
            currency: &self.config.currency,
            email: &request.email,
            first_name: &request.first_name,
            last_name: &request.last_name,
            tx_ref: request.tx_ref.as_str(),
            callback_url: &self.config.callback_url,
            return_url: &self.config.callback_url,
        };

        debug!("initializing checkout for {}", request.tx_ref);
        let response = self
            .http
            .post(format!("{}/transaction/initialize", self.config.base_url))
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await?;

        let envelope = Self::parse_envelope(response).await?;
        if envelope.status != "success" {
            return Err(GatewayError::Declined {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Payment initiation failed.".to_string()),
            });
        }

        let checkout_url = envelope
            .data
            .and_then(|data| data.checkout_url)
            .ok_or_else(|| GatewayError::Parse("missing data.checkout_url".to_string()))?;

        Ok(CheckoutSession { checkout_url })
    }

    async fn verify(
        &self,
        tx_ref: &TransactionRef,
    ) -> std::result::Result<PaymentVerdict, GatewayError> {
        debug!("verifying {}", tx_ref);
        let response = self
            .http
            .get(format!(
                "{}/transaction/verify/{}",
                self.config.base_url, tx_ref
            ))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        let envelope = Self::parse_envelope(response).await?;

        let settled = envelope.status == "success"
            && envelope
                .data
                .as_ref()
                .and_then(|data| data.status.as_deref())
                == Some("success");

        if settled {
            Ok(PaymentVerdict::Settled)
        } else {
            Ok(PaymentVerdict::Declined)
        }
    }
}
