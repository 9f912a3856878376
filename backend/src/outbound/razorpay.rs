//! Reqwest-backed Razorpay payment gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, basic
//! auth, timeout and HTTP error mapping. Checkout signature verification
//! happens on the gateway side; a signature the gateway refuses comes back
//! as an invalid-signature rejection here and never reaches end users.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::currency::CurrencyCode;
use crate::domain::ports::{
    CaptureRequest, GatewayOrder, GatewayPayout, PaymentGateway, PaymentGatewayError,
    PayoutRequest,
};

/// Length of the key fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Credentials and transport settings for the Razorpay adapter.
pub struct RazorpayConfig {
    /// REST base URL, e.g. `https://api.razorpay.com/v1/`.
    pub base_url: Url,
    /// Public key identifier used for basic auth.
    pub key_id: String,
    /// Secret half of the key pair; zeroised on drop.
    pub key_secret: Zeroizing<String>,
    /// Per-request deadline.
    pub timeout: Duration,
}

impl RazorpayConfig {
    /// Truncated SHA-256 fingerprint of the key id, safe to log at startup
    /// instead of the credential itself.
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.key_id.as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
    }
}

/// Razorpay gateway adapter performing REST calls against one endpoint.
pub struct RazorpayGateway {
    client: Client,
    base_url: Url,
    key_id: String,
    key_secret: Zeroizing<String>,
}

#[derive(Debug, Serialize)]
struct OrderRequestDto<'a> {
    amount: i64,
    currency: &'a str,
    payment_capture: bool,
}

#[derive(Debug, Deserialize)]
struct OrderResponseDto {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Serialize)]
struct CaptureRequestDto<'a> {
    amount: i64,
    order_id: &'a str,
    signature: &'a str,
}

#[derive(Debug, Serialize)]
struct PayoutRequestDto<'a> {
    amount: i64,
    currency: &'a str,
    mode: &'a str,
    fund_account_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PayoutResponseDto {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct GatewayErrorDto {
    #[serde(default)]
    error: GatewayErrorDetailDto,
}

#[derive(Debug, Default, Deserialize)]
struct GatewayErrorDetailDto {
    #[serde(default)]
    description: String,
}

impl RazorpayGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: RazorpayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            key_id: config.key_id,
            key_secret: config.key_secret,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        self.base_url.join(path).map_err(|error| {
            PaymentGatewayError::transport(format!("invalid gateway url: {error}"))
        })
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, PaymentGatewayError> {
        let url = self.endpoint(path)?;
        self.client
            .post(url)
            .basic_auth(self.key_id.as_str(), Some(self.key_secret.as_str()))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)
    }
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_rejection(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let detail: GatewayErrorDto = serde_json::from_slice(body).unwrap_or_default();
    let description = detail.error.description;
    if status == StatusCode::BAD_REQUEST && description.to_lowercase().contains("signature") {
        return PaymentGatewayError::InvalidSignature;
    }
    PaymentGatewayError::rejected(format!("gateway answered {status}: {description}"))
}

async fn read_rejection(response: reqwest::Response) -> PaymentGatewayError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    map_rejection(status, body.as_ref())
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &CurrencyCode,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let response = self
            .post(
                "orders",
                &OrderRequestDto {
                    amount: amount_minor,
                    currency: currency.as_str(),
                    payment_capture: false,
                },
            )
            .await?;
        if !response.status().is_success() {
            return Err(read_rejection(response).await);
        }
        let order: OrderResponseDto = response.json().await.map_err(map_transport_error)?;
        let currency = CurrencyCode::new(&order.currency).map_err(|error| {
            PaymentGatewayError::transport(format!("gateway returned a bad currency: {error}"))
        })?;
        Ok(GatewayOrder {
            order_ref: order.id,
            amount_minor: order.amount,
            currency,
        })
    }

    async fn capture_payment(
        &self,
        request: &CaptureRequest,
    ) -> Result<(), PaymentGatewayError> {
        let path = format!("payments/{}/capture", request.payment_ref);
        let response = self
            .post(
                path.as_str(),
                &CaptureRequestDto {
                    amount: request.amount_minor,
                    order_id: request.order_ref.as_str(),
                    signature: request.signature.as_str(),
                },
            )
            .await?;
        if !response.status().is_success() {
            return Err(read_rejection(response).await);
        }
        Ok(())
    }

    async fn create_payout(
        &self,
        request: &PayoutRequest,
    ) -> Result<GatewayPayout, PaymentGatewayError> {
        let response = self
            .post(
                "payouts",
                &PayoutRequestDto {
                    amount: request.amount_minor,
                    currency: request.currency.as_str(),
                    mode: request.method.as_str(),
                    fund_account_id: request.destination.as_str(),
                },
            )
            .await?;
        if !response.status().is_success() {
            return Err(read_rejection(response).await);
        }
        let payout: PayoutResponseDto = response.json().await.map_err(map_transport_error)?;
        Ok(GatewayPayout {
            payout_ref: payout.id,
        })
    }
}
