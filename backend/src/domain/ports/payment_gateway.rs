//! Port for the external payment gateway collaborator.
//!
//! Amounts cross this boundary as integer minor units of the gateway
//! settlement currency. Signature verification happens on the gateway's
//! server side; the domain only reacts to acceptance or rejection.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::currency::CurrencyCode;

/// Failures surfaced by gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentGatewayError {
    /// The gateway refused the operation.
    #[error("payment gateway rejected the operation: {message}")]
    Rejected {
        /// Gateway detail; never shown to end users.
        message: String,
    },
    /// The checkout signature did not verify.
    #[error("payment signature verification failed")]
    InvalidSignature,
    /// The gateway did not answer within the configured deadline.
    #[error("payment gateway timed out: {message}")]
    Timeout {
        /// Transport detail.
        message: String,
    },
    /// Transport-level failure reaching the gateway.
    #[error("payment gateway transport failed: {message}")]
    Transport {
        /// Transport detail.
        message: String,
    },
}

impl PaymentGatewayError {
    /// Helper for gateway-side rejections.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Helper for deadline expiries.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Order created on the gateway ahead of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    /// Gateway-issued order reference.
    pub order_ref: String,
    /// Amount the order was created for, in gateway minor units.
    pub amount_minor: i64,
    /// Currency the order settles in.
    pub currency: CurrencyCode,
}

/// Capture request settling a checkout against an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Gateway order reference from [`GatewayOrder`].
    pub order_ref: String,
    /// Payment reference produced by the checkout.
    pub payment_ref: String,
    /// Checkout signature over order and payment references.
    pub signature: String,
    /// Amount to capture, in gateway minor units.
    pub amount_minor: i64,
}

/// Payout request disbursing funds to an external instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutRequest {
    /// Amount to disburse, in gateway minor units.
    pub amount_minor: i64,
    /// Currency the payout settles in.
    pub currency: CurrencyCode,
    /// Instrument kind (bank transfer, UPI, ...).
    pub method: String,
    /// Gateway reference of the destination fund account.
    pub destination: String,
}

/// Payout accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPayout {
    /// Gateway-issued payout reference.
    pub payout_ref: String,
}

/// Port over the payment gateway collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order ahead of a checkout.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &CurrencyCode,
    ) -> Result<GatewayOrder, PaymentGatewayError>;

    /// Capture a checkout payment against an order.
    async fn capture_payment(&self, request: &CaptureRequest)
    -> Result<(), PaymentGatewayError>;

    /// Disburse funds to an external instrument.
    async fn create_payout(
        &self,
        request: &PayoutRequest,
    ) -> Result<GatewayPayout, PaymentGatewayError>;
}

/// Fixture gateway that accepts everything, for tests that do not care about
/// gateway behaviour.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &CurrencyCode,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        Ok(GatewayOrder {
            order_ref: "order_fixture".to_owned(),
            amount_minor,
            currency: currency.clone(),
        })
    }

    async fn capture_payment(
        &self,
        _request: &CaptureRequest,
    ) -> Result<(), PaymentGatewayError> {
        Ok(())
    }

    async fn create_payout(
        &self,
        _request: &PayoutRequest,
    ) -> Result<GatewayPayout, PaymentGatewayError> {
        Ok(GatewayPayout {
            payout_ref: "payout_fixture".to_owned(),
        })
    }
}
