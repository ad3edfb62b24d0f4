//! Payments

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    checkout::PaymentRequest,
    payments::{Payment, PaymentQuery, PaymentsResponse, ensure_approvable},
};
use mockall::automock;
use serde_json::json;
use tracing::info;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// [`PaymentsService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpPaymentsService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPaymentsService").finish_non_exhaustive()
    }
}

impl HttpPaymentsService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    async fn list_payments(&self, query: PaymentQuery) -> Result<PaymentsResponse, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::ALL_PAYMENTS).with_query(query.to_pairs()))
            .await?
            .into_data()
    }

    async fn approve_payment(&self, payment: Payment) -> Result<String, ApiError> {
        ensure_approvable(&payment)?;

        let request = ApiRequest::new(Endpoint::APPROVE_PAYMENT).with_id(payment.id.as_str());
        let message = mutate(self.transport.as_ref(), request, "Payment approved successfully").await?;

        info!(payment = %payment.id, "payment approved");

        Ok(message)
    }

    async fn initiate(&self, request: PaymentRequest) -> Result<String, ApiError> {
        let tx_ref = request.tx_ref.clone();

        let checkout_url: String = self
            .transport
            .send(ApiRequest::new(Endpoint::PAYMENT_INITIATE).with_body(&request)?)
            .await?
            .into_field("checkout_url")?;

        info!(%tx_ref, "payment initiated");

        Ok(checkout_url)
    }

    async fn confirm(&self, tx_ref: String) -> Result<String, ApiError> {
        let request =
            ApiRequest::new(Endpoint::PAYMENT_CONFIRM).with_body(&json!({ "tx_ref": tx_ref }))?;

        mutate(self.transport.as_ref(), request, "Payment confirmed").await
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// One page of payments plus the backend's counters.
    async fn list_payments(&self, query: PaymentQuery) -> Result<PaymentsResponse, ApiError>;

    /// Approve a pending payment. Other statuses are refused before sending.
    async fn approve_payment(&self, payment: Payment) -> Result<String, ApiError>;

    /// Start a hosted checkout and return its URL.
    async fn initiate(&self, request: PaymentRequest) -> Result<String, ApiError>;

    /// Ask the backend to verify a transaction.
    async fn confirm(&self, tx_ref: String) -> Result<String, ApiError>;
}
