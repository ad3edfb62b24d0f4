//! Payments
//!
//! Payments are paginated and filtered by the backend, so this module only
//! shapes the query string, reads the response and decides what the admin view
//! may show or do with a row.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroUsize,
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::TypedId,
    listing::{DEFAULT_PAGE_SIZE, Page},
    products::ProductId,
    users::UserId,
    validation::ValidationError,
};

/// Payment Id
pub type PaymentId = TypedId<Payment>;

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Initiated, not yet confirmed.
    Pending,

    /// Confirmed by the payment provider.
    Success,

    /// Rejected by the payment provider.
    Failed,

    /// Confirmed by an administrator.
    Approved,
}

/// Returned when a status string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct UnknownStatus(pub String);

impl PaymentStatus {
    /// Every status, in display order.
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Success,
        PaymentStatus::Failed,
        PaymentStatus::Approved,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Approved => "approved",
        }
    }

    /// Whether the payment counts as revenue.
    pub fn is_settled(self) -> bool {
        matches!(self, PaymentStatus::Success | PaymentStatus::Approved)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Payer as populated into a payment record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUser {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: UserId,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,

    /// Email.
    #[serde(default)]
    pub email: String,
}

/// Product as populated into a payment record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProduct {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: ProductId,

    /// Display name.
    #[serde(default)]
    pub product_name: String,

    /// Selling price at the time of listing.
    #[serde(default)]
    pub selling_price: Decimal,
}

/// A payment record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payment {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: PaymentId,

    /// Transaction reference sent at initiation.
    pub tx_ref: String,

    /// Paying user, if still present.
    #[serde(default)]
    pub user_id: Option<PaymentUser>,

    /// Product paid for, if still present.
    #[serde(default)]
    pub product_id: Option<PaymentProduct>,

    /// Amount charged.
    pub amount: Decimal,

    /// Units paid for.
    #[serde(default = "one")]
    pub quantity: u32,

    /// Current state.
    pub status: PaymentStatus,

    /// Where the payment started (`product` or `cart`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// When the payment was initiated.
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,

    /// When the payment last changed.
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<Timestamp>,
}

fn one() -> u32 {
    1
}

impl Payment {
    /// "First Last" of the payer, or `N/A`.
    pub fn customer_name(&self) -> String {
        self.user_id
            .as_ref()
            .map(|user| format!("{} {}", user.first_name, user.last_name).trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Name of the product paid for, or `N/A`.
    pub fn product_name(&self) -> &str {
        self.product_id
            .as_ref()
            .map_or("N/A", |product| product.product_name.as_str())
    }

    /// Whether the payment counts as revenue.
    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }
}

/// Reject approving anything but a pending payment.
///
/// # Errors
///
/// [`ValidationError::InvalidState`] when the payment is not pending.
pub fn ensure_approvable(payment: &Payment) -> Result<(), ValidationError> {
    if payment.status != PaymentStatus::Pending {
        return Err(ValidationError::InvalidState(
            "only pending payments can be approved",
        ));
    }

    Ok(())
}

/// Server-side filter and page of the payments list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentQuery {
    page: usize,
    limit: NonZeroUsize,
    search: String,
    status: Option<PaymentStatus>,
    range: Option<(Timestamp, Timestamp)>,
}

impl Default for PaymentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            status: None,
            range: None,
        }
    }
}

impl PaymentQuery {
    /// First page, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to a 1-based page.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size. Returns to the first page.
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroUsize) -> Self {
        self.limit = limit;
        self.page = 1;
        self
    }

    /// Set the free-text search. Returns to the first page.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Set or clear the status filter. Returns to the first page.
    #[must_use]
    pub fn with_status(mut self, status: Option<PaymentStatus>) -> Self {
        self.status = status;
        self.page = 1;
        self
    }

    /// Set or clear the creation date range. Returns to the first page.
    #[must_use]
    pub fn with_range(mut self, range: Option<(Timestamp, Timestamp)>) -> Self {
        self.range = range;
        self.page = 1;
        self
    }

    /// Requested page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size.
    pub fn limit(&self) -> NonZeroUsize {
        self.limit
    }

    /// Status filter.
    pub fn status(&self) -> Option<PaymentStatus> {
        self.status
    }

    /// Whether this is the first page with no filter applied. Only then do the
    /// response counters describe every payment.
    pub fn is_unfiltered_first_page(&self) -> bool {
        self.page == 1 && self.search.is_empty() && self.status.is_none() && self.range.is_none()
    }

    /// Query string pairs in the order the backend documents them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }

        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }

        if let Some((start, end)) = self.range {
            pairs.push(("startDate", start.to_string()));
            pairs.push(("endDate", end.to_string()));
        }

        pairs
    }
}

/// `data` of the payments list response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsResponse {
    /// Payments on the requested page.
    pub payments: Vec<Payment>,

    /// Payments matching the filter.
    #[serde(default)]
    pub total: usize,

    /// Payments in `success`.
    #[serde(default)]
    pub successful_payments: usize,

    /// Payments in `pending`.
    #[serde(default)]
    pub pending_payments: usize,

    /// Payments in `failed`.
    #[serde(default)]
    pub failed_payments: usize,

    /// Payments in `approved`.
    #[serde(default)]
    pub approved_payments: usize,

    /// Revenue over settled payments.
    #[serde(default)]
    pub total_revenue: Decimal,
}

/// Counters shown above the payments table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentStats {
    /// Every payment.
    pub total: usize,

    /// `success` payments.
    pub successful: usize,

    /// `pending` payments.
    pub pending: usize,

    /// `failed` payments.
    pub failed: usize,

    /// `approved` payments.
    pub approved: usize,

    /// Settled revenue.
    pub revenue: Decimal,
}

impl PaymentsResponse {
    /// Counters, only when the query could see every payment.
    pub fn stats_for(&self, query: &PaymentQuery) -> Option<PaymentStats> {
        query.is_unfiltered_first_page().then_some(PaymentStats {
            total: self.total,
            successful: self.successful_payments,
            pending: self.pending_payments,
            failed: self.failed_payments,
            approved: self.approved_payments,
            revenue: self.total_revenue,
        })
    }

    /// Page window the query asked for.
    pub fn into_page(self, query: &PaymentQuery) -> Page<Payment> {
        Page::from_window(self.payments, query.page(), query.limit(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn payment(status: &str) -> Result<Payment, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "_id": "pay1",
            "tx_ref": "tx-p1-1-0",
            "user_id": {"_id": "u1", "firstName": "Meron", "lastName": "Alemu", "email": "m@example.com"},
            "product_id": {"_id": "p1", "productName": "Avocado", "sellingPrice": 40},
            "amount": 80,
            "quantity": 2,
            "status": status,
            "type": "cart",
            "createdAt": "2025-04-02T12:00:00Z",
            "updatedAt": "2025-04-02T12:05:00Z"
        }))
    }

    #[test]
    fn reads_populated_payment() -> TestResult {
        let payment = payment("success")?;

        assert_eq!(payment.customer_name(), "Meron Alemu");
        assert_eq!(payment.product_name(), "Avocado");
        assert_eq!(payment.amount, Decimal::from(80));
        assert!(payment.is_settled());

        Ok(())
    }

    #[test]
    fn only_pending_payments_are_approvable() -> TestResult {
        assert_eq!(ensure_approvable(&payment("pending")?), Ok(()));

        for status in ["success", "failed", "approved"] {
            assert!(ensure_approvable(&payment(status)?).is_err(), "{status}");
        }

        Ok(())
    }

    #[test]
    fn query_string_includes_only_set_filters() -> TestResult {
        let start: Timestamp = "2025-01-01T00:00:00Z".parse()?;
        let end: Timestamp = "2025-01-31T00:00:00Z".parse()?;

        assert_eq!(
            PaymentQuery::new().to_pairs(),
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );

        let query = PaymentQuery::new()
            .with_status(Some(PaymentStatus::Pending))
            .with_range(Some((start, end)))
            .with_page(2);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
                ("status", "pending".to_string()),
                ("startDate", "2025-01-01T00:00:00Z".to_string()),
                ("endDate", "2025-01-31T00:00:00Z".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn stats_only_for_unfiltered_first_page() -> TestResult {
        let response: PaymentsResponse = serde_json::from_value(serde_json::json!({
            "payments": [],
            "total": 12,
            "successfulPayments": 5,
            "pendingPayments": 4,
            "failedPayments": 1,
            "approvedPayments": 2,
            "totalRevenue": 900
        }))?;

        let stats = response.stats_for(&PaymentQuery::new()).ok_or("no stats")?;

        assert_eq!(stats.pending, 4);
        assert_eq!(stats.revenue, Decimal::from(900));

        assert_eq!(response.stats_for(&PaymentQuery::new().with_page(2)), None);
        assert_eq!(response.stats_for(&PaymentQuery::new().with_search("avo")), None);

        Ok(())
    }

    #[test]
    fn empty_filtered_result_is_an_empty_page() -> TestResult {
        let query = PaymentQuery::new().with_status(Some(PaymentStatus::Pending));
        let response: PaymentsResponse =
            serde_json::from_value(serde_json::json!({"payments": [], "total": 0}))?;

        let page = response.into_page(&query);

        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);

        Ok(())
    }

    #[test]
    fn filter_changes_return_to_first_page() {
        let query = PaymentQuery::new()
            .with_page(3)
            .with_status(Some(PaymentStatus::Failed));

        assert_eq!(query.page(), 1);
    }
}
