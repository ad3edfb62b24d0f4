//! Checkout
//!
//! Builds payment requests from the signed-in user and the cart, sends them,
//! and hands back the hosted checkout URL to redirect to.

use futures::future::join_all;
use fruitcart::{
    cart::Cart,
    checkout::{CheckoutError, Payer, cart_payments, product_payment},
    products::ProductId,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::{api::ApiError, domain::payments::PaymentsService, state::AppState};

/// Why a checkout did not produce a redirect.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    /// Nothing was sent.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The single initiate request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// At least one of the cart's initiate requests failed.
    #[error("some payments failed to initialize")]
    Partial {
        /// Requests that failed.
        failed: usize,

        /// Requests sent.
        sent: usize,
    },
}

impl CheckoutFailure {
    /// Text for an error notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(error) => error.to_string(),
            Self::Api(error) => error.user_message(),
            Self::Partial { .. } => "Some payments failed to initialize".to_string(),
        }
    }
}

/// Pay `total` for one product and return the checkout URL.
///
/// # Errors
///
/// - [`CheckoutFailure::Checkout`]: signed out or incomplete payer details.
/// - [`CheckoutFailure::Api`]: the backend refused the payment.
pub async fn pay_for_product(
    payments: &dyn PaymentsService,
    state: &AppState,
    payer: &Payer,
    product: &ProductId,
    total: Decimal,
    at: Timestamp,
) -> Result<String, CheckoutFailure> {
    let request = product_payment(state.user_id().as_ref(), payer, product, total, at)?;

    Ok(payments.initiate(request).await?)
}

/// Pay for the selected cart lines, one concurrent request per line.
///
/// Only the batch as a whole is checked. When every request succeeds the first
/// line's checkout URL is returned; the other lines' URLs are not used.
///
/// # Errors
///
/// - [`CheckoutFailure::Checkout`]: signed out, incomplete payer details or
///   nothing selected.
/// - [`CheckoutFailure::Partial`]: any request failed.
pub async fn pay_for_cart(
    payments: &dyn PaymentsService,
    state: &AppState,
    payer: &Payer,
    cart: &Cart,
    at: Timestamp,
) -> Result<String, CheckoutFailure> {
    let requests = cart_payments(state.user_id().as_ref(), payer, cart, at)?;
    let sent = requests.len();

    let results = join_all(requests.into_iter().map(|request| payments.initiate(request))).await;

    let failed = results.iter().filter(|result| result.is_err()).count();

    if failed > 0 {
        for error in results.iter().filter_map(|result| result.as_ref().err()) {
            warn!("cart payment failed: {error}");
        }

        return Err(CheckoutFailure::Partial { failed, sent });
    }

    results
        .into_iter()
        .next()
        .ok_or(CheckoutFailure::Checkout(CheckoutError::NothingSelected))?
        .map_err(CheckoutFailure::Api)
}

#[cfg(test)]
mod tests {
    use fruitcart::{cart::CartItem, roles::Role, users::{User, UserId}};
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::payments::MockPaymentsService;

    use super::*;

    fn signed_in() -> AppState {
        let state = AppState::new();

        state.set_user(Some(User {
            id: UserId::new("u7"),
            first_name: "Selam".to_string(),
            last_name: "Worku".to_string(),
            email: "selam@example.com".to_string(),
            phone_number: Some("0912345678".to_string()),
            role: Role::General,
            profile_pic: None,
            created_at: Timestamp::UNIX_EPOCH,
        }));

        state
    }

    fn cart() -> Result<Cart, serde_json::Error> {
        let items: Vec<CartItem> = serde_json::from_value(json!([
            {"_id": "l1", "quantity": 2, "productId": {"_id": "p1", "productName": "Mango",
              "sellingPrice": 100, "price": 100, "createdAt": "2025-01-01T00:00:00Z"}},
            {"_id": "l2", "quantity": 1, "productId": {"_id": "p2", "productName": "Papaya",
              "sellingPrice": 50, "price": 50, "createdAt": "2025-01-01T00:00:00Z"}}
        ]))?;

        Ok(Cart::new(items))
    }

    fn payer(state: &AppState) -> Result<Payer, &'static str> {
        Ok(Payer::from_user(&state.user().ok_or("signed out")?))
    }

    #[tokio::test]
    async fn cart_checkout_redirects_to_the_first_url() -> TestResult {
        let state = signed_in();
        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate()
            .times(2)
            .returning(|request| Ok(format!("https://checkout.example/{}", request.tx_ref)));

        let url = pay_for_cart(&payments, &state, &payer(&state)?, &cart()?, Timestamp::UNIX_EPOCH)
            .await?;

        assert_eq!(url, "https://checkout.example/tx-p1-0-0");

        Ok(())
    }

    #[tokio::test]
    async fn any_failed_line_fails_the_batch() -> TestResult {
        let state = signed_in();
        let mut payments = MockPaymentsService::new();

        payments.expect_initiate().times(2).returning(|request| {
            if request.product_id.as_str() == "p2" {
                Err(ApiError::rejected(400, "Invalid amount"))
            } else {
                Ok("https://checkout.example/ok".to_string())
            }
        });

        let result =
            pay_for_cart(&payments, &state, &payer(&state)?, &cart()?, Timestamp::UNIX_EPOCH).await;

        assert!(
            matches!(result, Err(CheckoutFailure::Partial { failed: 1, sent: 2 })),
            "unexpected {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn signed_out_checkout_sends_nothing() -> TestResult {
        let state = AppState::new();
        let mut payments = MockPaymentsService::new();

        payments.expect_initiate().never();

        let payer = Payer::from_user(&signed_in().user().ok_or("no user")?);
        let result = pay_for_product(
            &payments,
            &state,
            &payer,
            &ProductId::new("p1"),
            Decimal::from(40),
            Timestamp::UNIX_EPOCH,
        )
        .await;

        assert!(matches!(
            result,
            Err(CheckoutFailure::Checkout(CheckoutError::SignInRequired))
        ));

        Ok(())
    }
}
