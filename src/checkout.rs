//! Checkout
//!
//! Builds the payment-initiation requests for a single product or for the
//! selected cart lines. Sending them, and following the returned checkout URL,
//! is the caller's job.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::Cart,
    products::ProductId,
    users::{User, UserId},
    validation::{ValidationErrors, email, required},
};

/// What a payment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Paid from a product page.
    Product,

    /// Paid from the cart.
    Cart,
}

/// Errors raised before any payment request is sent.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Nobody is signed in.
    #[error("please login to proceed with payment")]
    SignInRequired,

    /// No cart line is selected.
    #[error("select at least one product to pay for")]
    NothingSelected,

    /// Payer details are incomplete.
    #[error("please fill all required fields: {0}")]
    Payer(#[from] ValidationErrors),
}

/// Name, email and phone the payment provider bills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payer {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Receipt email.
    pub email: String,

    /// Contact phone number.
    pub phone_number: String,
}

impl Payer {
    /// Prefill from the signed-in user's profile.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
        }
    }

    /// All four fields are required.
    ///
    /// # Errors
    ///
    /// The failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("firstName", &self.first_name));
        errors.check(required("lastName", &self.last_name));
        errors.check(email("email", &self.email));
        errors.check(required("phoneNumber", &self.phone_number));

        errors.into_result()
    }
}

/// Body of the payment-initiate request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Paying user.
    pub user_id: UserId,

    /// Product being paid for.
    pub product_id: ProductId,

    /// Amount charged for this product.
    pub amount: Decimal,

    /// Where the payment started.
    #[serde(rename = "type")]
    pub kind: PaymentKind,

    /// Receipt email.
    pub email: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Client-generated transaction reference.
    #[serde(rename = "tx_ref")]
    pub tx_ref: String,

    /// Units paid for; only cart payments send it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Transaction reference for one product of a checkout.
pub fn tx_ref(product_id: &ProductId, at: Timestamp, index: Option<usize>) -> String {
    let millis = at.as_millisecond();

    match index {
        Some(index) => format!("tx-{product_id}-{millis}-{index}"),
        None => format!("tx-{product_id}-{millis}"),
    }
}

/// Share of `total` owed by a line holding `quantity` of `total_quantity` units,
/// rounded to cents.
pub fn split_amount(total: Decimal, quantity: u32, total_quantity: u32) -> Decimal {
    if total_quantity == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(quantity) * total / Decimal::from(total_quantity)).round_dp(2)
}

fn request(
    user_id: &UserId,
    payer: &Payer,
    product_id: ProductId,
    amount: Decimal,
    kind: PaymentKind,
    tx_ref: String,
    quantity: Option<u32>,
) -> PaymentRequest {
    PaymentRequest {
        user_id: user_id.clone(),
        product_id,
        amount,
        kind,
        email: payer.email.trim().to_string(),
        first_name: payer.first_name.trim().to_string(),
        last_name: payer.last_name.trim().to_string(),
        phone_number: payer.phone_number.trim().to_string(),
        tx_ref,
        quantity,
    }
}

/// Request paying `total` for one product.
///
/// # Errors
///
/// - [`CheckoutError::SignInRequired`]: no signed-in user.
/// - [`CheckoutError::Payer`]: missing payer details.
pub fn product_payment(
    user_id: Option<&UserId>,
    payer: &Payer,
    product_id: &ProductId,
    total: Decimal,
    at: Timestamp,
) -> Result<PaymentRequest, CheckoutError> {
    payer.validate()?;

    let user_id = user_id.ok_or(CheckoutError::SignInRequired)?;

    Ok(request(
        user_id,
        payer,
        product_id.clone(),
        total,
        PaymentKind::Product,
        tx_ref(product_id, at, None),
        None,
    ))
}

/// One request per selected cart line, in cart order.
///
/// The selected total is split across lines in proportion to their quantity.
/// Shares are rounded to cents and the last line takes the rounding remainder,
/// so the amounts always add up to the selected total.
///
/// # Errors
///
/// - [`CheckoutError::Payer`]: missing payer details.
/// - [`CheckoutError::SignInRequired`]: no signed-in user.
/// - [`CheckoutError::NothingSelected`]: no selected line has a product.
pub fn cart_payments(
    user_id: Option<&UserId>,
    payer: &Payer,
    cart: &Cart,
    at: Timestamp,
) -> Result<Vec<PaymentRequest>, CheckoutError> {
    payer.validate()?;

    let user_id = user_id.ok_or(CheckoutError::SignInRequired)?;

    let lines: Vec<(&ProductId, u32)> = cart
        .selected_items()
        .filter_map(|item| Some((item.product_id()?, item.quantity)))
        .collect();

    if lines.is_empty() {
        return Err(CheckoutError::NothingSelected);
    }

    let total = cart.selected_total();
    let total_quantity = cart.selected_quantity();
    let last = lines.len() - 1;
    let mut allocated = Decimal::ZERO;

    let requests = lines
        .into_iter()
        .enumerate()
        .map(|(index, (product_id, quantity))| {
            let amount = if index == last {
                total - allocated
            } else {
                split_amount(total, quantity, total_quantity)
            };

            allocated += amount;

            request(
                user_id,
                payer,
                product_id.clone(),
                amount,
                PaymentKind::Cart,
                tx_ref(product_id, at, Some(index)),
                Some(quantity),
            )
        })
        .collect();

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::cart::{CartItemId, test_support::line};

    fn payer() -> Payer {
        Payer {
            first_name: "Hana".to_string(),
            last_name: "Bekele".to_string(),
            email: "hana@example.com".to_string(),
            phone_number: "0911223344".to_string(),
        }
    }

    fn at() -> Result<Timestamp, jiff::Error> {
        Timestamp::from_millisecond(1_735_689_600_000)
    }

    #[test]
    fn cart_amounts_split_by_quantity() -> TestResult {
        let cart = Cart::new(vec![line("a", "p1", 100, 2), line("b", "p2", 50, 1)]);
        let user = UserId::new("u1");

        let requests = cart_payments(Some(&user), &payer(), &cart, at()?)?;

        let amounts: Vec<Decimal> = requests.iter().map(|r| r.amount).collect();
        let refs: Vec<&str> = requests.iter().map(|r| r.tx_ref.as_str()).collect();

        assert_eq!(amounts, vec![Decimal::new(16667, 2), Decimal::new(8333, 2)]);
        assert_eq!(
            refs,
            vec!["tx-p1-1735689600000-0", "tx-p2-1735689600000-1"]
        );
        assert!(requests.iter().all(|r| r.kind == PaymentKind::Cart));

        Ok(())
    }

    #[test]
    fn cart_amounts_add_up_to_the_selected_total() -> TestResult {
        let cart = Cart::new(vec![
            line("a", "p1", 40, 1),
            line("b", "p2", 30, 1),
            line("c", "p3", 30, 1),
        ]);

        let requests = cart_payments(Some(&UserId::new("u1")), &payer(), &cart, at()?)?;

        let amounts: Vec<Decimal> = requests.iter().map(|r| r.amount).collect();
        let sum: Decimal = amounts.iter().copied().sum();

        assert_eq!(
            amounts,
            vec![Decimal::new(3333, 2), Decimal::new(3333, 2), Decimal::new(3334, 2)]
        );
        assert_eq!(sum, cart.selected_total());

        Ok(())
    }

    #[test]
    fn only_selected_lines_are_paid() -> TestResult {
        let mut cart = Cart::new(vec![line("a", "p1", 100, 2), line("b", "p2", 50, 1)]);
        cart.toggle(&CartItemId::new("b"));

        let requests = cart_payments(Some(&UserId::new("u1")), &payer(), &cart, at()?)?;

        assert_eq!(requests.len(), 1);
        assert_eq!(requests.first().map(|r| r.amount), Some(Decimal::from(200)));

        Ok(())
    }

    #[test]
    fn nothing_selected_is_rejected() -> TestResult {
        let mut cart = Cart::new(vec![line("a", "p1", 100, 2)]);
        cart.toggle(&CartItemId::new("a"));

        assert_eq!(
            cart_payments(Some(&UserId::new("u1")), &payer(), &cart, at()?),
            Err(CheckoutError::NothingSelected)
        );

        Ok(())
    }

    #[test]
    fn payer_and_user_are_required() -> TestResult {
        let cart = Cart::new(vec![line("a", "p1", 100, 2)]);

        assert!(matches!(
            cart_payments(Some(&UserId::new("u1")), &Payer::default(), &cart, at()?),
            Err(CheckoutError::Payer(_))
        ));
        assert_eq!(
            cart_payments(None, &payer(), &cart, at()?),
            Err(CheckoutError::SignInRequired)
        );

        Ok(())
    }

    #[test]
    fn product_payment_charges_the_total() -> TestResult {
        let request = product_payment(
            Some(&UserId::new("u1")),
            &payer(),
            &ProductId::new("p9"),
            Decimal::new(12550, 2),
            at()?,
        )?;

        let json = serde_json::to_value(&request)?;

        assert_eq!(json["type"], "product");
        assert_eq!(json["tx_ref"], "tx-p9-1735689600000");
        assert_eq!(json["userId"], "u1");
        assert!(json.get("quantity").is_none());

        Ok(())
    }

    #[test]
    fn split_handles_empty_quantities() {
        assert_eq!(split_amount(Decimal::from(10), 1, 0), Decimal::ZERO);
        assert_eq!(split_amount(Decimal::from(10), 1, 1), Decimal::from(10));
    }
}
