//! Integration tests for the cart view and the checkout requests it produces.

use fruitcart::prelude::*;
use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

fn cart_lines() -> Result<Vec<CartItem>, serde_json::Error> {
    serde_json::from_value(serde_json::json!([
        {"_id": "line-1", "quantity": 2, "productId": {
            "_id": "p1", "productName": "Mango", "category": "Fruits",
            "sellingPrice": 100, "price": 120, "createdAt": "2025-01-01T00:00:00Z"}},
        {"_id": "line-2", "quantity": 1, "productId": {
            "_id": "p2", "productName": "Papaya", "category": "Fruits",
            "sellingPrice": 50, "price": 60, "createdAt": "2025-01-01T00:00:00Z"}}
    ]))
}

fn payer() -> Payer {
    Payer {
        first_name: "Selam".to_string(),
        last_name: "Worku".to_string(),
        email: "selam@example.com".to_string(),
        phone_number: "0912345678".to_string(),
    }
}

#[test]
fn deselecting_a_line_changes_totals() -> TestResult {
    let mut cart = Cart::new(cart_lines()?);

    cart.toggle(&CartItemId::new("line-2"));

    assert_eq!(cart.selected_total(), Decimal::from(200));
    assert_eq!(cart.selected_quantity(), 2);
    assert_eq!(cart.selected_count(), 1);

    Ok(())
}

#[test]
fn refetch_reselects_every_line() -> TestResult {
    let mut cart = Cart::new(cart_lines()?);

    cart.toggle(&CartItemId::new("line-1"));
    cart.replace(cart_lines()?);

    assert_eq!(cart.selected_count(), 2);

    Ok(())
}

#[test]
fn cart_checkout_sends_one_request_per_selected_line() -> TestResult {
    let cart = Cart::new(cart_lines()?);
    let at = Timestamp::from_millisecond(1_700_000_000_000)?;

    let requests = cart_payments(Some(&UserId::new("u7")), &payer(), &cart, at)?;
    let bodies = requests
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(bodies.len(), 2);

    let first = bodies.first().ok_or("missing first body")?;

    assert_eq!(first["userId"], "u7");
    assert_eq!(first["productId"], "p1");
    assert_eq!(first["type"], "cart");
    assert_eq!(first["quantity"], 2);
    assert_eq!(first["tx_ref"], "tx-p1-1700000000000-0");

    let shares: Decimal = requests.iter().map(|r| r.amount).sum();

    assert_eq!(shares, Decimal::from(250));

    Ok(())
}

#[test]
fn incomplete_payer_blocks_checkout() -> TestResult {
    let cart = Cart::new(cart_lines()?);
    let payer = Payer {
        phone_number: String::new(),
        ..payer()
    };

    let Err(CheckoutError::Payer(errors)) =
        cart_payments(Some(&UserId::new("u7")), &payer, &cart, Timestamp::UNIX_EPOCH)
    else {
        return Err("expected payer validation to fail".into());
    };

    assert!(errors.for_field("phoneNumber").is_some());

    Ok(())
}

#[test]
fn decrement_stops_at_one() -> TestResult {
    let cart = Cart::new(cart_lines()?);

    assert_eq!(cart.decrement(&CartItemId::new("line-2")), None);
    assert_eq!(
        cart.increment(&CartItemId::new("line-2")).map(|c| c.quantity),
        Some(2)
    );

    Ok(())
}
