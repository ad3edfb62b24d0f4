//! Integration tests for the back-office list views: fetched JSON goes through
//! the same filter, sort and page pipeline the CLI uses.

use std::num::NonZeroUsize;

use fruitcart::prelude::*;
use rust_decimal::Decimal;
use testresult::TestResult;

fn products() -> Result<Vec<Product>, serde_json::Error> {
    serde_json::from_value(serde_json::json!([
        {"_id": "p1", "productName": "Green Apple", "category": [{"_id": "c1", "categoryName": "Fruits"}],
         "sellingPrice": 30, "price": 35, "quantity": 40, "createdAt": "2025-01-05T00:00:00Z"},
        {"_id": "p2", "productName": "Spinach", "category": "Greens",
         "sellingPrice": 12, "price": 15, "quantity": 3, "createdAt": "2025-01-06T00:00:00Z"},
        {"_id": "p3", "productName": "Red Apple", "category": {"_id": "c1", "categoryName": "Fruits"},
         "sellingPrice": 25, "price": 25, "quantity": 12, "createdAt": "2025-01-07T00:00:00Z"},
        {"_id": "p4", "productName": "Pineapple", "category": ["c9", "c10"],
         "sellingPrice": 90, "price": 100, "quantity": 1, "createdAt": "2025-01-08T00:00:00Z"},
        {"_id": "p5", "productName": "Apple Juice", "category": [],
         "sellingPrice": 45, "price": 50, "quantity": 0, "createdAt": "2025-01-09T00:00:00Z"}
    ]))
}

fn users() -> Result<Vec<User>, serde_json::Error> {
    serde_json::from_value(serde_json::json!([
        {"_id": "u1", "firstName": "zara", "lastName": "Alemu", "email": "z@example.com", "role": "GENERAL", "createdAt": "2025-02-01T00:00:00Z"},
        {"_id": "u2", "firstName": "Bekele", "lastName": "Tadesse", "email": "b@example.com", "role": "SALES", "createdAt": "2025-02-02T00:00:00Z"},
        {"_id": "u3", "firstName": "Almaz", "lastName": "Girma", "email": "a@example.com", "role": "GENERAL", "createdAt": "2025-02-03T00:00:00Z"},
        {"_id": "u4", "firstName": "Dawit", "lastName": "Haile", "email": "d@example.com", "role": "MANAGER", "createdAt": "2025-02-04T00:00:00Z"}
    ]))
}

fn names(page: &Page<&Product>) -> Vec<String> {
    page.items().iter().map(|p| p.product_name.clone()).collect()
}

#[test]
fn product_search_sorts_by_price() -> TestResult {
    let products = products()?;

    let query = ListQuery::new()
        .with_search("APPLE")
        .with_sort(SortKey::PriceHigh);

    let page = apply(&products, &query);

    assert_eq!(
        names(&page),
        vec!["Pineapple", "Apple Juice", "Green Apple", "Red Apple"]
    );
    assert_eq!(page.total(), 4);

    Ok(())
}

#[test]
fn product_category_filter_uses_normalized_names() -> TestResult {
    let products = products()?;

    assert_eq!(
        facet_options(&products),
        vec![
            "Fruits".to_string(),
            "Greens".to_string(),
            "Multiple Categories".to_string(),
            "Uncategorized".to_string()
        ]
    );

    let query = ListQuery::new()
        .with_facet(Some("Fruits".to_string()))
        .with_sort(SortKey::Oldest);

    assert_eq!(
        names(&apply(&products, &query)),
        vec!["Green Apple", "Red Apple"]
    );

    Ok(())
}

#[test]
fn product_pages_clamp_to_the_last_page() -> TestResult {
    let products = products()?;

    let query = ListQuery::new()
        .with_page_size(NonZeroUsize::new(2).ok_or("zero page size")?)
        .with_page(7);

    let page = apply(&products, &query);

    assert_eq!(page.page(), 3);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(names(&page), vec!["Green Apple"]);

    Ok(())
}

#[test]
fn user_search_spans_full_name_and_role_filter() -> TestResult {
    let users = users()?;

    let query = ListQuery::new()
        .with_search("az gir")
        .with_facet(Some(Role::General));

    let page = apply(&users, &query);
    let ids: Vec<&str> = page.items().iter().map(|u| u.id.as_str()).collect();

    assert_eq!(ids, vec!["u3"]);

    Ok(())
}

#[test]
fn user_alphabetical_sort_ignores_case() -> TestResult {
    let users = users()?;

    let page = apply(&users, &ListQuery::new().with_sort(SortKey::NameAsc));
    let firsts: Vec<&str> = page.items().iter().map(|u| u.first_name.as_str()).collect();

    assert_eq!(firsts, vec!["Almaz", "Bekele", "Dawit", "zara"]);

    let roles = facet_options(&users);

    assert_eq!(roles, vec![Role::General, Role::Sales, Role::Manager]);

    Ok(())
}

#[test]
fn no_match_is_an_empty_state() -> TestResult {
    let products = products()?;

    let page = apply(&products, &ListQuery::new().with_search("durian"));

    assert!(page.is_empty());
    assert_eq!(page.total_pages(), 0);
    assert_eq!(page.page(), 1);

    Ok(())
}

#[test]
fn stock_totals_follow_selling_price() -> TestResult {
    let products = products()?;

    let stock: Decimal = products.iter().map(Product::stock_value).sum();

    assert_eq!(stock, Decimal::from(30 * 40 + 12 * 3 + 25 * 12 + 90));

    Ok(())
}
