//! Cart
//!
//! The cart view keeps a selection over the fetched cart lines. Totals, the
//! checkout split and the pay button only see selected lines.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    products::{Product, ProductId},
};

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// One line of the signed-in user's cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Backend id of the cart line.
    #[serde(rename = "_id")]
    pub id: CartItemId,

    /// Populated product. Absent when the product has since been deleted.
    #[serde(default, rename = "productId")]
    pub product: Option<Product>,

    /// Units in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Selling price times quantity; zero when the product is gone.
    pub fn line_total(&self) -> Decimal {
        self.product
            .as_ref()
            .map_or(Decimal::ZERO, |product| {
                product.selling_price * Decimal::from(self.quantity)
            })
    }

    /// Id of the product on this line.
    pub fn product_id(&self) -> Option<&ProductId> {
        self.product.as_ref().map(|product| &product.id)
    }
}

/// Body of the update-cart-line request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    /// Cart line to update.
    #[serde(rename = "_id")]
    pub id: CartItemId,

    /// New quantity.
    pub quantity: u32,
}

/// Body of the add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    /// Product to add.
    pub product_id: ProductId,
}

/// Cart lines plus the user's selection.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    selected: FxHashSet<CartItemId>,
}

impl Cart {
    /// Cart with every line selected.
    pub fn new(items: Vec<CartItem>) -> Self {
        let mut cart = Self::default();

        cart.replace(items);

        cart
    }

    /// Replace the lines after a fetch. The selection resets to every line.
    pub fn replace(&mut self, items: Vec<CartItem>) {
        self.selected = items.iter().map(|item| item.id.clone()).collect();
        self.items = items;
    }

    /// All lines in fetch order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line.
    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether a line is selected.
    pub fn is_selected(&self, id: &CartItemId) -> bool {
        self.selected.contains(id)
    }

    /// Flip a line's selection. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &CartItemId) {
        if self.get(id).is_none() {
            return;
        }

        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
    }

    /// Selected lines in fetch order.
    pub fn selected_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
    }

    /// Number of selected lines.
    pub fn selected_count(&self) -> usize {
        self.selected_items().count()
    }

    /// Units across selected lines.
    pub fn selected_quantity(&self) -> u32 {
        self.selected_items().map(|item| item.quantity).sum()
    }

    /// Price of selected lines.
    pub fn selected_total(&self) -> Decimal {
        self.selected_items().map(CartItem::line_total).sum()
    }

    /// Request that adds one unit to a line.
    pub fn increment(&self, id: &CartItemId) -> Option<QuantityChange> {
        let item = self.get(id)?;

        Some(QuantityChange {
            id: item.id.clone(),
            quantity: item.quantity.saturating_add(1),
        })
    }

    /// Request that removes one unit from a line. A single unit is never
    /// decremented; deleting the line is a separate action.
    pub fn decrement(&self, id: &CartItemId) -> Option<QuantityChange> {
        let item = self.get(id).filter(|item| item.quantity >= 2)?;

        Some(QuantityChange {
            id: item.id.clone(),
            quantity: item.quantity - 1,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use jiff::Timestamp;
    use rust_decimal::Decimal;

    use super::*;

    pub(crate) fn product(id: &str, selling_price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            product_name: format!("Product {id}"),
            category: crate::categories::CategoryRefs::new(),
            product_image: Vec::new(),
            description: String::new(),
            price: Decimal::from(selling_price),
            selling_price: Decimal::from(selling_price),
            quantity: 100,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(crate) fn line(id: &str, product_id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product: Some(product(product_id, price)),
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::{test_support::line, *};

    fn cart() -> Cart {
        Cart::new(vec![line("a", "p1", 100, 2), line("b", "p2", 50, 1)])
    }

    #[test]
    fn everything_is_selected_after_fetch() {
        let cart = cart();

        assert_eq!(cart.selected_count(), 2);
        assert_eq!(cart.selected_quantity(), 3);
        assert_eq!(cart.selected_total(), Decimal::from(250));
    }

    #[test]
    fn totals_follow_the_selection() {
        let mut cart = cart();

        cart.toggle(&CartItemId::new("b"));

        assert_eq!(cart.selected_total(), Decimal::from(200));
        assert_eq!(cart.selected_quantity(), 2);

        cart.toggle(&CartItemId::new("b"));

        assert_eq!(cart.selected_count(), 2);
    }

    #[test]
    fn replacing_lines_reselects_everything() {
        let mut cart = cart();

        cart.toggle(&CartItemId::new("a"));
        cart.replace(vec![line("a", "p1", 100, 3)]);

        assert!(cart.is_selected(&CartItemId::new("a")));
        assert_eq!(cart.selected_total(), Decimal::from(300));
    }

    #[test]
    fn toggling_unknown_lines_is_ignored() {
        let mut cart = cart();

        cart.toggle(&CartItemId::new("zzz"));

        assert!(!cart.is_selected(&CartItemId::new("zzz")));
    }

    #[test]
    fn increment_and_decrement_requests() -> TestResult {
        let cart = cart();

        let up = cart.increment(&CartItemId::new("b")).ok_or("no increment")?;

        assert_eq!(up.quantity, 2);
        assert_eq!(cart.decrement(&CartItemId::new("b")), None);

        let down = cart.decrement(&CartItemId::new("a")).ok_or("no decrement")?;

        assert_eq!(down.quantity, 1);

        Ok(())
    }

    #[test]
    fn lines_without_a_product_cost_nothing() -> TestResult {
        let item: CartItem = serde_json::from_str(r#"{"_id":"x","productId":null,"quantity":4}"#)?;

        assert_eq!(item.line_total(), Decimal::ZERO);
        assert_eq!(item.product_id(), None);

        Ok(())
    }

    #[test]
    fn quantity_change_uses_backend_field_names() -> TestResult {
        let json = serde_json::to_value(QuantityChange {
            id: CartItemId::new("a"),
            quantity: 3,
        })?;

        assert_eq!(json, serde_json::json!({"_id": "a", "quantity": 3}));

        Ok(())
    }
}
