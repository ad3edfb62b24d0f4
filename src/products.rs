//! Products

use std::borrow::Cow;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    categories::{self, CategoryRefs},
    ids::TypedId,
    listing::Listable,
    validation::{ValidationError, ValidationErrors, required},
};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Stock below this many units counts as low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Product as listed by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: ProductId,

    /// Display name.
    pub product_name: String,

    /// Normalized category references.
    #[serde(default, deserialize_with = "categories::deserialize_refs")]
    pub category: CategoryRefs,

    /// Image URLs, first one is the thumbnail.
    #[serde(default)]
    pub product_image: Vec<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// List price.
    #[serde(default)]
    pub price: Decimal,

    /// Price the customer pays.
    #[serde(default)]
    pub selling_price: Decimal,

    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,

    /// When the product was uploaded.
    pub created_at: Timestamp,
}

impl Product {
    /// Label of the product's category.
    pub fn category_name(&self) -> &str {
        categories::display_name(&self.category)
    }

    /// Selling price times units in stock.
    pub fn stock_value(&self) -> Decimal {
        self.selling_price * Decimal::from(self.quantity)
    }

    /// Whether stock has dropped under [`LOW_STOCK_THRESHOLD`].
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    /// First image, used as the thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.product_image.first().map(String::as_str)
    }
}

impl Listable for Product {
    type Facet = String;

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.product_name)
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn price(&self) -> Option<Decimal> {
        Some(self.selling_price)
    }

    fn facet(&self) -> Option<String> {
        Some(self.category_name().to_string())
    }
}

/// Fields sent when uploading or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Existing product id; set for edits, absent for uploads.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,

    /// Display name.
    pub product_name: String,

    /// Category name as chosen in the form.
    pub category: String,

    /// Uploaded image URLs.
    pub product_image: Vec<String>,

    /// Free-text description.
    pub description: String,

    /// List price.
    pub price: Decimal,

    /// Price the customer pays.
    pub selling_price: Decimal,

    /// Units in stock.
    pub quantity: u32,
}

impl ProductDraft {
    /// Prefill an edit form from an existing product.
    pub fn edit(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            product_name: product.product_name.clone(),
            category: product.category_name().to_string(),
            product_image: product.product_image.clone(),
            description: product.description.clone(),
            price: product.price,
            selling_price: product.selling_price,
            quantity: product.quantity,
        }
    }

    /// Check the fields the upload and edit forms require.
    ///
    /// # Errors
    ///
    /// All failing checks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(required("productName", &self.product_name));
        errors.check(required("category", &self.category));

        if self.selling_price <= Decimal::ZERO {
            errors.push(ValidationError::NotPositive {
                field: "sellingPrice",
            });
        }

        errors.into_result()
    }
}
