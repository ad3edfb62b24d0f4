//! Categories
//!
//! The backend stores a product's category in several shapes: a plain string, a
//! populated category document, an array of ids, or an array of populated
//! documents. [`deserialize_refs`] folds all of them into a list of
//! [`CategoryRef`]s at the fetch boundary, and [`display_name`] picks the label a
//! list row shows.

use std::borrow::Cow;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::{ids::TypedId, listing::Listable};

/// Category Id
pub type CategoryId = TypedId<Category>;

/// Label for products with no usable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Label for products referencing categories by id only.
pub const MULTIPLE_CATEGORIES: &str = "Multiple Categories";

/// Normalized category references carried by a product.
pub type CategoryRefs = SmallVec<[CategoryRef; 1]>;

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: CategoryId,

    /// Display name.
    pub category_name: String,

    /// When the category was created.
    pub created_at: Timestamp,
}

impl Listable for Category {
    type Facet = std::convert::Infallible;

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.category_name)
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// One category a product points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    /// Backend id, when the product referenced the category by id.
    pub id: Option<CategoryId>,

    /// Category name, when the reference was populated or given as text.
    pub name: Option<String>,
}

impl CategoryRef {
    /// Reference known only by id.
    pub fn unpopulated(id: impl Into<String>) -> Self {
        Self {
            id: Some(CategoryId::new(id)),
            name: None,
        }
    }

    /// Reference known by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopulatedCategory {
    #[serde(default, rename = "_id")]
    id: Option<String>,

    #[serde(default)]
    category_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryItem {
    Id(String),
    Populated(PopulatedCategory),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Text(String),
    Many(Vec<RawCategoryItem>),
    One(PopulatedCategory),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|name| !name.trim().is_empty())
}

fn normalize(raw: Option<RawCategory>) -> CategoryRefs {
    match raw {
        None => CategoryRefs::new(),
        Some(RawCategory::Text(text)) if text.trim().is_empty() => CategoryRefs::new(),
        Some(RawCategory::Text(text)) => smallvec::smallvec![CategoryRef::named(text)],
        Some(RawCategory::One(populated)) => non_blank(populated.category_name)
            .map(|name| CategoryRef {
                id: populated.id.map(CategoryId::new),
                name: Some(name),
            })
            .into_iter()
            .collect(),
        Some(RawCategory::Many(items)) => items
            .into_iter()
            .map(|item| match item {
                RawCategoryItem::Id(id) => CategoryRef::unpopulated(id),
                RawCategoryItem::Populated(populated) => CategoryRef {
                    id: populated.id.map(CategoryId::new),
                    name: non_blank(populated.category_name),
                },
            })
            .collect(),
    }
}

/// Deserialize any of the backend's category shapes into normalized references.
///
/// # Errors
///
/// Fails only when the field holds a JSON type no category shape accepts (a
/// number or boolean, say).
pub fn deserialize_refs<'de, D>(deserializer: D) -> Result<CategoryRefs, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawCategory>::deserialize(deserializer).map(normalize)
}

/// Label shown for a product's category.
///
/// The first reference's name wins. A first reference without a name means the
/// product only carries category ids.
pub fn display_name(refs: &[CategoryRef]) -> &str {
    match refs.first() {
        Some(CategoryRef {
            name: Some(name), ..
        }) => name,
        Some(_) => MULTIPLE_CATEGORIES,
        None => UNCATEGORIZED,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testresult::TestResult;

    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_refs")]
        category: CategoryRefs,
    }

    fn label(json: &str) -> Result<String, serde_json::Error> {
        let holder: Holder = serde_json::from_str(json)?;

        Ok(display_name(&holder.category).to_string())
    }

    #[test]
    fn plain_string_is_its_own_label() -> TestResult {
        assert_eq!(label(r#"{"category":"Fruits"}"#)?, "Fruits");

        Ok(())
    }

    #[test]
    fn populated_object_uses_its_name() -> TestResult {
        assert_eq!(
            label(r#"{"category":{"_id":"c1","categoryName":"Citrus"}}"#)?,
            "Citrus"
        );
        assert_eq!(label(r#"{"category":{"_id":"c1"}}"#)?, UNCATEGORIZED);

        Ok(())
    }

    #[test]
    fn arrays_use_first_populated_name() -> TestResult {
        assert_eq!(
            label(r#"{"category":[{"_id":"c1","categoryName":"Berries"},"c2"]}"#)?,
            "Berries"
        );
        assert_eq!(label(r#"{"category":["c1","c2"]}"#)?, MULTIPLE_CATEGORIES);

        Ok(())
    }

    #[test]
    fn missing_or_empty_is_uncategorized() -> TestResult {
        assert_eq!(label("{}")?, UNCATEGORIZED);
        assert_eq!(label(r#"{"category":null}"#)?, UNCATEGORIZED);
        assert_eq!(label(r#"{"category":""}"#)?, UNCATEGORIZED);
        assert_eq!(label(r#"{"category":[]}"#)?, UNCATEGORIZED);

        Ok(())
    }

    #[test]
    fn unpopulated_ids_are_kept() -> TestResult {
        let holder: Holder = serde_json::from_str(r#"{"category":["c1"]}"#)?;

        assert_eq!(holder.category.as_slice(), &[CategoryRef::unpopulated("c1")]);

        Ok(())
    }
}
