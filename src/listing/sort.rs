//! Sorting

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

use super::Listable;

/// Order applied to a list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,

    /// Least recently created first.
    Oldest,

    /// Most expensive first.
    PriceHigh,

    /// Cheapest first.
    PriceLow,

    /// Name A to Z, ignoring case.
    NameAsc,

    /// Name Z to A, ignoring case.
    NameDesc,
}

/// Returned when a sort key string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl SortKey {
    /// Compare two records under this key.
    pub fn compare<T: Listable>(self, a: &T, b: &T) -> Ordering {
        match self {
            SortKey::Newest => b.created_at().cmp(&a.created_at()),
            SortKey::Oldest => a.created_at().cmp(&b.created_at()),
            SortKey::PriceHigh => compare_prices(b, a),
            SortKey::PriceLow => compare_prices(a, b),
            SortKey::NameAsc => compare_names(a, b),
            SortKey::NameDesc => compare_names(b, a),
        }
    }

    /// Stable in-place sort of borrowed records.
    pub fn sort<T: Listable>(self, items: &mut [&T]) {
        items.sort_by(|a, b| self.compare(*a, *b));
    }

    /// Identifier used on the command line and in saved views.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::PriceHigh => "price-high",
            SortKey::PriceLow => "price-low",
            SortKey::NameAsc => "a-z",
            SortKey::NameDesc => "z-a",
        }
    }
}

fn compare_prices<T: Listable>(a: &T, b: &T) -> Ordering {
    match (a.price(), b.price()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

fn compare_names<T: Listable>(a: &T, b: &T) -> Ordering {
    a.name().to_lowercase().cmp(&b.name().to_lowercase())
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "price-high" => Ok(SortKey::PriceHigh),
            "price-low" => Ok(SortKey::PriceLow),
            "a-z" => Ok(SortKey::NameAsc),
            "z-a" => Ok(SortKey::NameDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}
