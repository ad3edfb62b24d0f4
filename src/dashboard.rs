//! Dashboard
//!
//! Summary figures for the admin, manager and sales panels, computed from
//! already-fetched collections.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    listing::facet_options,
    messages::{self, Message},
    payments::{Payment, PaymentStats, PaymentStatus},
    products::{Product, ProductId},
    users::User,
};

/// Months covered by every trend chart.
pub const TREND_MONTHS: usize = 6;

/// Entries in the top-products and recent-messages lists.
pub const TOP_ENTRIES: usize = 5;

/// A calendar month in the dashboard's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i16,
    month: i8,
}

impl Month {
    /// Month containing `at` in `tz`.
    pub fn containing(at: Timestamp, tz: &TimeZone) -> Self {
        let zoned = at.to_zoned(tz.clone());

        Self {
            year: zoned.year(),
            month: zoned.month(),
        }
    }

    /// The month `count` months before this one.
    #[must_use]
    pub fn back(self, count: usize) -> Self {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        let index = i32::from(self.year) * 12 + i32::from(self.month) - 1 - count;

        Self {
            year: i16::try_from(index.div_euclid(12)).unwrap_or(i16::MIN),
            month: i8::try_from(index.rem_euclid(12) + 1).unwrap_or(1),
        }
    }

    /// Chart label, e.g. `Mar 2025`.
    pub fn label(self) -> String {
        Date::new(self.year, self.month, 1)
            .map(|date| date.strftime("%b %Y").to_string())
            .unwrap_or_default()
    }
}

/// The last [`TREND_MONTHS`] months ending with the month containing `now`,
/// oldest first.
pub fn trend_months(now: Timestamp, tz: &TimeZone) -> Vec<Month> {
    let current = Month::containing(now, tz);

    (0..TREND_MONTHS).rev().map(|back| current.back(back)).collect()
}

/// One point of a monthly trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint<T> {
    /// Month label.
    pub label: String,

    /// Value for the month.
    pub value: T,
}

fn monthly<'a, R: 'a, T: Default + Copy>(
    months: &[Month],
    records: impl IntoIterator<Item = &'a R>,
    tz: &TimeZone,
    created_at: impl Fn(&R) -> Timestamp,
    mut add: impl FnMut(&mut T, &R),
) -> Vec<TrendPoint<T>> {
    let mut buckets: FxHashMap<Month, T> = FxHashMap::default();

    for record in records {
        let month = Month::containing(created_at(record), tz);

        if months.contains(&month) {
            add(buckets.entry(month).or_default(), record);
        }
    }

    months
        .iter()
        .map(|month| TrendPoint {
            label: month.label(),
            value: buckets.get(month).copied().unwrap_or_default(),
        })
        .collect()
}

fn settled(payments: &[Payment]) -> impl Iterator<Item = &Payment> {
    payments.iter().filter(|payment| payment.is_settled())
}

fn settled_sales(payments: &[Payment]) -> Decimal {
    settled(payments).map(|payment| payment.amount).sum()
}

fn sales_trend(payments: &[Payment], months: &[Month], tz: &TimeZone) -> Vec<TrendPoint<Decimal>> {
    monthly(
        months,
        settled(payments),
        tz,
        |payment| payment.created_at,
        |sum: &mut Decimal, payment| *sum += payment.amount,
    )
}

/// Admin panel figures.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    /// Registered users.
    pub total_users: usize,

    /// Listed products.
    pub total_products: usize,

    /// Payment counters reported by the backend.
    pub payments: PaymentStats,

    /// Payments initiated per month.
    pub payment_trend: Vec<TrendPoint<usize>>,

    /// Users signed up per month.
    pub user_growth: Vec<TrendPoint<usize>>,
}

impl AdminDashboard {
    /// Compute from the user and product lists and the first payments page.
    pub fn compute(
        users: &[User],
        products: &[Product],
        payments: &[Payment],
        stats: PaymentStats,
        now: Timestamp,
        tz: &TimeZone,
    ) -> Self {
        let months = trend_months(now, tz);

        Self {
            total_users: users.len(),
            total_products: products.len(),
            payments: stats,
            payment_trend: monthly(
                &months,
                payments,
                tz,
                |payment| payment.created_at,
                |count: &mut usize, _| *count += 1,
            ),
            user_growth: monthly(
                &months,
                users,
                tz,
                |user| user.created_at,
                |count: &mut usize, _| *count += 1,
            ),
        }
    }
}

/// Products in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Category label.
    pub name: String,

    /// Products carrying it.
    pub count: usize,
}

/// Manager panel figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerDashboard {
    /// Listed products.
    pub total_products: usize,

    /// Distinct categories across products.
    pub total_categories: usize,

    /// Selling price times stock, over every product.
    pub stock_value: Decimal,

    /// Products under the low-stock threshold.
    pub low_stock: usize,

    /// Settled sales.
    pub product_sales: Decimal,

    /// Products per category, in first-seen order.
    pub categories: Vec<CategoryCount>,

    /// Settled sales per month.
    pub sales_trend: Vec<TrendPoint<Decimal>>,
}

impl ManagerDashboard {
    /// Compute from the product list and fetched payments.
    pub fn compute(products: &[Product], payments: &[Payment], now: Timestamp, tz: &TimeZone) -> Self {
        let months = trend_months(now, tz);

        let categories: Vec<CategoryCount> = facet_options(products)
            .into_iter()
            .map(|name| CategoryCount {
                count: products
                    .iter()
                    .filter(|product| product.category_name() == name)
                    .count(),
                name,
            })
            .collect();

        Self {
            total_products: products.len(),
            total_categories: categories.len(),
            stock_value: products.iter().map(Product::stock_value).sum(),
            low_stock: products.iter().filter(|product| product.is_low_stock()).count(),
            product_sales: settled_sales(payments),
            categories,
            sales_trend: sales_trend(payments, &months, tz),
        }
    }
}

/// Settled sales of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    /// Product id.
    pub id: ProductId,

    /// Product name at the time of payment.
    pub name: String,

    /// Settled amount.
    pub sales: Decimal,
}

/// Payments per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// `success` payments.
    pub success: usize,

    /// `pending` payments.
    pub pending: usize,

    /// `failed` payments.
    pub failed: usize,

    /// `approved` payments.
    pub approved: usize,
}

impl StatusCounts {
    /// Count statuses across payments.
    pub fn tally(payments: &[Payment]) -> Self {
        payments.iter().fold(Self::default(), |mut counts, payment| {
            match payment.status {
                PaymentStatus::Success => counts.success += 1,
                PaymentStatus::Pending => counts.pending += 1,
                PaymentStatus::Failed => counts.failed += 1,
                PaymentStatus::Approved => counts.approved += 1,
            }

            counts
        })
    }
}

/// Sales panel figures.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesDashboard {
    /// Settled sales.
    pub total_sales: Decimal,

    /// Settled payments, `success` or `approved`.
    pub successful_payments: usize,

    /// Pending payments.
    pub pending_payments: usize,

    /// Payments per status.
    pub status_counts: StatusCounts,

    /// Best selling products by settled amount.
    pub top_products: Vec<ProductSales>,

    /// Settled sales per month.
    pub sales_trend: Vec<TrendPoint<Decimal>>,

    /// Latest customer messages.
    pub recent_messages: Vec<Message>,
}

/// Best sellers by settled amount, highest first; ties keep first-seen order.
pub fn top_products(payments: &[Payment], count: usize) -> Vec<ProductSales> {
    let mut index: FxHashMap<&ProductId, usize> = FxHashMap::default();
    let mut totals: Vec<ProductSales> = Vec::new();

    for payment in settled(payments) {
        let Some(product) = payment.product_id.as_ref() else {
            continue;
        };

        if let Some(&position) = index.get(&product.id) {
            if let Some(entry) = totals.get_mut(position) {
                entry.sales += payment.amount;
            }
        } else {
            index.insert(&product.id, totals.len());
            totals.push(ProductSales {
                id: product.id.clone(),
                name: product.product_name.clone(),
                sales: payment.amount,
            });
        }
    }

    totals.sort_by_key(|entry| std::cmp::Reverse(entry.sales));
    totals.truncate(count);

    totals
}

impl SalesDashboard {
    /// Compute from fetched payments and messages.
    pub fn compute(payments: &[Payment], messages: &[Message], now: Timestamp, tz: &TimeZone) -> Self {
        let months = trend_months(now, tz);
        let status_counts = StatusCounts::tally(payments);

        Self {
            total_sales: settled_sales(payments),
            successful_payments: status_counts.success + status_counts.approved,
            pending_payments: status_counts.pending,
            status_counts,
            top_products: top_products(payments, TOP_ENTRIES),
            sales_trend: sales_trend(payments, &months, tz),
            recent_messages: messages::recent(messages, TOP_ENTRIES)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}
