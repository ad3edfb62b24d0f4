use std::num::NonZeroUsize;

use clap::{Args, Subcommand};
use fruitcart::{
    dashboard::{AdminDashboard, ManagerDashboard, SalesDashboard, TrendPoint},
    payments::{Payment, PaymentQuery, PaymentStats},
    roles::Panel,
};
use jiff::{Timestamp, tz::TimeZone};

use super::{Session, render};

/// Page size used to walk every payment.
const SWEEP_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(99);

#[derive(Debug, Args)]
pub(crate) struct DashboardCommand {
    #[command(subcommand)]
    command: DashboardSubcommand,
}

#[derive(Debug, Subcommand)]
enum DashboardSubcommand {
    /// Users, products, payments and monthly trends
    Admin,

    /// Catalog, stock and sales figures
    Manager,

    /// Sales, payment statuses, top products and recent messages
    Sales,
}

impl DashboardSubcommand {
    fn panel(&self) -> Panel {
        match self {
            Self::Admin => Panel::Admin,
            Self::Manager => Panel::Manager,
            Self::Sales => Panel::Sales,
        }
    }
}

pub(crate) async fn run(command: DashboardCommand, session: &Session) -> Result<(), String> {
    let user = session.user()?;
    let panel = command.command.panel();

    if user.role.panel() != Some(panel) {
        return Err(format!("{} accounts cannot open this dashboard", user.role));
    }

    let now = Timestamp::now();
    let tz = TimeZone::system();

    match command.command {
        DashboardSubcommand::Admin => admin(session, now, &tz).await,
        DashboardSubcommand::Manager => manager(session, now, &tz).await,
        DashboardSubcommand::Sales => sales(session, now, &tz).await,
    }
}

/// Every payment, plus the counters of the unfiltered first page.
async fn all_payments(session: &Session) -> Result<(Vec<Payment>, PaymentStats), String> {
    let mut payments = Vec::new();
    let mut stats = PaymentStats::default();
    let mut page = 1;

    loop {
        let query = PaymentQuery::new()
            .with_limit(SWEEP_PAGE_SIZE)
            .with_page(page);

        let response = session
            .context
            .payments
            .list_payments(query.clone())
            .await
            .map_err(|error| error.user_message())?;

        if let Some(first) = response.stats_for(&query) {
            stats = first;
        }

        let window = response.into_page(&query);
        let more = window.has_next();

        payments.extend(window.into_items());

        if !more {
            return Ok((payments, stats));
        }

        page += 1;
    }
}

fn trend_table<T>(title: &str, points: &[TrendPoint<T>], value: impl Fn(&T) -> String) -> String {
    render::table(
        &["Month", title],
        points
            .iter()
            .map(|point| [point.label.clone(), value(&point.value)]),
        1..2,
    )
}

async fn admin(session: &Session, now: Timestamp, tz: &TimeZone) -> Result<(), String> {
    let context = &session.context;

    let (users, products, payments) = tokio::join!(
        context.users.list_users(),
        context.products.list_products(),
        all_payments(session),
    );

    let users = users.map_err(|error| error.user_message())?;
    let products = products.map_err(|error| error.user_message())?;
    let (payments, stats) = payments?;

    let dashboard = AdminDashboard::compute(&users, &products, &payments, stats, now, tz);

    println!(
        "{}",
        render::figures([
            ("Users", dashboard.total_users.to_string()),
            ("Products", dashboard.total_products.to_string()),
            ("Payments", dashboard.payments.total.to_string()),
            ("Successful", dashboard.payments.successful.to_string()),
            ("Pending", dashboard.payments.pending.to_string()),
            ("Failed", dashboard.payments.failed.to_string()),
            ("Approved", dashboard.payments.approved.to_string()),
            ("Revenue", session.prices.format(dashboard.payments.revenue)),
        ])
    );
    println!(
        "{}",
        trend_table("Payments", &dashboard.payment_trend, ToString::to_string)
    );
    println!(
        "{}",
        trend_table("Sign-ups", &dashboard.user_growth, ToString::to_string)
    );

    Ok(())
}

async fn manager(session: &Session, now: Timestamp, tz: &TimeZone) -> Result<(), String> {
    let (products, payments) = tokio::join!(
        session.context.products.list_products(),
        all_payments(session),
    );

    let products = products.map_err(|error| error.user_message())?;
    let (payments, _) = payments?;

    let dashboard = ManagerDashboard::compute(&products, &payments, now, tz);

    println!(
        "{}",
        render::figures([
            ("Products", dashboard.total_products.to_string()),
            ("Categories", dashboard.total_categories.to_string()),
            ("Stock value", session.prices.format(dashboard.stock_value)),
            ("Low stock", dashboard.low_stock.to_string()),
            ("Product sales", session.prices.format(dashboard.product_sales)),
        ])
    );
    println!(
        "{}",
        render::table(
            &["Category", "Products"],
            dashboard
                .categories
                .iter()
                .map(|category| [category.name.clone(), category.count.to_string()]),
            1..2,
        )
    );
    println!(
        "{}",
        trend_table("Sales", &dashboard.sales_trend, |amount| {
            session.prices.format(*amount)
        })
    );

    Ok(())
}

async fn sales(session: &Session, now: Timestamp, tz: &TimeZone) -> Result<(), String> {
    let (payments, messages) = tokio::join!(
        all_payments(session),
        session.context.messages.list_messages(),
    );

    let (payments, _) = payments?;
    let messages = messages.map_err(|error| error.user_message())?;

    let dashboard = SalesDashboard::compute(&payments, &messages, now, tz);
    let counts = &dashboard.status_counts;

    println!(
        "{}",
        render::figures([
            ("Total sales", session.prices.format(dashboard.total_sales)),
            ("Successful payments", dashboard.successful_payments.to_string()),
            ("Pending payments", dashboard.pending_payments.to_string()),
            ("Success", counts.success.to_string()),
            ("Pending", counts.pending.to_string()),
            ("Failed", counts.failed.to_string()),
            ("Approved", counts.approved.to_string()),
        ])
    );
    println!(
        "{}",
        render::table(
            &["Top product", "Sales"],
            dashboard
                .top_products
                .iter()
                .map(|product| [product.name.clone(), session.prices.format(product.sales)]),
            1..2,
        )
    );
    println!(
        "{}",
        trend_table("Sales", &dashboard.sales_trend, |amount| {
            session.prices.format(*amount)
        })
    );
    println!(
        "{}",
        render::table(
            &["Recent message", "From", "Sent"],
            dashboard.recent_messages.iter().map(|message| {
                [
                    message.subject.clone(),
                    message.name.clone(),
                    render::date(message.created_at),
                ]
            }),
            0..0,
        )
    );

    Ok(())
}
