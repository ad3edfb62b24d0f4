use std::num::NonZeroUsize;

use clap::{Args, Subcommand};
use fruitcart::payments::{Payment, PaymentQuery, PaymentStatus};
use fruitcart_app::listing::{LoadOutcome, PaymentsController, dispatch};
use jiff::{Timestamp, civil::Date, tz::TimeZone};

use super::{Session, render, view::ConsoleView};

/// Page size used while looking a payment up by id.
const LOOKUP_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(99);

#[derive(Debug, Args)]
pub(crate) struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentsSubcommand {
    /// List payments, filtered and paged by the backend
    List(ListPaymentsArgs),

    /// Approve a pending payment
    Approve(ApprovePaymentArgs),
}

#[derive(Debug, Args)]
struct ListPaymentsArgs {
    /// Search on transaction reference, customer or product
    #[arg(long, default_value = "")]
    search: String,

    /// pending, success, failed or approved
    #[arg(long)]
    status: Option<PaymentStatus>,

    /// First day of the creation date range
    #[arg(long, requires = "to")]
    from: Option<Date>,

    /// Last day of the creation date range
    #[arg(long, requires = "from")]
    to: Option<Date>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page; defaults to the configured page size
    #[arg(long)]
    limit: Option<NonZeroUsize>,
}

#[derive(Debug, Args)]
struct ApprovePaymentArgs {
    /// Payment id
    id: String,
}

pub(crate) async fn run(command: PaymentsCommand, session: &Session) -> Result<(), String> {
    match command.command {
        PaymentsSubcommand::List(args) => {
            let range = match (args.from, args.to) {
                (Some(from), Some(to)) => Some(day_range(from, to, &TimeZone::system())?),
                _ => None,
            };

            let query = PaymentQuery::new()
                .with_limit(args.limit.unwrap_or(session.page_size))
                .with_search(args.search)
                .with_status(args.status)
                .with_range(range)
                .with_page(args.page);

            list(session, query).await
        }
        PaymentsSubcommand::Approve(args) => approve(session, &args.id).await,
    }
}

/// Start of `from` to the end of `to`, in `tz`.
fn day_range(from: Date, to: Date, tz: &TimeZone) -> Result<(Timestamp, Timestamp), String> {
    if to < from {
        return Err(format!("date range ends before it starts: {from} to {to}"));
    }

    let start = from
        .to_zoned(tz.clone())
        .map_err(|error| format!("invalid start date: {error}"))?;
    let end = to
        .at(23, 59, 59, 999_999_999)
        .to_zoned(tz.clone())
        .map_err(|error| format!("invalid end date: {error}"))?;

    Ok((start.timestamp(), end.timestamp()))
}

async fn list(session: &Session, query: PaymentQuery) -> Result<(), String> {
    let controller = PaymentsController::new();
    let payments = &session.context.payments;

    if let LoadOutcome::Failed(notice) = controller
        .load(query, |query| payments.list_payments(query))
        .await
    {
        return Err(notice.to_string());
    }

    if let Some(stats) = controller.stats().await {
        println!(
            "{}",
            render::figures([
                ("Payments", stats.total.to_string()),
                ("Successful", stats.successful.to_string()),
                ("Pending", stats.pending.to_string()),
                ("Failed", stats.failed.to_string()),
                ("Approved", stats.approved.to_string()),
                ("Revenue", session.prices.format(stats.revenue)),
            ])
        );
    }

    let page = controller.page().await;

    println!(
        "{}",
        render::table(
            &["#", "Id", "Reference", "Customer", "Product", "Qty", "Amount", "Status", "Date"],
            page.items().iter().enumerate().map(|(offset, payment)| {
                [
                    (page.first_row_number() + offset).to_string(),
                    payment.id.to_string(),
                    payment.tx_ref.clone(),
                    payment.customer_name(),
                    payment.product_name().to_string(),
                    payment.quantity.to_string(),
                    session.prices.format(payment.amount),
                    payment.status.to_string(),
                    render::date(payment.created_at),
                ]
            }),
            5..7,
        )
    );
    println!("{}", render::footer(&page));

    Ok(())
}

/// Walk the pending payments until `id` turns up.
async fn find_pending(session: &Session, id: &str) -> Result<Option<Payment>, String> {
    let mut page = 1;

    loop {
        let query = PaymentQuery::new()
            .with_limit(LOOKUP_PAGE_SIZE)
            .with_status(Some(PaymentStatus::Pending))
            .with_page(page);

        let response = session
            .context
            .payments
            .list_payments(query.clone())
            .await
            .map_err(|error| error.user_message())?;

        let window = response.into_page(&query);

        if let Some(payment) = window
            .items()
            .iter()
            .find(|payment| payment.id.as_str() == id)
        {
            return Ok(Some(payment.clone()));
        }

        if !window.has_next() {
            return Ok(None);
        }

        page += 1;
    }
}

async fn approve(session: &Session, id: &str) -> Result<(), String> {
    let Some(payment) = find_pending(session, id).await? else {
        return Err(format!("no pending payment with id {id}"));
    };

    let view = ConsoleView::new(move || async move {
        let query = PaymentQuery::new().with_limit(session.page_size);

        if let Err(error) = list(session, query).await {
            println!("{error}");
        }
    });

    dispatch(&view, session.context.payments.approve_payment(payment))
        .await
        .map(drop)
        .map_err(|error| error.user_message())
}
