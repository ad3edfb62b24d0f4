use clap::{Args, Subcommand};
use fruitcart::{
    listing::{ListQuery, Page, SortKey},
    products::{Product, ProductId},
};
use fruitcart_app::{
    checkout::pay_for_product,
    listing::{ListController, LoadOutcome, dispatch},
};
use jiff::Timestamp;
use rust_decimal::Decimal;

use super::{Session, cart::PayerArgs, render, view::ConsoleView};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List(ListProductsArgs),

    /// Show one product
    Show(ProductIdArgs),

    /// Delete a product
    Delete(ProductIdArgs),

    /// Pay for a product and print the checkout link
    Buy(BuyProductArgs),
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Case-insensitive product name search
    #[arg(long, default_value = "")]
    search: String,

    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// newest, oldest, price-high or price-low
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Args)]
struct ProductIdArgs {
    /// Product id
    id: String,
}

#[derive(Debug, Args)]
struct BuyProductArgs {
    /// Product id
    id: String,

    /// Units to pay for
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    #[command(flatten)]
    payer: PayerArgs,
}

pub(crate) async fn run(command: ProductsCommand, session: &Session) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => {
            let query = ListQuery::new()
                .with_search(args.search)
                .with_facet(args.category)
                .with_sort(args.sort)
                .with_page_size(session.page_size)
                .with_page(args.page);

            list(session, query).await
        }
        ProductsSubcommand::Show(args) => show(session, args).await,
        ProductsSubcommand::Delete(args) => delete(session, args).await,
        ProductsSubcommand::Buy(args) => buy(session, args).await,
    }
}

async fn list(session: &Session, query: ListQuery<String>) -> Result<(), String> {
    let controller = ListController::new(query);

    if let LoadOutcome::Failed(notice) = controller
        .load(session.context.products.list_products())
        .await
    {
        return Err(notice.to_string());
    }

    let page = controller.page().await;
    let categories = controller.facet_options().await;

    println!("{}", products_table(session, &page));
    println!("{}", render::footer(&page));

    if !categories.is_empty() {
        println!("categories: {}", categories.join(", "));
    }

    Ok(())
}

fn products_table(session: &Session, page: &Page<Product>) -> String {
    render::table(
        &["#", "Id", "Name", "Category", "Price", "Selling", "Stock"],
        page.items().iter().enumerate().map(|(offset, product)| {
            [
                (page.first_row_number() + offset).to_string(),
                product.id.to_string(),
                product.product_name.clone(),
                product.category_name().to_string(),
                session.prices.format(product.price),
                session.prices.format(product.selling_price),
                product.quantity.to_string(),
            ]
        }),
        4..7,
    )
}

async fn show(session: &Session, args: ProductIdArgs) -> Result<(), String> {
    let product = session
        .context
        .products
        .product_details(ProductId::new(args.id))
        .await
        .map_err(|error| error.user_message())?;

    println!(
        "{}",
        render::figures([
            ("Name", product.product_name.clone()),
            ("Category", product.category_name().to_string()),
            ("Price", session.prices.format(product.price)),
            ("Selling price", session.prices.format(product.selling_price)),
            ("In stock", product.quantity.to_string()),
            ("Stock value", session.prices.format(product.stock_value())),
            ("Added", render::date(product.created_at)),
        ])
    );

    if !product.description.is_empty() {
        println!("{}", product.description);
    }

    Ok(())
}

async fn delete(session: &Session, args: ProductIdArgs) -> Result<(), String> {
    let role = session.user()?.role;

    if !role.can_manage_products() {
        return Err(format!("{role} accounts cannot manage products"));
    }

    let view = ConsoleView::new(move || async move {
        let query = ListQuery::new().with_page_size(session.page_size);

        if let Err(error) = list(session, query).await {
            println!("{error}");
        }
    });

    dispatch(
        &view,
        session.context.products.delete_product(ProductId::new(args.id)),
    )
    .await
    .map(drop)
    .map_err(|error| error.user_message())
}

async fn buy(session: &Session, args: BuyProductArgs) -> Result<(), String> {
    let user = session.user()?;

    let product = session
        .context
        .products
        .product_details(ProductId::new(args.id))
        .await
        .map_err(|error| error.user_message())?;

    let total = product.selling_price * Decimal::from(args.quantity.max(1));

    println!(
        "{} x {}: {}",
        args.quantity.max(1),
        product.product_name,
        session.prices.format(total)
    );

    let url = pay_for_product(
        session.context.payments.as_ref(),
        &session.context.state,
        &args.payer.into_payer(&user),
        &product.id,
        total,
        Timestamp::now(),
    )
    .await
    .map_err(|failure| failure.user_message())?;

    println!("continue payment at {url}");

    Ok(())
}
