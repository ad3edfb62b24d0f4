use std::sync::Arc;

use clap::{Args, Subcommand};
use fruitcart::{
    cart::{Cart, CartItemId},
    checkout::Payer,
    products::ProductId,
    users::User,
};
use fruitcart_app::{
    cart::{CartController, CartUpdate},
    checkout::pay_for_cart,
    listing::LoadOutcome,
};
use jiff::Timestamp;

use super::{Session, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and the selected totals
    Show(SelectionArgs),

    /// Add a product to the cart
    Add(ProductArgs),

    /// Add one unit to a line
    Increment(LineArgs),

    /// Remove one unit from a line holding at least two
    Decrement(LineArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Pay for the selected lines and print the checkout link
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Leave these line ids out of the selection
    #[arg(long = "exclude", value_name = "LINE")]
    excluded: Vec<String>,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: String,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Cart line id
    id: String,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[command(flatten)]
    payer: PayerArgs,
}

/// Payer details; each defaults to the signed-in user's profile.
#[derive(Debug, Args)]
pub(super) struct PayerArgs {
    /// Payer first name
    #[arg(long)]
    first_name: Option<String>,

    /// Payer last name
    #[arg(long)]
    last_name: Option<String>,

    /// Payer email
    #[arg(long)]
    email: Option<String>,

    /// Payer phone number
    #[arg(long)]
    phone: Option<String>,
}

impl PayerArgs {
    pub(super) fn into_payer(self, user: &User) -> Payer {
        Payer {
            first_name: self.first_name.unwrap_or_else(|| user.first_name.clone()),
            last_name: self.last_name.unwrap_or_else(|| user.last_name.clone()),
            email: self.email.unwrap_or_else(|| user.email.clone()),
            phone_number: self
                .phone
                .or_else(|| user.phone_number.clone())
                .unwrap_or_default(),
        }
    }
}

pub(crate) async fn run(command: CartCommand, session: &Session) -> Result<(), String> {
    session.user()?;

    let controller = CartController::new(
        Arc::clone(&session.context.cart),
        session.context.state.clone(),
    );

    match command.command {
        CartSubcommand::Show(selection) => {
            load(&controller, &selection).await?;
            show(session, &controller.cart().await);
        }
        CartSubcommand::Add(args) => {
            let message = session
                .context
                .cart
                .add_to_cart(ProductId::new(args.id))
                .await
                .map_err(|error| error.user_message())?;

            println!("{message}");

            let count = controller
                .refresh_count()
                .await
                .map_err(|error| error.user_message())?;

            println!("cart lines: {count}");
        }
        CartSubcommand::Increment(args) => {
            load(&controller, &SelectionArgs::all()).await?;
            let update = controller
                .increment(&CartItemId::new(args.id))
                .await
                .map_err(|error| error.user_message())?;

            report(session, &controller, update).await?;
        }
        CartSubcommand::Decrement(args) => {
            load(&controller, &SelectionArgs::all()).await?;
            let update = controller
                .decrement(&CartItemId::new(args.id))
                .await
                .map_err(|error| error.user_message())?;

            report(session, &controller, update).await?;
        }
        CartSubcommand::Remove(args) => {
            let update = controller
                .remove(CartItemId::new(args.id))
                .await
                .map_err(|error| error.user_message())?;

            report(session, &controller, Some(update)).await?;
        }
        CartSubcommand::Checkout(args) => checkout(session, &controller, args).await?,
    }

    Ok(())
}

impl SelectionArgs {
    fn all() -> Self {
        Self {
            excluded: Vec::new(),
        }
    }
}

async fn load(controller: &CartController, selection: &SelectionArgs) -> Result<(), String> {
    if let LoadOutcome::Failed(notice) = controller.load().await {
        return Err(notice.to_string());
    }

    for line in &selection.excluded {
        controller.toggle(&CartItemId::new(line.as_str())).await;
    }

    Ok(())
}

async fn report(
    session: &Session,
    controller: &CartController,
    update: Option<CartUpdate>,
) -> Result<(), String> {
    let Some(update) = update else {
        println!("a line keeps at least one unit");
        show(session, &controller.cart().await);
        return Ok(());
    };

    println!("{}", update.message);

    if let Some(notice) = update.reload_failure() {
        return Err(notice.to_string());
    }

    show(session, &controller.cart().await);

    Ok(())
}

fn show(session: &Session, cart: &Cart) {
    if cart.is_empty() {
        println!("the cart is empty");
        return;
    }

    println!(
        "{}",
        render::table(
            &["", "Line", "Product", "Unit price", "Qty", "Total"],
            cart.items().iter().map(|line| {
                let product = line.product.as_ref();

                [
                    if cart.is_selected(&line.id) { "x" } else { "" }.to_string(),
                    line.id.to_string(),
                    product.map_or_else(
                        || "(removed product)".to_string(),
                        |product| product.product_name.clone(),
                    ),
                    session.prices.format(
                        product.map(|product| product.selling_price).unwrap_or_default(),
                    ),
                    line.quantity.to_string(),
                    session.prices.format(line.line_total()),
                ]
            }),
            3..6,
        )
    );

    let total = session
        .prices
        .total(cart.selected_items().map(|line| line.line_total()))
        .map_or_else(|error| error.to_string(), |money| money.to_string());

    println!(
        "selected: {} lines, {} units, {total}",
        cart.selected_count(),
        cart.selected_quantity()
    );
}

async fn checkout(
    session: &Session,
    controller: &CartController,
    args: CheckoutArgs,
) -> Result<(), String> {
    let user = session.user()?;

    load(controller, &args.selection).await?;

    let cart = controller.cart().await;

    show(session, &cart);

    let url = pay_for_cart(
        session.context.payments.as_ref(),
        &session.context.state,
        &args.payer.into_payer(&user),
        &cart,
        Timestamp::now(),
    )
    .await
    .map_err(|failure| failure.user_message())?;

    println!("continue payment at {url}");

    Ok(())
}
