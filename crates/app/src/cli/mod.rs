use std::{num::NonZeroUsize, time::Duration};

use clap::{Parser, Subcommand};
use fruitcart::{money::PriceFormatter, users::User};
use fruitcart_app::{config::ClientConfig, context::AppContext};

mod cart;
mod categories;
mod dashboard;
mod messages;
mod notifications;
mod payments;
mod products;
mod render;
mod users;
mod view;

#[derive(Debug, Parser)]
#[command(name = "fruitcart", about = "Fruitcart storefront client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Products(products::ProductsCommand),
    Categories(categories::CategoriesCommand),
    Users(users::UsersCommand),
    Payments(payments::PaymentsCommand),
    Cart(cart::CartCommand),
    Notifications(notifications::NotificationsCommand),
    Messages(messages::MessagesCommand),
    Dashboard(dashboard::DashboardCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let session = Session::start(&self.config).await?;

        match self.command {
            Commands::Products(command) => products::run(command, &session).await,
            Commands::Categories(command) => categories::run(command, &session).await,
            Commands::Users(command) => users::run(command, &session).await,
            Commands::Payments(command) => payments::run(command, &session).await,
            Commands::Cart(command) => cart::run(command, &session).await,
            Commands::Notifications(command) => notifications::run(command, &session).await,
            Commands::Messages(command) => messages::run(command, &session).await,
            Commands::Dashboard(command) => dashboard::run(command, &session).await,
        }
    }
}

/// Client context plus the display settings every command reads.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) context: AppContext,
    pub(crate) prices: PriceFormatter,
    pub(crate) page_size: NonZeroUsize,
    pub(crate) poll_interval: Duration,
}

impl Session {
    async fn start(config: &ClientConfig) -> Result<Self, String> {
        let prices = PriceFormatter::new(&config.display.currency)
            .map_err(|error| format!("invalid currency: {error}"))?;

        let context = AppContext::from_base_url(config.api.api_url.clone())
            .map_err(|error| format!("failed to set up the API client: {error}"))?;

        if let Some(credentials) = config.session.credentials() {
            context
                .sign_in(credentials)
                .await
                .map_err(|error| format!("sign-in failed: {}", error.user_message()))?;
        }

        Ok(Self {
            context,
            prices,
            page_size: config.display.page_size,
            poll_interval: config.api.poll_interval(),
        })
    }

    /// Signed-in user, or an error telling how to sign in.
    pub(crate) fn user(&self) -> Result<User, String> {
        self.context
            .state
            .user()
            .ok_or_else(|| "not signed in; set FRUITCART_EMAIL and FRUITCART_PASSWORD".to_string())
    }
}
