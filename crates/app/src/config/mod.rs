//! Client configuration module

use clap::Parser;

use crate::config::{
    api::ApiConfig, display::DisplayConfig, observability::LoggingConfig, session::SessionConfig,
};

pub mod api;
pub mod display;
pub mod observability;
pub mod session;

pub use observability::LogFormat;

/// Fruitcart client configuration
#[derive(Debug, Parser)]
#[command(name = "fruitcart", about = "Fruitcart storefront client", long_about = None)]
pub struct ClientConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Price and list display settings.
    #[command(flatten)]
    pub display: DisplayConfig,

    /// Sign-in credentials.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
