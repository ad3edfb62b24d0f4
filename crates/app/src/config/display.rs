//! Display Config

use std::num::NonZeroUsize;

use clap::Args;

/// Price and list display settings.
#[derive(Debug, Args)]
pub struct DisplayConfig {
    /// ISO 4217 currency prices are shown in
    #[arg(long, env = "FRUITCART_CURRENCY", default_value = "ETB")]
    pub currency: String,

    /// Rows per page in list views
    #[arg(long, env = "FRUITCART_PAGE_SIZE", default_value = "10")]
    pub page_size: NonZeroUsize,
}
