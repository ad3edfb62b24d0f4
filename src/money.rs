//! Money

use rust_decimal::Decimal;
use rusty_money::{Findable, Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while preparing price display.
#[derive(Debug, Error, PartialEq)]
pub enum PriceFormatError {
    /// The configured code is not an ISO 4217 currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Formats decimal prices in one configured currency.
#[derive(Debug, Clone, Copy)]
pub struct PriceFormatter {
    currency: &'static Currency,
}

impl PriceFormatter {
    /// Look up the currency by ISO code.
    ///
    /// # Errors
    ///
    /// - [`PriceFormatError::UnknownCurrency`]: the code is not a known currency.
    pub fn new(code: &str) -> Result<Self, PriceFormatError> {
        let Some(currency) = Currency::find(&code.trim().to_uppercase()) else {
            return Err(PriceFormatError::UnknownCurrency(code.to_string()));
        };

        Ok(Self { currency })
    }

    /// ISO code of the configured currency.
    pub fn code(&self) -> &'static str {
        self.currency.iso_alpha_code
    }

    /// Wrap an amount as money in the configured currency.
    pub fn money(&self, amount: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(amount.round_dp(self.currency.exponent), self.currency)
    }

    /// Render an amount with the currency's symbol and separators.
    pub fn format(&self, amount: Decimal) -> String {
        self.money(amount).to_string()
    }

    /// Sum amounts as money.
    ///
    /// # Errors
    ///
    /// - [`PriceFormatError::Money`]: wrapped money arithmetic error.
    pub fn total(
        &self,
        amounts: impl IntoIterator<Item = Decimal>,
    ) -> Result<Money<'static, Currency>, PriceFormatError> {
        let total = amounts
            .into_iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, amount| {
                acc.add(self.money(amount))
            })?;

        Ok(total)
    }
}
