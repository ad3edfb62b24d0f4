//! Terminal tables

use std::ops::Range;

use fruitcart::listing::Page;
use jiff::Timestamp;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

/// Rounded table with a bold header row and `right` columns right-aligned.
pub(crate) fn table<I, R>(header: &[&str], rows: I, right: Range<usize>) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();

    builder.push_record(header.iter().map(|title| (*title).to_string()));

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);

    if !right.is_empty() {
        table.modify(Columns::new(right), Alignment::right());
    }

    table.to_string()
}

/// Two-column table of labelled figures.
pub(crate) fn figures<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> String {
    table(
        &["Figure", "Value"],
        rows.into_iter()
            .map(|(label, value)| [label.to_string(), value]),
        1..2,
    )
}

/// `page 2 of 5 (43 total)`, or a note that nothing matched.
pub(crate) fn footer<T>(page: &Page<T>) -> String {
    if page.is_empty() {
        return "nothing matched".to_string();
    }

    format!(
        "page {} of {} ({} total)",
        page.page(),
        page.total_pages(),
        page.total()
    )
}

/// Calendar date of a timestamp, in UTC.
pub(crate) fn date(at: Timestamp) -> String {
    at.strftime("%Y-%m-%d").to_string()
}
