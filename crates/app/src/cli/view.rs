use std::future::Future;

use async_trait::async_trait;
use fruitcart_app::{listing::ListView, notices::Notice};
use tracing::debug;

/// A list printed to the terminal. Success notices are printed, and a refetch
/// prints the list again. Error notices are left to the command's error, which
/// `main` reports on stderr.
pub(crate) struct ConsoleView<F> {
    reprint: F,
}

impl<F> ConsoleView<F> {
    pub(crate) fn new(reprint: F) -> Self {
        Self { reprint }
    }
}

#[async_trait]
impl<F, Fut> ListView for ConsoleView<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn refetch(&self) {
        (self.reprint)().await;
    }

    fn close_modal(&self) {
        debug!("nothing to close in the terminal");
    }

    fn notify(&self, notice: Notice) {
        if let Some(line) = printed(&notice) {
            println!("{line}");
        }
    }
}

fn printed(notice: &Notice) -> Option<String> {
    if notice.is_error() {
        debug!("error notice left to the command result: {notice}");
        return None;
    }

    Some(notice.to_string())
}
