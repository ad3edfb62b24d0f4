//! List controllers

use std::future::Future;

use fruitcart::{
    listing::{self, ListQuery, Listable, Page, facet_options},
    payments::{Payment, PaymentQuery, PaymentStats, PaymentsResponse},
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    api::ApiError,
    listing::RequestSequencer,
    notices::Notice,
};

/// What happened to one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the collection.
    Loaded,

    /// A newer fetch was issued meanwhile; the response was dropped.
    Stale,

    /// The fetch failed; the previous collection is kept.
    Failed(Notice),
}

#[derive(Debug)]
struct ListState<T: Listable> {
    items: Vec<T>,
    query: ListQuery<T::Facet>,
    loading: bool,
    error: Option<String>,
}

/// Collection of one view, fetched whole and filtered, sorted and paged
/// locally.
#[derive(Debug)]
pub struct ListController<T: Listable> {
    sequencer: RequestSequencer,
    state: RwLock<ListState<T>>,
}

impl<T> ListController<T>
where
    T: Listable + Clone + Send + Sync,
    T::Facet: Send + Sync,
{
    /// Empty controller showing `query` once loaded.
    pub fn new(query: ListQuery<T::Facet>) -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            state: RwLock::new(ListState {
                items: Vec::new(),
                query,
                loading: false,
                error: None,
            }),
        }
    }

    /// Run `fetch` and apply its result unless a newer load started meanwhile.
    pub async fn load<F>(&self, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<Vec<T>, ApiError>> + Send,
    {
        let ticket = self.sequencer.issue();

        self.state.write().await.loading = true;

        let result = fetch.await;
        let mut state = self.state.write().await;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.get(), "discarding stale list response");
            return LoadOutcome::Stale;
        }

        state.loading = false;

        match result {
            Ok(items) => {
                state.items = items;
                state.error = None;

                LoadOutcome::Loaded
            }
            Err(error) => {
                let notice = Notice::from(&error);

                state.error = Some(notice.text.clone());

                LoadOutcome::Failed(notice)
            }
        }
    }

    /// Replace the query.
    pub async fn set_query(&self, query: ListQuery<T::Facet>) {
        self.state.write().await.query = query;
    }

    /// Derive a new query from the current one.
    pub async fn update_query(
        &self,
        update: impl FnOnce(ListQuery<T::Facet>) -> ListQuery<T::Facet> + Send,
    ) {
        let mut state = self.state.write().await;
        let query = std::mem::take(&mut state.query);

        state.query = update(query);
    }

    /// Current query.
    pub async fn query(&self) -> ListQuery<T::Facet> {
        self.state.read().await.query.clone()
    }

    /// Window the current query selects.
    pub async fn page(&self) -> Page<T> {
        let state = self.state.read().await;

        listing::apply(&state.items, &state.query).map(T::clone)
    }

    /// Filter choices present in the collection, in first-seen order.
    pub async fn facet_options(&self) -> Vec<T::Facet> {
        facet_options(&self.state.read().await.items)
    }

    /// Every fetched item, unfiltered.
    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    /// A fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Reason the last fetch failed, if it did.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

#[derive(Debug, Default)]
struct PaymentsState {
    query: PaymentQuery,
    response: Option<PaymentsResponse>,
    error: Option<String>,
}

/// Payments view. Filtering and paging happen on the backend, so every query
/// change is a fetch.
#[derive(Debug, Default)]
pub struct PaymentsController {
    sequencer: RequestSequencer,
    state: RwLock<PaymentsState>,
}

impl PaymentsController {
    /// Empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query and fetch it with `fetch`.
    ///
    /// A response is applied only if no later `load` started meanwhile.
    pub async fn load<F, Fut>(&self, query: PaymentQuery, fetch: F) -> LoadOutcome
    where
        F: FnOnce(PaymentQuery) -> Fut + Send,
        Fut: Future<Output = Result<PaymentsResponse, ApiError>> + Send,
    {
        let ticket = self.sequencer.issue();

        self.state.write().await.query = query.clone();

        let result = fetch(query).await;
        let mut state = self.state.write().await;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.get(), "discarding stale payments response");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(response) => {
                state.response = Some(response);
                state.error = None;

                LoadOutcome::Loaded
            }
            Err(error) => {
                let notice = Notice::from(&error);

                state.error = Some(notice.text.clone());

                LoadOutcome::Failed(notice)
            }
        }
    }

    /// Query of the latest load.
    pub async fn query(&self) -> PaymentQuery {
        self.state.read().await.query.clone()
    }

    /// Current page; empty before the first successful load.
    pub async fn page(&self) -> Page<Payment> {
        let state = self.state.read().await;

        match &state.response {
            Some(response) => response.clone().into_page(&state.query),
            None => Page::from_window(Vec::new(), 1, state.query.limit(), 0),
        }
    }

    /// Counters, shown only for the unfiltered first page.
    pub async fn stats(&self) -> Option<PaymentStats> {
        let state = self.state.read().await;

        state
            .response
            .as_ref()
            .and_then(|response| response.stats_for(&state.query))
    }

    /// Reason the last fetch failed, if it did.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use fruitcart::{categories::Category, listing::SortKey, payments::PaymentStatus};
    use serde_json::json;
    use testresult::TestResult;
    use tokio::sync::oneshot;

    use super::*;

    fn categories(names: &[&str]) -> Result<Vec<Category>, ApiError> {
        let rows: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(n, name)| {
                json!({"_id": format!("c{n}"), "categoryName": name,
                       "createdAt": format!("2025-01-0{}T00:00:00Z", n + 1)})
            })
            .collect();

        Ok(serde_json::from_value(json!(rows))?)
    }

    fn names(page: &Page<Category>) -> Vec<String> {
        page.items().iter().map(|c| c.category_name.clone()).collect()
    }

    #[tokio::test]
    async fn load_then_query_changes_are_local() -> TestResult {
        let controller = ListController::new(ListQuery::new());

        assert_eq!(
            controller.load(async { categories(&["Fruits", "Greens", "Roots"]) }).await,
            LoadOutcome::Loaded
        );

        controller
            .update_query(|query| query.with_search("r").with_sort(SortKey::Oldest))
            .await;

        assert_eq!(names(&controller.page().await), vec!["Fruits", "Greens", "Roots"]);

        controller.update_query(|query| query.with_search("oo")).await;

        assert_eq!(names(&controller.page().await), vec!["Roots"]);

        Ok(())
    }

    #[tokio::test]
    async fn stale_responses_are_discarded() -> TestResult {
        let controller = ListController::<Category>::new(ListQuery::new());
        let (release, released) = oneshot::channel::<()>();

        let slow = controller.load(async move {
            _ = released.await;
            categories(&["Old"])
        });

        let fast = async {
            let outcome = controller.load(async { categories(&["New"]) }).await;
            _ = release.send(());
            outcome
        };

        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, LoadOutcome::Stale);
        assert_eq!(fast, LoadOutcome::Loaded);
        assert_eq!(names(&controller.page().await), vec!["New"]);

        Ok(())
    }

    #[tokio::test]
    async fn debug_shows_the_query() -> TestResult {
        let controller = ListController::<Category>::new(ListQuery::new().with_search("fru"));

        controller.load(async { categories(&["Fruits"]) }).await;

        let debug = format!("{controller:?}");

        assert!(debug.contains("ListController"));
        assert!(debug.contains("fru"));

        Ok(())
    }

    #[tokio::test]
    async fn failures_keep_the_previous_items() -> TestResult {
        let controller = ListController::new(ListQuery::new());

        controller.load(async { categories(&["Fruits"]) }).await;

        let outcome = controller
            .load(async { Err(ApiError::rejected(500, "Internal server error")) })
            .await;

        assert!(matches!(outcome, LoadOutcome::Failed(notice) if notice.is_error()));
        assert_eq!(controller.items().await.len(), 1);
        assert_eq!(controller.error().await.as_deref(), Some("Internal server error"));
        assert!(!controller.is_loading().await);

        Ok(())
    }

    #[tokio::test]
    async fn empty_pending_filter_is_an_empty_state() -> TestResult {
        let controller = PaymentsController::new();
        let query = PaymentQuery::new().with_status(Some(PaymentStatus::Pending));

        let outcome = controller
            .load(query, |_| async {
                Ok(serde_json::from_value(json!({"payments": [], "total": 0}))?)
            })
            .await;

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert!(controller.page().await.is_empty());
        assert_eq!(controller.stats().await, None);
        assert_eq!(controller.error().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn stats_show_on_the_unfiltered_first_page() -> TestResult {
        let controller = PaymentsController::new();

        controller
            .load(PaymentQuery::new(), |_| async {
                Ok(serde_json::from_value(json!({
                    "payments": [], "total": 12, "successfulPayments": 5,
                    "pendingPayments": 4, "failedPayments": 1, "approvedPayments": 2,
                    "totalRevenue": 700
                }))?)
            })
            .await;

        let stats = controller.stats().await.ok_or("missing stats")?;

        assert_eq!(stats.pending, 4);
        assert_eq!(stats.total, 12);

        Ok(())
    }
}
