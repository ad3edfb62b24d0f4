//! Notification polling
//!
//! While a customer is signed in, their notifications are fetched right away
//! and then once per interval. Each poll replaces the feed. Marking
//! notifications read patches the feed in place once the backend accepts it.

use std::{sync::Arc, time::Duration};

use fruitcart::{
    notifications::{NotificationFeed, NotificationId},
    users::{User, UserId},
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    api::ApiError,
    domain::notifications::NotificationsService,
    listing::RequestSequencer,
};

/// Interval between polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest interval a poller accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Keeps one customer's notification feed fresh.
pub struct NotificationPoller {
    service: Arc<dyn NotificationsService>,
    feed: watch::Sender<NotificationFeed>,
    sequencer: RequestSequencer,
    interval: Duration,
}

impl std::fmt::Debug for NotificationPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPoller")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl NotificationPoller {
    /// Poller with an empty feed. Intervals below [`MIN_POLL_INTERVAL`] are
    /// raised to it.
    pub fn new(service: Arc<dyn NotificationsService>, interval: Duration) -> Self {
        Self {
            service,
            feed: watch::Sender::new(NotificationFeed::default()),
            sequencer: RequestSequencer::new(),
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    /// Interval between polls.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot of the feed.
    pub fn feed(&self) -> NotificationFeed {
        self.feed.borrow().clone()
    }

    /// Follow feed changes.
    pub fn subscribe(&self) -> watch::Receiver<NotificationFeed> {
        self.feed.subscribe()
    }

    /// Fetch once and replace the feed. Failures are logged and the previous
    /// feed is kept.
    ///
    /// A response is dropped when another fetch or a mark-read landed while it
    /// was in flight.
    pub async fn refresh(&self, user: &UserId) {
        let ticket = self.sequencer.issue();
        let result = self.service.fetch(user.clone()).await;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.get(), "discarding stale notifications response");
            return;
        }

        match result {
            Ok(response) => {
                debug!(unread = response.unread_count, "notifications refreshed");
                self.feed.send_modify(|feed| feed.replace(response));
            }
            Err(error) => warn!(user = %user, "failed to fetch notifications: {error}"),
        }
    }

    /// Mark one notification read, then patch the feed without refetching.
    ///
    /// # Errors
    ///
    /// The backend's error; the feed is left unchanged.
    pub async fn mark_read(&self, notification: NotificationId) -> Result<String, ApiError> {
        let message = self.service.mark_read(notification.clone()).await?;

        self.sequencer.issue();
        self.feed.send_modify(|feed| {
            feed.mark_read(&notification);
        });

        Ok(message)
    }

    /// Mark everything read, then patch the feed without refetching.
    ///
    /// # Errors
    ///
    /// The backend's error; the feed is left unchanged.
    pub async fn mark_all_read(&self, user: UserId) -> Result<String, ApiError> {
        let message = self.service.mark_all_read(user).await?;

        self.sequencer.issue();
        self.feed.send_modify(NotificationFeed::mark_all_read);

        Ok(message)
    }

    /// Poll on behalf of whoever `session` says is signed in.
    ///
    /// Only customers are polled. Signing out clears the feed and pauses
    /// polling until the next sign-in. Dropping or stopping the handle ends it.
    pub fn spawn(self: Arc<Self>, session: watch::Receiver<Option<User>>) -> PollHandle {
        PollHandle {
            task: tokio::spawn(self.run(session)),
        }
    }

    async fn run(self: Arc<Self>, mut session: watch::Receiver<Option<User>>) {
        loop {
            let customer = session
                .borrow_and_update()
                .as_ref()
                .filter(|user| user.role.receives_notifications())
                .map(|user| user.id.clone());

            if let Some(user) = customer {
                info!(user = %user, "notification polling started");

                let mut ticker = time::interval(self.interval);

                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                let closed = loop {
                    tokio::select! {
                        _ = ticker.tick() => self.refresh(&user).await,
                        changed = session.changed() => break changed.is_err(),
                    }
                };

                info!(user = %user, "notification polling stopped");

                if closed {
                    return;
                }
            } else {
                self.feed.send_modify(NotificationFeed::clear);

                if session.changed().await.is_err() {
                    return;
                }
            }
        }
    }
}

/// Running poll loop. Dropping it stops polling.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling.
    pub fn stop(self) {
        drop(self);
    }

    /// Whether the loop has ended on its own.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use fruitcart::{notifications::NotificationsResponse, roles::Role};
    use jiff::Timestamp;
    use serde_json::json;
    use testresult::TestResult;
    use tokio::sync::oneshot;

    use crate::domain::notifications::MockNotificationsService;

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId::new("u1"),
            first_name: "Ruth".to_string(),
            last_name: "Mekonnen".to_string(),
            email: "ruth@example.com".to_string(),
            phone_number: None,
            role,
            profile_pic: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn five_with_three_unread() -> NotificationsResponse {
        serde_json::from_value(json!({
            "unreadCount": 3,
            "notifications": [
                {"_id": "n1", "message": "a", "read": false, "createdAt": "2025-05-01T09:00:00Z"},
                {"_id": "n2", "message": "b", "read": false, "createdAt": "2025-05-01T08:00:00Z"},
                {"_id": "n3", "message": "c", "read": true, "createdAt": "2025-05-01T07:00:00Z"},
                {"_id": "n4", "message": "d", "read": false, "createdAt": "2025-05-01T06:00:00Z"},
                {"_id": "n5", "message": "e", "read": true, "createdAt": "2025-05-01T05:00:00Z"}
            ]
        }))
        .unwrap_or_default()
    }

    fn counting_service(calls: &Arc<AtomicUsize>) -> MockNotificationsService {
        let calls = Arc::clone(calls);
        let mut service = MockNotificationsService::new();

        service.expect_fetch().returning(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(five_with_three_unread())
        });

        service
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = Arc::new(NotificationPoller::new(
            Arc::new(counting_service(&calls)),
            DEFAULT_POLL_INTERVAL,
        ));
        let (session, receiver) = watch::channel(Some(user(Role::General)));

        let handle = Arc::clone(&poller).spawn(receiver);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(poller.feed().unread(), 3);

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        handle.stop();
        time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        drop(session);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_clears_the_feed_and_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = Arc::new(NotificationPoller::new(
            Arc::new(counting_service(&calls)),
            DEFAULT_POLL_INTERVAL,
        ));
        let (session, receiver) = watch::channel(Some(user(Role::General)));

        let _handle = Arc::clone(&poller).spawn(receiver);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(poller.feed().notifications().len(), 5);

        session.send_replace(None);
        time::sleep(Duration::from_secs(1)).await;

        assert!(poller.feed().notifications().is_empty());
        assert_eq!(poller.feed().unread(), 0);

        time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn employees_are_not_polled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = Arc::new(NotificationPoller::new(
            Arc::new(counting_service(&calls)),
            DEFAULT_POLL_INTERVAL,
        ));
        let (_session, receiver) = watch::channel(Some(user(Role::Sales)));

        let _handle = Arc::clone(&poller).spawn(receiver);

        time::sleep(Duration::from_secs(300)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mark_all_read_patches_without_refetching() -> TestResult {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = counting_service(&calls);

        service
            .expect_mark_all_read()
            .once()
            .withf(|user| user.as_str() == "u1")
            .return_once(|_| Ok("All notifications marked as read".to_string()));

        let poller = NotificationPoller::new(Arc::new(service), DEFAULT_POLL_INTERVAL);
        let user = UserId::new("u1");

        poller.refresh(&user).await;
        poller.mark_all_read(user).await?;

        let feed = poller.feed();

        assert_eq!(feed.unread(), 0);
        assert!(feed.notifications().iter().all(|n| n.read));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_mark_read_leaves_the_feed_alone() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = counting_service(&calls);

        service
            .expect_mark_read()
            .once()
            .return_once(|_| Err(ApiError::Status(500)));

        let poller = NotificationPoller::new(Arc::new(service), DEFAULT_POLL_INTERVAL);

        poller.refresh(&UserId::new("u1")).await;

        assert!(poller.mark_read(NotificationId::new("n1")).await.is_err());
        assert_eq!(poller.feed().unread(), 3);
    }

    /// Holds its first fetch until the gate opens.
    struct GatedService {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl NotificationsService for GatedService {
        async fn fetch(&self, _user: UserId) -> Result<NotificationsResponse, ApiError> {
            let gate = self.gate.lock().ok().and_then(|mut gate| gate.take());

            if let Some(gate) = gate {
                gate.await.ok();
            }

            Ok(five_with_three_unread())
        }

        async fn mark_read(&self, _notification: NotificationId) -> Result<String, ApiError> {
            Ok("Notification marked as read".to_string())
        }

        async fn mark_all_read(&self, _user: UserId) -> Result<String, ApiError> {
            Ok("All notifications marked as read".to_string())
        }
    }

    #[tokio::test]
    async fn poll_in_flight_during_mark_all_read_is_discarded() -> TestResult {
        let (open, gate) = oneshot::channel();
        let poller = Arc::new(NotificationPoller::new(
            Arc::new(GatedService {
                gate: Mutex::new(Some(gate)),
            }),
            DEFAULT_POLL_INTERVAL,
        ));
        let user = UserId::new("u1");

        let in_flight = tokio::spawn({
            let poller = Arc::clone(&poller);
            let user = user.clone();
            async move { poller.refresh(&user).await }
        });

        tokio::task::yield_now().await;

        poller.mark_all_read(user.clone()).await?;
        open.send(()).map_err(|()| "fetch gate already dropped")?;
        in_flight.await?;

        assert_eq!(poller.feed().unread(), 0);
        assert!(poller.feed().notifications().is_empty());

        poller.refresh(&user).await;

        assert_eq!(poller.feed().unread(), 3);

        Ok(())
    }

    #[test]
    fn zero_interval_is_raised_to_the_minimum() {
        let poller = NotificationPoller::new(
            Arc::new(MockNotificationsService::new()),
            Duration::ZERO,
        );

        assert_eq!(poller.interval(), MIN_POLL_INTERVAL);
    }
}
