//! Notifications

use jiff::Timestamp;
use serde::Deserialize;

use crate::ids::TypedId;

/// Notification Id
pub type NotificationId = TypedId<Notification>;

/// A notification addressed to one customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: NotificationId,

    /// Text shown in the bell menu.
    pub message: String,

    /// In-app route opened on click.
    #[serde(default)]
    pub link: Option<String>,

    /// Whether the customer has opened it.
    #[serde(default)]
    pub read: bool,

    /// When it was raised.
    pub created_at: Timestamp,
}

impl Notification {
    /// Route to open on click, defaulting to the home page.
    pub fn target(&self) -> &str {
        self.link.as_deref().filter(|link| !link.is_empty()).unwrap_or("/")
    }
}

/// Payload of the notifications endpoint. It sits beside `success` rather than
/// inside `data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    /// Notifications, newest first.
    #[serde(default)]
    pub notifications: Vec<Notification>,

    /// Unread notifications according to the backend.
    #[serde(default)]
    pub unread_count: usize,
}

/// Customer's notification list and unread counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
    unread: usize,
}

impl NotificationFeed {
    /// Notifications, in backend order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread counter shown on the bell.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Replace everything with a fresh poll result.
    pub fn replace(&mut self, response: NotificationsResponse) {
        self.notifications = response.notifications;
        self.unread = response.unread_count;
    }

    /// Mark one notification read after the backend accepted it.
    ///
    /// The counter drops only if the notification was unread, and never below
    /// zero. Returns whether anything changed.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|notification| &notification.id == id && !notification.read)
        else {
            return false;
        };

        notification.read = true;
        self.unread = self.unread.saturating_sub(1);

        true
    }

    /// Mark everything read after the backend accepted it.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }

        self.unread = 0;
    }

    /// Drop everything, as on sign-out.
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.unread = 0;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn response() -> Result<NotificationsResponse, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "success": true,
            "unreadCount": 3,
            "notifications": [
                {"_id": "n1", "message": "Payment approved", "link": "/order-success", "read": false, "createdAt": "2025-05-01T09:00:00Z"},
                {"_id": "n2", "message": "New arrivals", "read": false, "createdAt": "2025-05-01T08:00:00Z"},
                {"_id": "n3", "message": "Payment received", "read": true, "createdAt": "2025-04-30T08:00:00Z"},
                {"_id": "n4", "message": "Welcome", "read": false, "createdAt": "2025-04-29T08:00:00Z"},
                {"_id": "n5", "message": "Profile updated", "read": true, "createdAt": "2025-04-28T08:00:00Z"}
            ]
        }))
    }

    #[test]
    fn mark_all_read_zeroes_the_counter() -> TestResult {
        let mut feed = NotificationFeed::default();

        feed.replace(response()?);

        assert_eq!(feed.unread(), 3);

        feed.mark_all_read();

        assert_eq!(feed.unread(), 0);
        assert!(feed.notifications().iter().all(|n| n.read));

        Ok(())
    }

    #[test]
    fn mark_read_decrements_only_unread() -> TestResult {
        let mut feed = NotificationFeed::default();

        feed.replace(response()?);

        assert!(feed.mark_read(&NotificationId::new("n1")));
        assert_eq!(feed.unread(), 2);

        assert!(!feed.mark_read(&NotificationId::new("n1")));
        assert!(!feed.mark_read(&NotificationId::new("n3")));
        assert!(!feed.mark_read(&NotificationId::new("missing")));
        assert_eq!(feed.unread(), 2);

        Ok(())
    }

    #[test]
    fn counter_never_goes_below_zero() -> TestResult {
        let mut feed = NotificationFeed::default();
        let mut stale = response()?;

        stale.unread_count = 0;
        feed.replace(stale);

        assert!(feed.mark_read(&NotificationId::new("n2")));
        assert_eq!(feed.unread(), 0);

        Ok(())
    }

    #[test]
    fn missing_links_open_home() -> TestResult {
        let response = response()?;

        let targets: Vec<&str> = response.notifications.iter().map(Notification::target).collect();

        assert_eq!(targets.first(), Some(&"/order-success"));
        assert_eq!(targets.get(1), Some(&"/"));

        Ok(())
    }
}
