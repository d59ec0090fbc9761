//! Notification sink for the terminal host.
//!
//! Pending instructions live in memory while a command runs and are saved
//! under their own store key so `dailynote run` and one-shot commands see the
//! same queue.

use std::sync::Arc;

use chrono::NaiveDateTime;
use dailynote_core::notify::{MemorySink, NotificationRequest, NotificationSink};
use dailynote_core::storage::{load_or_else, write_json, KeyValueStore};
use dailynote_core::StoreError;

pub const PENDING_KEY: &str = "pendingNotifications";

pub struct StoreNotifier {
    store: Arc<dyn KeyValueStore>,
    queue: MemorySink,
}

impl StoreNotifier {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let queue = MemorySink::new();
        queue.restore(load_or_else(store.as_ref(), PENDING_KEY, Vec::new));
        Self { store, queue }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), PENDING_KEY, &self.queue.pending())
    }

    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.queue.pending()
    }

    pub fn take_due(&self, now: NaiveDateTime) -> Vec<NotificationRequest> {
        self.queue.take_due(now)
    }
}

impl NotificationSink for StoreNotifier {
    fn schedule_at(&self, request: NotificationRequest) {
        tracing::debug!(id = %request.id, fire_at = %request.fire_at, "notification scheduled");
        self.queue.schedule_at(request);
    }

    fn cancel(&self, id: &str) {
        self.queue.cancel(id);
    }

    fn cancel_all(&self, prefix: &str) {
        self.queue.cancel_all(prefix);
    }
}

/// One line per delivered notification.
pub fn render(request: &NotificationRequest) -> String {
    let actions: Vec<&str> = request
        .category
        .actions()
        .iter()
        .map(|a| match a {
            dailynote_core::NotificationAction::MarkDrunk => "mark-drunk",
            dailynote_core::NotificationAction::Snooze => "snooze",
        })
        .collect();
    let mut line = format!(
        "[{}] {}: {}",
        request.fire_at.format("%H:%M"),
        request.title,
        request.body
    );
    if !actions.is_empty() {
        line.push_str(&format!("  ({} | id {})", actions.join(", "), request.id));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dailynote_core::{MemoryStore, NotificationCategory};

    fn request(id: &str, h: u32) -> NotificationRequest {
        NotificationRequest {
            id: id.into(),
            fire_at: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            title: "Water time".into(),
            body: "300 ml".into(),
            category: NotificationCategory::WaterReminder,
        }
    }

    #[test]
    fn queue_survives_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let notifier = StoreNotifier::load(store.clone());
        notifier.schedule_at(request("water-a", 9));
        notifier.schedule_at(request("water-b", 11));
        notifier.cancel("water-a");
        notifier.save().unwrap();

        let reloaded = StoreNotifier::load(store);
        let ids: Vec<_> = reloaded.pending().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["water-b"]);
    }

    #[test]
    fn render_lists_actions() {
        let line = render(&request("water-a", 9));
        assert_eq!(line, "[09:00] Water time: 300 ml  (mark-drunk, snooze | id water-a)");
    }
}
