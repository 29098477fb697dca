//! Application-level signals: navigation requests and user notices.
//!
//! DESIGN
//! ======
//! Request plumbing never navigates on its own. It publishes
//! [`AppEvent::Navigate`] and the top-level application decides what a
//! redirect means for it. Notices replace toast popups the same way.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use tokio::sync::broadcast;

use crate::routes::Route;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// Immediate redirect request; not queued behind other work.
    Navigate(Route),
    Notify(Notice),
}

/// Cloneable broadcast handle shared by the client and the session.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Publish `event`. Having no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        tracing::debug!(?event, "app event");
        let _ = self.tx.send(event);
    }

    pub fn navigate(&self, route: Route) {
        self.publish(AppEvent::Navigate(route));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(AppEvent::Notify(Notice { level: NoticeLevel::Success, message: message.into() }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(AppEvent::Notify(Notice { level: NoticeLevel::Error, message: message.into() }));
    }
}
