//! Explicit cross-component signaling.
//!
//! Replaces ambient DOM-style custom events with a broadcast channel:
//! mutations publish a typed event, interested listings subscribe and
//! refetch. Publishing with no subscribers is fine; late subscribers simply
//! miss earlier events.

use tokio::sync::broadcast;

/// Application-level events crossing component boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A project was created, updated or deleted; listings should refetch.
    ProjectsChanged,
    /// A profile or user record changed.
    ProfilesChanged,
    /// The comment feed of one project changed.
    CommentsChanged { project_id: String },
    /// Request to open the project creation/edit form.
    OpenProjectEditor { project_id: Option<String> },
}

/// Broadcast bus shared by mutation sites and listings.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver an event to all current subscribers. Returns how many
    /// received it.
    pub fn publish(&self, event: AppEvent) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            // no subscribers right now
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(AppEvent::ProjectsChanged), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::ProjectsChanged);
        bus.publish(AppEvent::CommentsChanged { project_id: "p-1".into() });

        assert_eq!(rx.recv().await.unwrap(), AppEvent::ProjectsChanged);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::CommentsChanged { project_id: "p-1".into() });
    }

    #[tokio::test]
    async fn test_clone_publishes_to_same_channel() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let other = bus.clone();
        other.publish(AppEvent::OpenProjectEditor { project_id: None });
        assert_eq!(rx.recv().await.unwrap(), AppEvent::OpenProjectEditor { project_id: None });
    }
}
