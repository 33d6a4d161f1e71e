//! Change notification
//!
//! A typed publish/subscribe bus scoped to the application context.
//! Mutation functions broadcast a `Change` after every successful write;
//! subscribed views re-read their collection and refresh. The bus carries
//! only the topic, never the data, so late or coalesced deliveries are
//! harmless.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// What changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Projects,
    Experience,
    Qualification,
    Resume,
    Auth,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Projects => "projects",
            Topic::Experience => "experience",
            Topic::Qualification => "qualification",
            Topic::Resume => "resume",
            Topic::Auth => "auth",
        }
    }
}

/// A change event delivered to subscribers
#[derive(Debug, Clone, Copy)]
pub struct Change {
    pub topic: Topic,
}

/// Process-wide change bus
///
/// Cheap to clone; all clones share the same channel. Publishing with no
/// live subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<Change>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Broadcast a change to all subscribers
    pub fn publish(&self, topic: Topic) {
        debug!(topic = topic.as_str(), "change published");
        let _ = self.tx.send(Change { topic });
    }

    /// Subscribe to all subsequent changes
    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Events delivered to a view subscription
#[derive(Debug, Clone)]
pub enum WatchEvent<T> {
    /// A fresh snapshot after a change (or the initial one)
    Updated(T),
    /// A re-read failed; the subscription stays alive
    Error(String),
}

/// A live view subscription
///
/// Holds the background refresh task; dropping the watch cancels it, so
/// poll timers never outlive their subscriber.
pub struct Watch<T> {
    rx: mpsc::UnboundedReceiver<WatchEvent<T>>,
    task: JoinHandle<()>,
}

impl<T> Watch<T> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<WatchEvent<T>>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// Wait for the next event; `None` once the subscription has ended
    pub async fn next(&mut self) -> Option<WatchEvent<T>> {
        self.rx.recv().await
    }
}

impl<T> Drop for Watch<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.publish(Topic::Projects);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.topic, Topic::Projects);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let notifier = ChangeNotifier::new();
        notifier.publish(Topic::Resume);
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let notifier = ChangeNotifier::new();
        let clone = notifier.clone();
        let mut rx = notifier.subscribe();

        clone.publish(Topic::Auth);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.topic, Topic::Auth);
    }

    #[tokio::test]
    async fn test_each_subscriber_sees_every_change() {
        let notifier = ChangeNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.publish(Topic::Experience);
        notifier.publish(Topic::Qualification);

        assert_eq!(a.recv().await.unwrap().topic, Topic::Experience);
        assert_eq!(a.recv().await.unwrap().topic, Topic::Qualification);
        assert_eq!(b.recv().await.unwrap().topic, Topic::Experience);
        assert_eq!(b.recv().await.unwrap().topic, Topic::Qualification);
    }
}
