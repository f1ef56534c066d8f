use crate::domain::ports::{Notification, Notifier};
use log::{info, warn};
use tokio::sync::mpsc;

/// Delivers notifications off the request path.
///
/// `notify` enqueues and returns immediately; a worker task drains the queue
/// and hands each message to the delivery function. The default delivery
/// writes the message to the log, standing in for a real mail transport.
/// Dropping the notifier closes the queue and lets the worker finish the
/// backlog before exiting.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Spawns the delivery worker on the current runtime, logging each
    /// message as it goes out.
    pub fn spawn() -> Self {
        Self::spawn_with(|notification| {
            info!(
                "email to {} [{}]: {}",
                notification.to, notification.subject, notification.body
            );
        })
    }

    /// Spawns the worker with a custom delivery function.
    pub fn spawn_with<F>(mut deliver: F) -> Self
    where
        F: FnMut(Notification) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                deliver(notification);
            }
        });
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            warn!("notification worker is gone, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_notifications_reach_the_worker() {
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier::spawn_with(move |notification| {
            seen_tx.send(notification).unwrap();
        });

        notifier.notify(Notification {
            to: "wanjiru@example.com".to_string(),
            subject: "Booking Confirmation".to_string(),
            body: "Thank you for your booking, wanjiru! Your booking ID is 1.".to_string(),
        });

        let delivered = tokio::time::timeout(Duration::from_secs(1), seen_rx.recv())
            .await
            .expect("delivery timed out")
            .expect("channel closed");
        assert_eq!(delivered.to, "wanjiru@example.com");
        assert_eq!(delivered.subject, "Booking Confirmation");
    }

    #[tokio::test]
    async fn test_notify_never_panics_without_a_worker() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let notifier = ChannelNotifier { tx };

        notifier.notify(Notification {
            to: "nobody@example.com".to_string(),
            subject: "x".to_string(),
            body: "y".to_string(),
        });
    }
}
