//! Cancellable trailing-edge debounce.
//!
//! Each [`Debouncer::schedule`] aborts the pending timer task and starts a
//! new one, so only the last value of a burst is delivered, once the delay
//! has elapsed without another call. Delivered values arrive on the receiver
//! returned by [`Debouncer::new`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default delay between the last keystroke and the committed search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(700);

/// Trailing-edge debouncer over values of type `T`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver its values are delivered on.
    ///
    /// Must be used from within a tokio runtime.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Deliver `value` after the delay unless superseded first.
    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means nobody is listening any more
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a value is waiting for its delay to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_delivered() {
        let (mut debouncer, mut rx) = Debouncer::new(DEFAULT_DEBOUNCE);

        debouncer.schedule("i");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule("ip");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule("iphone");

        assert_eq!(rx.recv().await, Some("iphone"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_waits_for_full_delay() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(700));
        let start = Instant::now();

        debouncer.schedule(1);
        assert!(debouncer.is_pending());
        assert_eq!(rx.recv().await, Some(1));

        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule("draft");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_deliver() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule("a");
        assert_eq!(rx.recv().await, Some("a"));

        debouncer.schedule("b");
        assert_eq!(rx.recv().await, Some("b"));
    }
}
