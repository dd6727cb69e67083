//! Rotating status messages shown while the try-on image is generated.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Shortest rotation interval; `tokio::time::interval` rejects zero.
pub const MIN_STATUS_INTERVAL: Duration = Duration::from_millis(100);

/// Background task cycling through status messages.
///
/// The first message is visible immediately. The task is aborted when the
/// ticker is dropped.
pub struct StatusTicker {
    handle: Option<JoinHandle<()>>,
    current: watch::Receiver<String>,
}

impl StatusTicker {
    /// Start cycling `messages`, one every `interval` (at least
    /// `MIN_STATUS_INTERVAL`).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(messages: Vec<String>, interval: Duration) -> Self {
        let interval = interval.max(MIN_STATUS_INTERVAL);
        let first = messages.first().cloned().unwrap_or_default();
        let (tx, current) = watch::channel(first);

        if messages.len() < 2 {
            return Self { handle: None, current };
        }

        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticks.tick().await;

            let mut index = 0;
            loop {
                ticks.tick().await;
                index = (index + 1) % messages.len();
                if tx.send(messages[index].clone()).is_err() {
                    break;
                }
                debug!(index, "Status message rotated");
            }
        });

        Self {
            handle: Some(handle),
            current,
        }
    }

    /// Message currently shown.
    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    /// Subscribe to message changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for StatusTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusTicker")
            .field("current", &*self.current.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> Vec<String> {
        vec!["un".into(), "deux".into(), "trois".into()]
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation() {
        let ticker = StatusTicker::start(messages(), Duration::from_millis(2500));
        assert_eq!(ticker.current(), "un");

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(ticker.current(), "deux");

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(ticker.current(), "trois");

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(ticker.current(), "un");
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let ticker = StatusTicker::start(messages(), Duration::from_millis(2500));
        let mut rx = ticker.subscribe();
        rx.borrow_and_update();

        drop(ticker);
        tokio::time::sleep(Duration::from_millis(10_000)).await;

        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), "un");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_keeps_rotating() {
        let ticker = StatusTicker::start(messages(), Duration::ZERO);

        tokio::time::sleep(MIN_STATUS_INTERVAL + Duration::from_millis(50)).await;
        assert_eq!(ticker.current(), "deux");
        assert!(ticker.is_running());
    }

    #[tokio::test]
    async fn test_single_message_does_not_spawn() {
        let ticker = StatusTicker::start(vec!["seul".into()], Duration::from_millis(10));
        assert_eq!(ticker.current(), "seul");
        assert!(!ticker.is_running());
    }
}
