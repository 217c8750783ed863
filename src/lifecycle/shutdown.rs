//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The server and any background task subscribe; one `trigger` stops them all.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown signal. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers() {
        Shutdown::new().trigger();
    }
}
