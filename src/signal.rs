use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Fires at most once. Observed by a single waiter.
#[derive(Default)]
pub struct Completion {
    fired: AtomicBool,
    notify: Notify,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that actually fired the signal.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // stores a permit if the waiter isn't polling yet
        self.notify.notify_one();
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    pub async fn wait(&self) {
        let notified = self.notify.notified();
        if self.is_fired() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn fires_once() {
        let c = Completion::new();
        assert!(!c.is_fired());
        assert!(c.fire());
        assert!(!c.fire());
        assert!(!c.fire());
        assert!(c.is_fired());
    }

    #[tokio::test]
    async fn wait_after_fire_returns() {
        let c = Completion::new();
        c.fire();
        timeout(Duration::from_secs(1), c.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn wait_wakes_on_fire_from_other_task() {
        let c = Arc::new(Completion::new());
        let waiter = tokio::spawn({
            let c = Arc::clone(&c);
            async move { c.wait().await }
        });
        tokio::task::yield_now().await;

        let firers = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                tokio::spawn(async move { c.fire() })
            })
            .collect::<Vec<_>>();
        let mut fired = 0;
        for f in firers {
            if f.await.unwrap() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
