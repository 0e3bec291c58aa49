use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A single pending delayed action. Scheduling replaces whatever was
/// pending; nothing ever stacks.
#[derive(Debug, Default)]
pub struct DebounceSlot {
    pending: RefCell<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless rescheduled or cancelled first.
    /// Must be called from within a `LocalSet`.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        if let Some(previous) = self.pending.replace(Some(handle)) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn most_recent_schedule_wins() {
        LocalSet::new()
            .run_until(async {
                let slot = DebounceSlot::new();
                let fired = Rc::new(Cell::new(0));

                for value in [1, 2, 3] {
                    let fired = fired.clone();
                    slot.schedule(Duration::from_millis(100), async move {
                        fired.set(value);
                    });
                    sleep(Duration::from_millis(50)).await;
                }
                assert_eq!(fired.get(), 0);
                assert!(slot.is_pending());

                sleep(Duration::from_millis(60)).await;
                assert_eq!(fired.get(), 3);
                assert!(!slot.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_action() {
        LocalSet::new()
            .run_until(async {
                let slot = DebounceSlot::new();
                let fired = Rc::new(Cell::new(false));
                let flag = fired.clone();
                slot.schedule(Duration::from_millis(100), async move { flag.set(true) });
                slot.cancel();
                sleep(Duration::from_millis(200)).await;
                assert!(!fired.get());
            })
            .await;
    }
}
