use std::sync::Arc;
use tokio::sync::watch;

/// A host-owned value that components can observe.
///
/// The host (whoever lays out the screen) writes sizes or visibility into a
/// signal; a component observes it through a subscription such as
/// [`ResizeObserver`](crate::subscriptions::ResizeObserver). Cloning a signal
/// clones the handle, not the value.
#[derive(Debug)]
pub struct Signal<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// Create a signal holding `value`.
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value. Observers are only notified when it changes.
    pub fn set(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// A receiver that starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let signal = Signal::new(3u16);
        signal.set(5);
        assert_eq!(signal.get(), 5);
    }

    #[test]
    fn clones_share_the_value() {
        let a = Signal::new(false);
        let b = a.clone();
        b.set(true);
        assert!(a.get());
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let signal = Signal::new(1u8);
        let mut rx = signal.subscribe();
        rx.mark_unchanged();
        signal.set(1);
        assert!(!rx.has_changed().unwrap_or(true));
        signal.set(2);
        assert!(rx.has_changed().unwrap_or(false));
    }
}
