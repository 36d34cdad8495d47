use crate::element::ElementId;
use crate::signal::Signal;
use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use ratatui::layout::Size;
use tokio_stream::wrappers::WatchStream;

/// Observes the size of a host-laid-out box.
///
/// Emits the current size as soon as it starts (like a browser resize
/// observer's initial callback) and then every change.
pub struct ResizeObserver {
    owner: ElementId,
    size: Signal<Size>,
}

impl ResizeObserver {
    /// Observe `size` on behalf of `owner`.
    pub fn new(owner: ElementId, size: &Signal<Size>) -> Self {
        Self {
            owner,
            size: size.clone(),
        }
    }
}

impl SubscriptionSource for ResizeObserver {
    type Output = Size;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.owner.as_u64())
    }

    fn stream(self) -> BoxStream<'static, Size> {
        Box::pin(WatchStream::new(self.size.subscribe()))
    }
}

/// Fires once, the first time the observed element is visible, then ends.
///
/// Owners stop returning this subscription after it fires, which detaches it.
pub struct IntersectionObserver {
    owner: ElementId,
    visible: Signal<bool>,
}

impl IntersectionObserver {
    /// Observe `visible` on behalf of `owner`.
    pub fn new(owner: ElementId, visible: &Signal<bool>) -> Self {
        Self {
            owner,
            visible: visible.clone(),
        }
    }
}

impl SubscriptionSource for IntersectionObserver {
    type Output = ();

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.owner.as_u64())
    }

    fn stream(self) -> BoxStream<'static, ()> {
        let stream = WatchStream::new(self.visible.subscribe())
            .filter(|visible| futures::future::ready(*visible))
            .take(1)
            .map(|_| ());
        Box::pin(stream)
    }
}
