use crate::element::ElementId;
use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Interval of one animation frame.
pub const FRAME: Duration = Duration::from_millis(16);

/// A repeating timer that fires at a fixed interval.
///
/// Each tick emits the current [`Instant`]. The `id` and optional owner keep
/// timers of different components apart when their subscriptions are diffed
/// together.
///
/// # Example
///
/// ```rust,ignore
/// use trellis_core::subscriptions::{Every, FRAME};
/// use trellis_core::subscribe;
///
/// let sub = subscribe(Every::new(FRAME, "frame").owned_by(self.id))
///     .map(|_| Message::Frame);
/// ```
pub struct Every {
    /// The interval between ticks.
    pub interval: Duration,
    /// A string identifier used to distinguish this timer from others.
    pub id: &'static str,
    /// The element the timer belongs to, if any.
    pub owner: Option<ElementId>,
}

impl Every {
    /// Create a new repeating timer with the given interval and identifier.
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self {
            interval,
            id,
            owner: None,
        }
    }

    /// Scope the timer to one element.
    pub fn owned_by(mut self, owner: ElementId) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        let mut hasher = std::hash::DefaultHasher::new();
        self.id.hash(&mut hasher);
        self.owner.hash(&mut hasher);
        SubscriptionId::new::<Self>(hasher.finish())
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + self.interval,
            self.interval,
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let stream = tokio_stream::wrappers::IntervalStream::new(interval)
            .map(|tick| tick.into_std());
        Box::pin(stream)
    }
}
