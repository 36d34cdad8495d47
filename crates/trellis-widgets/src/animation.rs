//! Named show/hide animations and the engine that plays them.
//!
//! Widgets never hard-code their transitions. They look an [`Animation`] up by
//! key in an [`AnimationRegistry`] (for example `"tooltip.show"`) and hand it to
//! an [`Animator`], which resolves once the animation has finished or was
//! stopped. [`TimedAnimator`] is the stock engine: it waits out the duration
//! on tokio time and can be interrupted per target.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use trellis_core::{Direction, ElementId};

/// One step of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub opacity: f32,
    pub scale: f32,
}

impl Keyframe {
    pub const fn new(opacity: f32, scale: f32) -> Self {
        Self { opacity, scale }
    }
}

/// Timing of an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationOptions {
    pub duration: Duration,
    pub easing: String,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            easing: "linear".to_string(),
        }
    }
}

/// A keyframe sequence with its timing.
///
/// `rtl_keyframes`, when present, replaces `keyframes` in right-to-left
/// documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    pub keyframes: Vec<Keyframe>,
    pub rtl_keyframes: Option<Vec<Keyframe>>,
    pub options: AnimationOptions,
}

impl Animation {
    pub fn new(keyframes: impl Into<Vec<Keyframe>>, duration: Duration) -> Self {
        Self {
            keyframes: keyframes.into(),
            rtl_keyframes: None,
            options: AnimationOptions {
                duration,
                ..AnimationOptions::default()
            },
        }
    }

    /// The empty animation: no keyframes, zero duration.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_rtl_keyframes(mut self, keyframes: impl Into<Vec<Keyframe>>) -> Self {
        self.rtl_keyframes = Some(keyframes.into());
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.options.easing = easing.into();
        self
    }

    /// Whether playing this animation takes no time at all.
    pub fn is_instant(&self) -> bool {
        self.keyframes.is_empty() || self.options.duration.is_zero()
    }

    fn resolve(mut self, dir: Direction) -> Self {
        if let Some(rtl) = self.rtl_keyframes.take() {
            if dir.is_rtl() {
                self.keyframes = rtl;
            }
        }
        self
    }
}

/// Key of the tooltip's opening animation.
pub const TOOLTIP_SHOW: &str = "tooltip.show";
/// Key of the tooltip's closing animation.
pub const TOOLTIP_HIDE: &str = "tooltip.hide";

/// Default animations by key, with per-element overrides on top.
#[derive(Debug, Clone, Default)]
pub struct AnimationRegistry {
    defaults: HashMap<String, Animation>,
    overrides: HashMap<String, Animation>,
    reduced_motion: bool,
}

impl AnimationRegistry {
    /// An empty registry. Every lookup yields [`Animation::none`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the stock tooltip transitions: a fade and scale
    /// from 0.8 over 150ms, and its reverse.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.set_default(
            TOOLTIP_SHOW,
            Animation::new(
                [Keyframe::new(0.0, 0.8), Keyframe::new(1.0, 1.0)],
                Duration::from_millis(150),
            )
            .with_easing("ease"),
        );
        registry.set_default(
            TOOLTIP_HIDE,
            Animation::new(
                [Keyframe::new(1.0, 1.0), Keyframe::new(0.0, 0.8)],
                Duration::from_millis(150),
            )
            .with_easing("ease"),
        );
        registry
    }

    /// Register the default animation for `key`.
    pub fn set_default(&mut self, key: impl Into<String>, animation: Animation) {
        self.defaults.insert(key.into(), animation);
    }

    /// Override `key` for this element only.
    pub fn set_animation(&mut self, key: impl Into<String>, animation: Animation) {
        self.overrides.insert(key.into(), animation);
    }

    /// When set, every lookup resolves with zero duration.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Resolve `key` for `dir`: the override if any, else the default, else
    /// the empty animation.
    pub fn get_animation(&self, key: &str, dir: Direction) -> Animation {
        let mut animation = self
            .overrides
            .get(key)
            .or_else(|| self.defaults.get(key))
            .cloned()
            .unwrap_or_default()
            .resolve(dir);
        if self.reduced_motion {
            animation.options.duration = Duration::ZERO;
        }
        animation
    }
}

/// Plays animations on element handles.
pub trait Animator: Send + Sync + 'static {
    /// Play `animation` on `target`. The future resolves when it finishes or
    /// is stopped.
    fn animate_to(&self, target: ElementId, animation: Animation) -> BoxFuture<'static, ()>;

    /// Stop every running animation on `target`, resolving their futures.
    fn stop_animations(&self, target: ElementId) -> BoxFuture<'static, ()>;
}

/// An [`Animator`] that only keeps time.
///
/// Each running animation waits out its duration on the tokio clock and can be
/// cut short by [`stop_animations`](Animator::stop_animations).
#[derive(Debug, Clone, Default)]
pub struct TimedAnimator {
    running: Arc<Mutex<HashMap<ElementId, Vec<Arc<Notify>>>>>,
}

impl TimedAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `target` has an animation in flight.
    pub fn is_animating(&self, target: ElementId) -> bool {
        self.lock()
            .get(&target)
            .is_some_and(|running| !running.is_empty())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ElementId, Vec<Arc<Notify>>>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Animator for TimedAnimator {
    fn animate_to(&self, target: ElementId, animation: Animation) -> BoxFuture<'static, ()> {
        if animation.is_instant() {
            return Box::pin(async {});
        }

        let stop = Arc::new(Notify::new());
        self.lock().entry(target).or_default().push(Arc::clone(&stop));

        let this = self.clone();
        let duration = animation.options.duration;
        Box::pin(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = stop.notified() => {
                    tracing::trace!(element = %target, "animation stopped");
                }
            }
            let mut running = this.lock();
            if let Some(list) = running.get_mut(&target) {
                list.retain(|n| !Arc::ptr_eq(n, &stop));
                if list.is_empty() {
                    running.remove(&target);
                }
            }
        })
    }

    fn stop_animations(&self, target: ElementId) -> BoxFuture<'static, ()> {
        if let Some(running) = self.lock().remove(&target) {
            // notify_one stores a permit, so animations not yet polled stop too
            for stop in running {
                stop.notify_one();
            }
        }
        Box::pin(async {})
    }
}
