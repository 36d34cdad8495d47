//! A single-slot debounced action.
//!
//! Scheduling replaces whatever was pending, whichever kind it was; only the
//! most recently scheduled action survives to fire.

use crate::command::Command;
use std::time::Duration;

/// Identifies one scheduling of a [`Debounce`]. Stale tokens fire nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

/// A debounced task parameterised by the pending action.
#[derive(Debug)]
pub struct Debounce<A> {
    generation: u64,
    pending: Option<A>,
}

impl<A> Debounce<A> {
    /// An idle debouncer.
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    /// Cancel any pending action and schedule `action` after `delay`.
    ///
    /// The returned command delivers `map(token)` once the delay elapses; hand
    /// the token back to [`fire`](Debounce::fire) to claim the action.
    pub fn schedule<Msg: Send + 'static>(
        &mut self,
        action: A,
        delay: Duration,
        map: impl FnOnce(Token) -> Msg + Send + 'static,
    ) -> Command<Msg> {
        self.generation += 1;
        self.pending = Some(action);
        let token = Token(self.generation);
        Command::tick(delay, move |_| map(token))
    }

    /// Claim the pending action if `token` is from the latest scheduling.
    pub fn fire(&mut self, token: Token) -> Option<A> {
        if token.0 == self.generation {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// The action waiting to fire, if any.
    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }
}

impl<A> Default for Debounce<A> {
    fn default() -> Self {
        Self::new()
    }
}
