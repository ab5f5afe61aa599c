//! Thread-safe wrapper for hosts that deliver messages concurrently.

use parking_lot::Mutex;
use parley_core::{OutcomeIndex, PartyId, Timeline, UtilitySpace};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::strategy::{Action, ActionKind, Message, Phase, SessionId, StrategyController};

/// A [`StrategyController`] behind a single lock.
///
/// Every call holds the lock for its whole read-modify-write sequence, so a
/// turn never observes a half-applied message.
#[derive(Debug)]
pub struct SharedController<U, O, T> {
    session_id: SessionId,
    inner: Mutex<StrategyController<U, O, T>>,
}

impl<U, O, T> SharedController<U, O, T>
where
    U: UtilitySpace,
    O: OutcomeIndex,
    T: Timeline,
{
    /// Wraps an existing controller.
    pub fn new(controller: StrategyController<U, O, T>) -> Self {
        Self {
            session_id: controller.session_id(),
            inner: Mutex::new(controller),
        }
    }

    /// Builds and wraps a controller.
    pub fn build(utility: U, index: O, timeline: T, config: EngineConfig) -> Result<Self> {
        StrategyController::new(utility, index, timeline, config).map(Self::new)
    }

    /// See [`StrategyController::on_message`].
    pub fn on_message(&self, sender: PartyId, message: Message) -> Result<()> {
        self.inner.lock().on_message(sender, message)
    }

    /// See [`StrategyController::decide`].
    pub fn decide(&self, available: &[ActionKind]) -> Result<Action> {
        self.inner.lock().decide(available)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase()
    }

    /// Session identifier.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Runs `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&StrategyController<U, O, T>) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Unwraps the controller.
    pub fn into_inner(self) -> StrategyController<U, O, T> {
        self.inner.into_inner()
    }
}
