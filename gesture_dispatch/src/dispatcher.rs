//! The cooldown state machine between gestures and media.
//!
//! Two effective states:
//!
//! ```text
//!             dispatch succeeds
//!   ARMED ───────────────────────▶ COOLING
//!     ▲                               │
//!     └───── now − last ≥ cooldown ───┘
//! ```
//!
//! There is no notion of a "current" gesture beyond the timer: the same pose
//! held across many frames fires again every time the cooldown expires.

use tracing::{debug, info, warn};

use hand_gesture::Gesture;

use crate::command::Command;
use crate::media::{MediaControllable, MediaKind};
use crate::policy::{GesturePolicy, PolicyPatch};
use crate::store::{load_policy, save_policy, PolicyStore};

/// Bookkeeping of the last dispatched action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchState {
    /// Timestamp (ms) of the last dispatched action; `None` before the first.
    pub last_action_ms: Option<u64>,
    pub last_gesture:   Gesture,
}

/// Whether a gesture arriving now would be acted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Armed,
    Cooling { remaining_ms: u64 },
}

/// Owns the policy and the last-action state.
///
/// Meant for a single frame stream: `dispatch` and `update_policy` both take
/// `&mut self`, so a policy change can never interleave with a dispatch that
/// is reading it.
pub struct ActionDispatcher {
    policy: GesturePolicy,
    state:  DispatchState,
    store:  Option<Box<dyn PolicyStore>>,
}

impl ActionDispatcher {
    /// A dispatcher with a fixed starting policy and no persistence.
    pub fn new(policy: GesturePolicy) -> Self {
        ActionDispatcher { policy, state: DispatchState::default(), store: None }
    }

    /// Load the policy from `store` once, and persist every later update
    /// back to it.
    pub fn with_store<S: PolicyStore + 'static>(store: S) -> Self {
        let policy = load_policy(&store);
        debug!(?policy, "gesture policy loaded");
        ActionDispatcher { policy, state: DispatchState::default(), store: Some(Box::new(store)) }
    }

    pub fn policy(&self) -> GesturePolicy { self.policy }
    pub fn state(&self)  -> DispatchState { self.state }

    pub fn phase(&self, now_ms: u64) -> Phase {
        match self.state.last_action_ms {
            None => Phase::Armed,
            Some(last) => {
                let elapsed = now_ms.saturating_sub(last);
                if elapsed >= self.policy.cooldown_ms {
                    Phase::Armed
                } else {
                    Phase::Cooling { remaining_ms: self.policy.cooldown_ms - elapsed }
                }
            }
        }
    }

    /// Merge `patch` into the policy and persist the whole result.
    ///
    /// A failed save is logged; the in-memory policy still changes.
    pub fn update_policy(&mut self, patch: PolicyPatch) {
        self.policy = self.policy.merged(patch);
        debug!(policy = ?self.policy, "gesture policy updated");
        if let Some(store) = &self.store {
            if let Err(e) = save_policy(store.as_ref(), &self.policy) {
                warn!("could not persist gesture policy: {:#}", e);
            }
        }
    }

    /// Act on `gesture` at logical time `now_ms`.
    ///
    /// Returns the command that was issued, or `None` when the policy is
    /// disabled, the gesture is not actionable, or the cooldown has not
    /// expired.  Camera-feed targets are always skipped.
    pub fn dispatch<'a, M, I>(&mut self, gesture: Gesture, now_ms: u64, targets: I) -> Option<Command>
    where
        M: MediaControllable + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut M>,
    {
        if !self.policy.enabled || !gesture.is_actionable() {
            return None;
        }

        let command = Command::for_gesture(gesture)?;

        if let Phase::Cooling { remaining_ms } = self.phase(now_ms) {
            debug!(%gesture, remaining_ms, "suppressed by cooldown");
            return None;
        }

        let mut hit = 0usize;
        for target in targets {
            if target.kind() != MediaKind::Content {
                continue;
            }
            command.apply(target);
            hit += 1;
        }

        self.state = DispatchState { last_action_ms: Some(now_ms), last_gesture: gesture };
        info!(%gesture, %command, targets = hit as u64, "gesture dispatched");
        Some(command)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
