//! Keyboard-driven hand simulator.
//!
//! The visualizer forwards key presses as [`SimInput`]; [`SimFrameSource`]
//! turns the current simulated pose into a landmark set every frame and runs
//! it through the real classifier, exactly as a camera frame would be.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::debug;

use hand_gesture::pose::{synthesize, HandPose};
use hand_gesture::HandLandmarkSet;

use crate::frame::{FrameEvent, FrameSource, HandTracker};

/// Sensor frame period (~30 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Horizontal distance one arrow press moves the hand.  Larger than the
/// swipe threshold so a single press between two frames reads as a swipe.
pub const MOVE_STEP: f32 = 0.12;

const X_MIN: f32 = 0.1;
const X_MAX: f32 = 0.9;

// ════════════════════════════════════════════════════════════════════════════
// Input events
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    Pose(HandPose), // 1..4
    Hide,           // H
    MoveLeft,       // ←
    MoveRight,      // →
    Fail,           // E
    Quit,           // Q
}

// ════════════════════════════════════════════════════════════════════════════
// SimHand: what is "in front of the camera"
// ════════════════════════════════════════════════════════════════════════════

/// The simulated hand.  Starts out of view, centred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub pose:    Option<HandPose>,
    pub index_x: f32,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { pose: None, index_x: 0.5 }
    }
}

impl SimHand {
    /// Apply a pose or movement key.  Control keys are ignored.
    ///
    /// The preview is mirrored, so moving the hand to the viewer's right
    /// lowers its sensor x.
    pub fn press(&mut self, key: SimKey) {
        match key {
            SimKey::Pose(p)   => self.pose = Some(p),
            SimKey::Hide      => self.pose = None,
            SimKey::MoveLeft  => self.index_x = (self.index_x + MOVE_STEP).min(X_MAX),
            SimKey::MoveRight => self.index_x = (self.index_x - MOVE_STEP).max(X_MIN),
            SimKey::Fail | SimKey::Quit => {}
        }
    }

    pub fn landmarks(&self) -> Option<HandLandmarkSet> {
        self.pose.map(|p| synthesize(p, self.index_x))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource
// ════════════════════════════════════════════════════════════════════════════

/// Frame source driven by [`SimInput`] events from the visualizer's window.
pub struct SimFrameSource {
    pub rx:       Receiver<SimInput>,
    pub tracker:  HandTracker,
    pub interval: Duration,
}

impl SimFrameSource {
    pub fn new(rx: Receiver<SimInput>, tracker: HandTracker) -> Self {
        SimFrameSource { rx, tracker, interval: FRAME_INTERVAL }
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        let SimFrameSource { rx, mut tracker, interval } = *self;
        let mut hand = SimHand::default();
        let mut next_frame = Instant::now() + interval;

        loop {
            let wait = next_frame.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(SimInput::KeyDown(SimKey::Quit)) => return,
                Ok(SimInput::KeyDown(SimKey::Fail)) => {
                    let _ = tx.send(FrameEvent::failure("simulated camera failure"));
                    return;
                }
                Ok(SimInput::KeyDown(key)) => {
                    hand.press(key);
                    debug!(?key, ?hand, "sim input");
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            next_frame += interval;
            let frame = tracker.process(hand.landmarks().as_ref());
            if tx.send(frame).is_err() { return; }
        }
    }
}
