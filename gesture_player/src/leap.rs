//! LeapMotion frame source (feature = "leap").
//!
//! Requires the LeapC shared library installed on the system.

use std::sync::mpsc::Sender;

use tracing::{debug, info};

use hand_gesture::{HandLandmarkSet, Landmark, LANDMARK_COUNT, WRIST};

use crate::frame::{FrameEvent, FrameSource, HandTracker};

// Interaction box (mm) mapped onto the unit square.
const X_SPAN:   f32 = 400.0;
const X_ORIGIN: f32 = -200.0;
const Y_FLOOR:  f32 = 50.0;
const Y_SPAN:   f32 = 400.0;

/// Leap millimetres → raw front-camera coordinates (y down).
///
/// A camera facing the user sees the hand mirrored, so x decreases as the
/// hand moves to the user's right.
pub fn normalize(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::with_depth(
        1.0 - (x - X_ORIGIN) / X_SPAN,
        1.0 - (y - Y_FLOOR) / Y_SPAN,
        z / X_SPAN,
    )
}

/// Frame source backed by a real LeapMotion controller.
///
/// Only the first tracked hand is used.  Each digit contributes four
/// points (base of proximal, intermediate and distal bones, then the tip),
/// in the same order as the 21-point camera hand model; the wrist is the
/// distal end of the arm.
pub struct LeapFrameSource {
    tracker: HandTracker,
}

impl LeapFrameSource {
    pub fn new(tracker: HandTracker) -> Self {
        LeapFrameSource { tracker }
    }
}

impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        use leaprs::*;

        let mut tracker = self.tracker;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(FrameEvent::failure(format!("LeapC connection failed: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(FrameEvent::failure(format!("LeapMotion device unavailable: {:?}", e)));
            return;
        }
        info!("LeapC connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hand = frame.hands().into_iter().next().map(|h| {
                    let mut pts = [Landmark::default(); LANDMARK_COUNT];
                    let w = h.arm().next_joint();
                    pts[WRIST] = normalize(w.x, w.y, w.z);
                    for (d, digit) in h.digits().into_iter().enumerate() {
                        let joints = [
                            digit.proximal().prev_joint(),
                            digit.intermediate().prev_joint(),
                            digit.distal().prev_joint(),
                            digit.distal().next_joint(),
                        ];
                        for (j, v) in joints.iter().enumerate() {
                            pts[1 + d * 4 + j] = normalize(v.x, v.y, v.z);
                        }
                    }
                    HandLandmarkSet::new(pts)
                });

                let event = tracker.process(hand.as_ref());
                debug!(gesture = %event.gesture, "leap frame");
                if tx.send(event).is_err() { return; }
            }
        }
    }
}
