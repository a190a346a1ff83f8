//! Synthetic hand poses.
//!
//! Builds plausible 21-point hands from a set of extended fingers, for the
//! keyboard simulator and for tests.  The geometry is an upright right hand
//! seen from the camera: the wrist near the bottom of the frame, fingers
//! pointing up (toward smaller `y`), thumb out to the side.

use crate::finger::Finger;
use crate::landmark::{HandLandmarkSet, Landmark, LANDMARK_COUNT, WRIST};

/// Named poses that map onto the recognised gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandPose {
    OpenPalm,
    Fist,
    TwoFingers,
    Point,
}

impl HandPose {
    /// Extended flags in anatomical order (thumb → pinky).
    pub fn extended(self) -> [bool; 5] {
        match self {
            HandPose::OpenPalm   => [true,  true,  true,  true,  true ],
            HandPose::Fist       => [false, false, false, false, false],
            HandPose::TwoFingers => [false, true,  true,  false, false],
            HandPose::Point      => [false, true,  false, false, false],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandPose::OpenPalm   => "open palm",
            HandPose::Fist       => "fist",
            HandPose::TwoFingers => "two fingers",
            HandPose::Point      => "point",
        }
    }
}

const WRIST_Y: f32 = 0.85;

/// Column offset (from the wrist) of each non-thumb finger.
const FINGER_DX: [f32; 4] = [-0.06, -0.02, 0.02, 0.06];

// Offsets from the wrist for MCP, PIP, DIP, tip.
const STRAIGHT: [f32; 4] = [-0.20, -0.26, -0.30, -0.34];
const CURLED:   [f32; 4] = [-0.20, -0.25, -0.21, -0.17];

// Thumb CMC, MCP, IP, tip.
const THUMB_OUT:    [(f32, f32); 4] = [(-0.06, -0.04), (-0.12, -0.08), (-0.17, -0.11), (-0.22, -0.14)];
const THUMB_TUCKED: [(f32, f32); 4] = [(-0.06, -0.04), (-0.12, -0.08), (-0.09, -0.11), (-0.05, -0.10)];

/// Synthesize a named pose with the index fingertip at `index_tip_x`.
pub fn synthesize(pose: HandPose, index_tip_x: f32) -> HandLandmarkSet {
    synthesize_fingers(pose.extended(), index_tip_x)
}

/// Synthesize a hand with the given fingers extended, placed so the index
/// fingertip sits at `index_tip_x`.
pub fn synthesize_fingers(extended: [bool; 5], index_tip_x: f32) -> HandLandmarkSet {
    let wrist = Landmark::new(index_tip_x - FINGER_DX[0], WRIST_Y);
    let mut pts = [wrist; LANDMARK_COUNT];
    pts[WRIST] = wrist;

    let at = |dx: f32, dy: f32| Landmark::new(wrist.x + dx, wrist.y + dy);

    // Thumb occupies indices 1..=4.
    let thumb = if extended[0] { &THUMB_OUT } else { &THUMB_TUCKED };
    for (i, &(dx, dy)) in thumb.iter().enumerate() {
        pts[1 + i] = at(dx, dy);
    }

    for (col, finger) in Finger::ALL[1..].iter().enumerate() {
        let dx     = FINGER_DX[col];
        let ys     = if extended[1 + col] { &STRAIGHT } else { &CURLED };
        let first  = finger.tip() - 3;
        for (i, &dy) in ys.iter().enumerate() {
            pts[first + i] = at(dx, dy);
        }
    }

    HandLandmarkSet::new(pts)
}
