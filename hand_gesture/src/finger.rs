//! Fingers, their openness ratios, and the per-frame extended flags.

use std::fmt;

use crate::landmark::{
    HandLandmarkSet,
    THUMB_MCP, THUMB_TIP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP,
    RING_PIP, RING_TIP, PINKY_PIP, PINKY_TIP,
};

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Thumb  => THUMB_TIP,
            Finger::Index  => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring   => RING_TIP,
            Finger::Pinky  => PINKY_TIP,
        }
    }

    /// Landmark index of the joint the tip is measured against
    /// (MCP for the thumb, PIP for the others).
    pub fn reference_joint(self) -> usize {
        match self {
            Finger::Thumb  => THUMB_MCP,
            Finger::Index  => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring   => RING_PIP,
            Finger::Pinky  => PINKY_PIP,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb  => "thumb",
            Finger::Index  => "index",
            Finger::Middle => "middle",
            Finger::Ring   => "ring",
            Finger::Pinky  => "pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OpennessRatios
// ════════════════════════════════════════════════════════════════════════════

/// `|wrist → tip| / |wrist → reference joint|` for every finger.
///
/// A zero-length reference segment gives a non-finite ratio: `+inf` when the
/// tip is away from the wrist, which passes any `>` threshold test, and NaN
/// when the tip sits on the wrist too, which never does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpennessRatios([f32; 5]);

impl OpennessRatios {
    pub fn measure(hand: &HandLandmarkSet) -> Self {
        let wrist = hand.wrist();
        let mut ratios = [0.0; 5];
        for finger in Finger::ALL {
            let tip   = wrist.distance_2d(&hand[finger.tip()]);
            let joint = wrist.distance_2d(&hand[finger.reference_joint()]);
            ratios[finger.slot()] = tip / joint;
        }
        OpennessRatios(ratios)
    }

    pub fn get(&self, finger: Finger) -> f32 {
        self.0[finger.slot()]
    }
}

impl fmt::Display for OpennessRatios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finger) in Finger::ALL.iter().enumerate() {
            if i > 0 { f.write_str(" ")?; }
            write!(f, "{}={:.2}", finger, self.get(*finger))?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerOpenness
// ════════════════════════════════════════════════════════════════════════════

/// Which fingers are extended in the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerOpenness([bool; 5]);

impl FingerOpenness {
    pub fn from_fn(mut extended: impl FnMut(Finger) -> bool) -> Self {
        let mut flags = [false; 5];
        for finger in Finger::ALL {
            flags[finger.slot()] = extended(finger);
        }
        FingerOpenness(flags)
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger.slot()]
    }

    pub fn open_count(&self) -> usize {
        self.0.iter().filter(|&&open| open).count()
    }

    /// `(finger, extended)` pairs in anatomical order.
    pub fn iter(&self) -> impl Iterator<Item = (Finger, bool)> + '_ {
        Finger::ALL.iter().map(move |&f| (f, self.is_extended(f)))
    }
}
