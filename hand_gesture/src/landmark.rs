//! Hand landmark points and the fixed 21-point hand layout.

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand model order)
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Bone connections, used for drawing the skeleton.
pub const HAND_BONES: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A normalized image-space point.
///
/// `x` and `y` are roughly in `[0, 1]` (they drift slightly outside near the
/// frame edges); `y` grows downward.  `z` is relative depth and is zero for
/// 2D providers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    pub const fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Planar (x, y) distance; depth is ignored.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// Exactly 21 landmarks of one detected hand.
///
/// The length is part of the type, so the classifier indexes it without
/// checks.  Length validation happens once, in the constructors that accept
/// provider buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarkSet {
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarkSet { points }
    }

    /// Build from a slice, which must hold exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount { got: points.len() })?;
        Ok(HandLandmarkSet { points })
    }

    /// Build from a flat buffer of `x, y, z` triples (63 floats).
    pub fn from_flat(data: &[f32]) -> Result<Self, LandmarkError> {
        if data.len() != LANDMARK_COUNT * 3 {
            return Err(LandmarkError::WrongFlatLength { got: data.len() });
        }
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (p, xyz) in points.iter_mut().zip(data.chunks_exact(3)) {
            *p = Landmark::with_depth(xyz[0], xyz[1], xyz[2]);
        }
        Ok(HandLandmarkSet { points })
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[WRIST]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl std::ops::Index<usize> for HandLandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

/// A provider buffer that cannot form a hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    WrongCount { got: usize },
    WrongFlatLength { got: usize },
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::WrongCount { got } =>
                write!(f, "expected {} hand landmarks, got {}", LANDMARK_COUNT, got),
            LandmarkError::WrongFlatLength { got } =>
                write!(f, "expected {} floats (x,y,z per landmark), got {}", LANDMARK_COUNT * 3, got),
        }
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_short_input() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(
            HandLandmarkSet::from_slice(&pts),
            Err(LandmarkError::WrongCount { got: 20 })
        );
    }

    #[test]
    fn from_slice_accepts_21() {
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[INDEX_TIP] = Landmark::new(0.4, 0.2);
        let hand = HandLandmarkSet::from_slice(&pts).unwrap();
        assert_eq!(hand[INDEX_TIP].x, 0.4);
    }

    #[test]
    fn from_flat_reads_triples() {
        let data: Vec<f32> = (0..63).map(|i| i as f32).collect();
        let hand = HandLandmarkSet::from_flat(&data).unwrap();
        assert_eq!(hand[1], Landmark::with_depth(3.0, 4.0, 5.0));
        assert_eq!(hand[PINKY_TIP].z, 62.0);
    }

    #[test]
    fn from_flat_rejects_bad_length() {
        let err = HandLandmarkSet::from_flat(&[0.0; 62]).unwrap_err();
        assert_eq!(err, LandmarkError::WrongFlatLength { got: 62 });
        assert!(err.to_string().contains("63"));
    }

    #[test]
    fn distance_ignores_depth() {
        let a = Landmark::with_depth(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
    }
}
