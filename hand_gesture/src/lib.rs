//! # hand_gesture
//!
//! Classifies a single tracked hand, frame by frame, into a discrete
//! [`Gesture`].  The input is a 21-point [`HandLandmarkSet`] in the usual
//! MediaPipe order; the only state carried between frames is a
//! [`TrackerMemory`] holding the previous index-fingertip x coordinate.
//!
//! ## Pipeline
//!
//! 1. **Openness**: for every finger, the ratio
//!    `|wrist → tip| / |wrist → reference joint|` is compared against a
//!    per-finger threshold, with a vertical fallback for fingers (mostly the
//!    thumb) pointing sideways.
//! 2. **Label**: the open-finger pattern is mapped to a gesture by a fixed
//!    priority order (first match wins).
//! 3. **Swipe**: a lone pointing index finger that moved more than the swipe
//!    threshold since the previous frame becomes a swipe.  The horizontal
//!    sense is mirrored, matching a selfie-view camera.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{LandmarkClassifier, Gesture, pose::{synthesize, HandPose}};
//!
//! let mut classifier = LandmarkClassifier::new();
//!
//! let palm = synthesize(HandPose::OpenPalm, 0.5);
//! assert_eq!(classifier.process(Some(&palm)).gesture, Gesture::OpenPalm);
//!
//! // Two pointing frames, the second one 0.12 further right in sensor x.
//! classifier.process(Some(&synthesize(HandPose::Point, 0.30)));
//! let out = classifier.process(Some(&synthesize(HandPose::Point, 0.42)));
//! assert_eq!(out.gesture, Gesture::SwipeLeft);
//! ```
//!
//! The classifier never fails: a missing hand is a normal `None` frame, and
//! the 21-point shape is guaranteed by the type.

pub mod landmark;
pub mod finger;
pub mod gesture;
pub mod classify;
pub mod pose;

pub use landmark::{Landmark, HandLandmarkSet, LandmarkError, HAND_BONES, LANDMARK_COUNT, WRIST};
pub use finger::{Finger, FingerOpenness, OpennessRatios};
pub use gesture::Gesture;
pub use classify::{
    classify, classify_with,
    Classification, ClassifierConfig, LandmarkClassifier, TrackerMemory,
    RatioProbe, SampledRatioLog,
};
