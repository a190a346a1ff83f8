//! Finger openness → gesture label, with two-frame swipe refinement.
//!
//! [`classify`] is the pure form: everything it needs from the previous frame
//! is passed in as a [`TrackerMemory`] and the updated memory is handed back.
//! [`LandmarkClassifier`] wraps it for callers that would rather let the
//! classifier own its memory.

use tracing::debug;

use crate::finger::{Finger, FingerOpenness, OpennessRatios};
use crate::gesture::Gesture;
use crate::landmark::HandLandmarkSet;

// ════════════════════════════════════════════════════════════════════════════
// ClassifierConfig
// ════════════════════════════════════════════════════════════════════════════

/// Thresholds for finger openness and swipe detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    /// Thumb counts as extended above this openness ratio.
    pub thumb_ratio:       f32,
    /// Index/middle/ring/pinky count as extended above this ratio.
    pub finger_ratio:      f32,
    /// The thumb tip must sit this far above its MCP joint for the
    /// vertical fallback to fire.  Other fingers use no margin.
    pub thumb_lift_margin: f32,
    /// Minimum index-fingertip x travel between two frames for a swipe.
    pub swipe_threshold:   f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            thumb_ratio:       1.2,
            finger_ratio:      1.05,
            thumb_lift_margin: 0.05,
            swipe_threshold:   0.08,
        }
    }
}

impl ClassifierConfig {
    pub fn ratio_threshold(&self, finger: Finger) -> f32 {
        match finger {
            Finger::Thumb => self.thumb_ratio,
            _             => self.finger_ratio,
        }
    }

    pub fn lift_margin(&self, finger: Finger) -> f32 {
        match finger {
            Finger::Thumb => self.thumb_lift_margin,
            _             => 0.0,
        }
    }

    /// Ratio test OR vertical fallback (tip above the reference joint).
    /// The fallback catches a thumb held out sideways, where the ratio
    /// alone is unreliable.
    fn is_extended(&self, finger: Finger, hand: &HandLandmarkSet, ratio: f32) -> bool {
        let tip   = &hand[finger.tip()];
        let joint = &hand[finger.reference_joint()];
        ratio > self.ratio_threshold(finger)
            || tip.y < joint.y - self.lift_margin(finger)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerMemory / Classification
// ════════════════════════════════════════════════════════════════════════════

/// The classifier's only cross-frame state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerMemory {
    /// Index fingertip x of the previous frame, if the index was extended.
    pub last_index_x: Option<f32>,
}

impl TrackerMemory {
    pub const EMPTY: TrackerMemory = TrackerMemory { last_index_x: None };

    pub fn at(x: f32) -> Self {
        TrackerMemory { last_index_x: Some(x) }
    }

    pub fn is_empty(&self) -> bool {
        self.last_index_x.is_none()
    }
}

/// Result of classifying one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    /// `None` when no hand was present.
    pub openness: Option<FingerOpenness>,
    pub ratios:   Option<OpennessRatios>,
    pub gesture:  Gesture,
    /// Memory to feed into the next frame.
    pub memory:   TrackerMemory,
}

impl Classification {
    fn no_hand() -> Self {
        Classification {
            openness: None,
            ratios:   None,
            gesture:  Gesture::None,
            memory:   TrackerMemory::EMPTY,
        }
    }

    pub fn open_count(&self) -> usize {
        self.openness.map_or(0, |o| o.open_count())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify: the pure core
// ════════════════════════════════════════════════════════════════════════════

/// Classify one frame with the default thresholds.
pub fn classify(landmarks: Option<&HandLandmarkSet>, memory: TrackerMemory) -> Classification {
    classify_with(&ClassifierConfig::default(), landmarks, memory)
}

/// Classify one frame.
///
/// `landmarks == None` means the hand was lost; any pending swipe tracking is
/// dropped.
pub fn classify_with(
    config:    &ClassifierConfig,
    landmarks: Option<&HandLandmarkSet>,
    memory:    TrackerMemory,
) -> Classification {
    let Some(hand) = landmarks else {
        return Classification::no_hand();
    };

    let ratios   = OpennessRatios::measure(hand);
    let openness = FingerOpenness::from_fn(|f| config.is_extended(f, hand, ratios.get(f)));

    let mut gesture = label(&openness);

    let index_x = hand[Finger::Index.tip()].x;
    if gesture == Gesture::OneFinger {
        if let Some(prev) = memory.last_index_x {
            let dx = index_x - prev;
            // Mirrored view: sensor x decreasing reads as a swipe to the right.
            if dx.abs() > config.swipe_threshold {
                gesture = if dx < 0.0 { Gesture::SwipeRight } else { Gesture::SwipeLeft };
            }
        }
    }

    let memory = TrackerMemory {
        last_index_x: openness.is_extended(Finger::Index).then_some(index_x),
    };

    Classification {
        openness: Some(openness),
        ratios:   Some(ratios),
        gesture,
        memory,
    }
}

/// Static label from the open-finger pattern.  Order matters: the first
/// matching rule wins.
fn label(openness: &FingerOpenness) -> Gesture {
    let open   = openness.open_count();
    let index  = openness.is_extended(Finger::Index);
    let middle = openness.is_extended(Finger::Middle);

    if open >= 4 {
        Gesture::OpenPalm
    } else if open <= 1 && !index {
        Gesture::ClosedFist
    } else if open == 2 && index && middle {
        Gesture::TwoFingers
    } else if index && open == 1 {
        Gesture::OneFinger
    } else {
        Gesture::None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RatioProbe: optional observability hook
// ════════════════════════════════════════════════════════════════════════════

/// Receives the openness ratios of every frame with a hand in view.
pub trait RatioProbe: Send {
    fn observe(&mut self, ratios: &OpennessRatios);
}

/// Logs the ratios at `debug` level once every `every` frames.
#[derive(Debug)]
pub struct SampledRatioLog {
    every: u64,
    seen:  u64,
}

impl SampledRatioLog {
    pub fn every(frames: u64) -> Self {
        SampledRatioLog { every: frames.max(1), seen: 0 }
    }
}

impl RatioProbe for SampledRatioLog {
    fn observe(&mut self, ratios: &OpennessRatios) {
        if self.seen % self.every == 0 {
            debug!(target: "hand_gesture::ratios", "finger ratios: {}", ratios);
        }
        self.seen = self.seen.wrapping_add(1);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkClassifier: owns its memory
// ════════════════════════════════════════════════════════════════════════════

/// Stateful classifier for a single frame stream.
///
/// Not shared between streams; each instance carries its own swipe memory.
pub struct LandmarkClassifier {
    config: ClassifierConfig,
    memory: TrackerMemory,
    probe:  Option<Box<dyn RatioProbe>>,
}

impl Default for LandmarkClassifier {
    fn default() -> Self {
        LandmarkClassifier::new()
    }
}

impl LandmarkClassifier {
    pub fn new() -> Self {
        LandmarkClassifier::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        LandmarkClassifier { config, memory: TrackerMemory::EMPTY, probe: None }
    }

    pub fn probe<P: RatioProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn memory(&self) -> TrackerMemory { self.memory }

    /// Classify the next frame and carry the swipe memory forward.
    pub fn process(&mut self, landmarks: Option<&HandLandmarkSet>) -> Classification {
        let out = classify_with(&self.config, landmarks, self.memory);
        if let (Some(probe), Some(ratios)) = (self.probe.as_mut(), out.ratios.as_ref()) {
            probe.observe(ratios);
        }
        self.memory = out.memory;
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT, WRIST};
    use crate::pose::{synthesize, synthesize_fingers, HandPose};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// All joints and tips on one horizontal line through the wrist, so the
    /// vertical fallback can never fire and only the ratios decide.
    fn hand_from_ratios(ratios: [f32; 5]) -> HandLandmarkSet {
        let wrist = Landmark::new(0.2, 0.5);
        let mut pts = [wrist; LANDMARK_COUNT];
        for (finger, ratio) in Finger::ALL.iter().zip(ratios) {
            pts[finger.reference_joint()] = Landmark::new(wrist.x + 0.2, wrist.y);
            pts[finger.tip()] = Landmark::new(wrist.x + 0.2 * ratio, wrist.y);
        }
        pts[WRIST] = wrist;
        HandLandmarkSet::new(pts)
    }

    fn pattern(bits: u8) -> [bool; 5] {
        [0, 1, 2, 3, 4].map(|i| bits & (1 << i) != 0)
    }

    // ── no hand ───────────────────────────────────────────────────────────
    #[test]
    fn absent_hand_is_none_and_clears_memory() {
        let out = classify(None, TrackerMemory::at(0.4));
        assert_eq!(out.gesture, Gesture::None);
        assert_eq!(out.openness, None);
        assert!(out.memory.is_empty());
        assert_eq!(out.open_count(), 0);
    }

    #[test]
    fn absent_hand_is_idempotent() {
        let first  = classify(None, TrackerMemory::EMPTY);
        let second = classify(None, first.memory);
        assert_eq!(first, second);
    }

    // ── openness ──────────────────────────────────────────────────────────
    #[test]
    fn ratios_alone_give_two_fingers() {
        let hand = hand_from_ratios([0.9, 1.3, 1.3, 0.5, 0.5]);
        let out  = classify(Some(&hand), TrackerMemory::EMPTY);
        let o    = out.openness.unwrap();
        assert_eq!(o.open_count(), 2);
        assert!(o.is_extended(Finger::Index) && o.is_extended(Finger::Middle));
        assert_eq!(out.gesture, Gesture::TwoFingers);
    }

    #[test]
    fn thumb_needs_higher_ratio_than_fingers() {
        let hand = hand_from_ratios([1.1, 1.1, 0.5, 0.5, 0.5]);
        let o = classify(Some(&hand), TrackerMemory::EMPTY).openness.unwrap();
        assert!(!o.is_extended(Finger::Thumb));
        assert!(o.is_extended(Finger::Index));
    }

    #[test]
    fn raised_thumb_counts_via_vertical_fallback() {
        let mut hand = *hand_from_ratios([0.9, 0.5, 0.5, 0.5, 0.5]).points();
        // Tip level with the wrist distance-wise but clearly above the MCP.
        hand[crate::landmark::THUMB_MCP] = Landmark::new(0.3, 0.5);
        hand[crate::landmark::THUMB_TIP] = Landmark::new(0.2, 0.41);
        let out = classify(Some(&HandLandmarkSet::new(hand)), TrackerMemory::EMPTY);
        assert!(out.openness.unwrap().is_extended(Finger::Thumb));
        assert_eq!(out.gesture, Gesture::ClosedFist);
    }

    #[test]
    fn index_with_joint_on_wrist_counts_as_extended() {
        let mut hand = [Landmark::new(0.5, 0.5); crate::landmark::LANDMARK_COUNT];
        hand[crate::landmark::INDEX_TIP] = Landmark::new(0.5, 0.8);
        let out = classify(Some(&HandLandmarkSet::new(hand)), TrackerMemory::EMPTY);
        assert!(out.openness.unwrap().is_extended(Finger::Index));
        assert_eq!(out.open_count(), 1);
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    #[test]
    fn thumb_fallback_respects_margin() {
        let mut hand = *hand_from_ratios([0.9, 0.5, 0.5, 0.5, 0.5]).points();
        hand[crate::landmark::THUMB_MCP] = Landmark::new(0.3, 0.5);
        hand[crate::landmark::THUMB_TIP] = Landmark::new(0.2, 0.47);
        let out = classify(Some(&HandLandmarkSet::new(hand)), TrackerMemory::EMPTY);
        assert!(!out.openness.unwrap().is_extended(Finger::Thumb));
    }

    // ── labels ────────────────────────────────────────────────────────────
    #[test]
    fn four_or_more_open_is_always_open_palm() {
        for bits in 0u8..32 {
            let flags = pattern(bits);
            if flags.iter().filter(|&&b| b).count() < 4 { continue; }
            let out = classify(Some(&synthesize_fingers(flags, 0.5)), TrackerMemory::at(0.1));
            assert_eq!(out.gesture, Gesture::OpenPalm, "pattern {:?}", flags);
        }
    }

    #[test]
    fn label_table() {
        // thumb, index, middle, ring, pinky
        let cases = [
            ([false, false, false, false, false], Gesture::ClosedFist),
            ([true,  false, false, false, false], Gesture::ClosedFist),
            ([false, false, false, false, true ], Gesture::ClosedFist),
            ([false, true,  false, false, false], Gesture::OneFinger),
            ([false, true,  true,  false, false], Gesture::TwoFingers),
            ([true,  true,  false, false, false], Gesture::None),
            ([false, false, true,  true,  false], Gesture::None),
            ([false, true,  true,  true,  false], Gesture::None),
        ];
        for (flags, expected) in cases {
            let out = classify(Some(&synthesize_fingers(flags, 0.5)), TrackerMemory::EMPTY);
            assert_eq!(out.gesture, expected, "pattern {:?}", flags);
        }
    }

    #[test]
    fn synthetic_poses_classify_as_named() {
        let m = TrackerMemory::EMPTY;
        assert_eq!(classify(Some(&synthesize(HandPose::OpenPalm,   0.5)), m).gesture, Gesture::OpenPalm);
        assert_eq!(classify(Some(&synthesize(HandPose::Fist,       0.5)), m).gesture, Gesture::ClosedFist);
        assert_eq!(classify(Some(&synthesize(HandPose::TwoFingers, 0.5)), m).gesture, Gesture::TwoFingers);
        assert_eq!(classify(Some(&synthesize(HandPose::Point,      0.5)), m).gesture, Gesture::OneFinger);
    }

    #[test]
    fn classify_is_deterministic() {
        let hand = synthesize(HandPose::TwoFingers, 0.45);
        let mem  = TrackerMemory::at(0.3);
        assert_eq!(classify(Some(&hand), mem), classify(Some(&hand), mem));
    }

    // ── swipes ────────────────────────────────────────────────────────────
    #[test]
    fn rightward_sensor_motion_is_swipe_left() {
        let mut c = LandmarkClassifier::new();
        let a = c.process(Some(&synthesize(HandPose::Point, 0.30)));
        assert_eq!(a.gesture, Gesture::OneFinger);
        assert!((a.memory.last_index_x.unwrap() - 0.30).abs() < 1e-5);
        let b = c.process(Some(&synthesize(HandPose::Point, 0.42)));
        assert_eq!(b.gesture, Gesture::SwipeLeft);
    }

    #[test]
    fn leftward_sensor_motion_is_swipe_right() {
        let mut c = LandmarkClassifier::new();
        c.process(Some(&synthesize(HandPose::Point, 0.60)));
        let out = c.process(Some(&synthesize(HandPose::Point, 0.45)));
        assert_eq!(out.gesture, Gesture::SwipeRight);
    }

    #[test]
    fn single_pointing_frame_never_swipes() {
        let out = classify(Some(&synthesize(HandPose::Point, 0.9)), TrackerMemory::EMPTY);
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    #[test]
    fn small_motion_stays_one_finger() {
        let mut c = LandmarkClassifier::new();
        c.process(Some(&synthesize(HandPose::Point, 0.50)));
        let out = c.process(Some(&synthesize(HandPose::Point, 0.55)));
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    #[test]
    fn swipe_only_refines_one_finger() {
        // Two fingers moving fast are still two fingers.
        let out = classify(Some(&synthesize(HandPose::TwoFingers, 0.6)), TrackerMemory::at(0.2));
        assert_eq!(out.gesture, Gesture::TwoFingers);
        // ...but the memory still follows the extended index.
        assert!(out.memory.last_index_x.is_some());
    }

    #[test]
    fn memory_cleared_when_index_closes() {
        let mut c = LandmarkClassifier::new();
        c.process(Some(&synthesize(HandPose::Point, 0.30)));
        c.process(Some(&synthesize(HandPose::Fist, 0.30)));
        assert!(c.memory().is_empty());
        // A fresh pointing frame after the fist has nothing to compare to.
        let out = c.process(Some(&synthesize(HandPose::Point, 0.60)));
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    #[test]
    fn hand_loss_breaks_swipe_tracking() {
        let mut c = LandmarkClassifier::new();
        c.process(Some(&synthesize(HandPose::Point, 0.30)));
        c.process(None);
        let out = c.process(Some(&synthesize(HandPose::Point, 0.60)));
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    #[test]
    fn swipe_threshold_is_configurable() {
        let cfg = ClassifierConfig { swipe_threshold: 0.2, ..ClassifierConfig::default() };
        let out = classify_with(&cfg, Some(&synthesize(HandPose::Point, 0.42)), TrackerMemory::at(0.30));
        assert_eq!(out.gesture, Gesture::OneFinger);
    }

    // ── probe ─────────────────────────────────────────────────────────────
    struct Counting(Arc<AtomicUsize>);

    impl RatioProbe for Counting {
        fn observe(&mut self, _ratios: &OpennessRatios) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn probe_sees_only_frames_with_a_hand() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut c = LandmarkClassifier::new().probe(Counting(seen.clone()));
        c.process(Some(&synthesize(HandPose::Fist, 0.5)));
        c.process(None);
        c.process(Some(&synthesize(HandPose::OpenPalm, 0.5)));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sampled_log_clamps_rate() {
        let mut log = SampledRatioLog::every(0);
        let ratios = OpennessRatios::measure(&synthesize(HandPose::Fist, 0.5));
        log.observe(&ratios);
        log.observe(&ratios);
        assert_eq!(log.seen, 2);
        assert_eq!(log.every, 1);
    }
}
