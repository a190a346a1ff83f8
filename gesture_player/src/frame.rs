//! Per-frame tracker output and the sources that produce it.
//!
//! The public interface is [`FrameEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from real hardware or
//! the keyboard simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use hand_gesture::{FingerOpenness, Gesture, HandLandmarkSet, LandmarkClassifier};

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent
// ════════════════════════════════════════════════════════════════════════════

/// What the tracker saw in one camera frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEvent {
    /// A hand was in view.
    pub detected:      bool,
    pub gesture:       Gesture,
    /// `None` when no hand was detected.
    pub finger_states: Option<FingerOpenness>,
    pub open_count:    usize,
    pub landmarks:     Option<HandLandmarkSet>,
    /// Unrecoverable upstream failure (camera busy, permission denied…).
    /// Ends the tracking session; such frames carry no hand data.
    pub error:         Option<String>,
}

impl FrameEvent {
    pub fn failure(message: impl Into<String>) -> Self {
        FrameEvent {
            detected:      false,
            gesture:       Gesture::None,
            finger_states: None,
            open_count:    0,
            landmarks:     None,
            error:         Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker: landmarks in, frame events out
// ════════════════════════════════════════════════════════════════════════════

/// Runs the classifier over a landmark stream.  Lives on the source thread.
pub struct HandTracker {
    classifier: LandmarkClassifier,
}

impl HandTracker {
    pub fn new(classifier: LandmarkClassifier) -> Self {
        HandTracker { classifier }
    }

    pub fn process(&mut self, hand: Option<&HandLandmarkSet>) -> FrameEvent {
        let out = self.classifier.process(hand);
        FrameEvent {
            detected:      hand.is_some(),
            gesture:       out.gesture,
            finger_states: out.openness,
            open_count:    out.open_count(),
            landmarks:     hand.copied(),
            error:         None,
        }
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        HandTracker::new(LandmarkClassifier::new())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait: unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
///
/// A source returns when the receiver hangs up or it hits a terminal error
/// (after sending one [`FrameEvent::failure`]).
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::pose::{synthesize, HandPose};

    #[test]
    fn no_hand_frame() {
        let mut t = HandTracker::default();
        let f = t.process(None);
        assert!(!f.detected);
        assert_eq!(f.gesture, Gesture::None);
        assert_eq!(f.finger_states, None);
        assert!(!f.is_failure());
    }

    #[test]
    fn hand_frame_carries_landmarks_and_count() {
        let mut t = HandTracker::default();
        let hand = synthesize(HandPose::TwoFingers, 0.5);
        let f = t.process(Some(&hand));
        assert!(f.detected);
        assert_eq!(f.gesture, Gesture::TwoFingers);
        assert_eq!(f.open_count, 2);
        assert_eq!(f.landmarks, Some(hand));
    }

    #[test]
    fn tracker_keeps_swipe_memory_between_frames() {
        let mut t = HandTracker::default();
        t.process(Some(&synthesize(HandPose::Point, 0.5)));
        let f = t.process(Some(&synthesize(HandPose::Point, 0.38)));
        assert_eq!(f.gesture, Gesture::SwipeRight);
    }

    #[test]
    fn failure_frame() {
        let f = FrameEvent::failure("camera busy");
        assert!(f.is_failure());
        assert!(!f.detected);
        assert_eq!(f.error.as_deref(), Some("camera busy"));
    }

    struct Replay(Vec<Option<HandLandmarkSet>>);

    impl FrameSource for Replay {
        fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
            let mut tracker = HandTracker::default();
            for hand in self.0 {
                if tx.send(tracker.process(hand.as_ref())).is_err() { return; }
            }
        }
    }

    #[test]
    fn spawned_source_delivers_in_order() {
        let rx = spawn_frame_source(Replay(vec![
            Some(synthesize(HandPose::Fist, 0.5)),
            None,
            Some(synthesize(HandPose::OpenPalm, 0.5)),
        ]));
        let gestures: Vec<Gesture> = rx.iter().map(|f| f.gesture).collect();
        assert_eq!(gestures, vec![Gesture::ClosedFist, Gesture::None, Gesture::OpenPalm]);
    }
}
