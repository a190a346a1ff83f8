//! End-to-end sessions: landmarks → classifier → dispatcher → players.

use std::sync::mpsc;
use std::time::Duration;

use gesture_dispatch::{ActionDispatcher, Command, GesturePolicy, JsonFileStore, MediaControllable};
use gesture_player::app::{AppState, SettingsAction, TrackerStatus};
use gesture_player::frame::{spawn_frame_source, FrameEvent, HandTracker};
use gesture_player::media::MediaPlayer;
use gesture_player::sim::{SimFrameSource, SimInput, SimKey};
use hand_gesture::pose::{synthesize, HandPose};
use hand_gesture::Gesture;

const FRAME_MS: u64 = 33;

/// Feeds a scripted camera into an `AppState`, one frame per `FRAME_MS`.
struct Session {
    app:     AppState,
    tracker: HandTracker,
    now_ms:  u64,
    issued:  Vec<(u64, Command)>,
}

impl Session {
    fn new(policy: GesturePolicy) -> Self {
        Session {
            app:     AppState::new(ActionDispatcher::new(policy), MediaPlayer::content("clip", 300.0)),
            tracker: HandTracker::default(),
            now_ms:  0,
            issued:  Vec::new(),
        }
    }

    fn frame(&mut self, pose: Option<HandPose>, x: f32) -> Gesture {
        let hand  = pose.map(|p| synthesize(p, x));
        let event = self.tracker.process(hand.as_ref());
        self.push(event)
    }

    fn push(&mut self, event: FrameEvent) -> Gesture {
        let gesture = event.gesture;
        if let Some(cmd) = self.app.handle_frame(&event, self.now_ms) {
            self.issued.push((self.now_ms, cmd));
        }
        self.app.tick(FRAME_MS as f64 / 1000.0, self.now_ms);
        self.now_ms += FRAME_MS;
        gesture
    }

    fn hold(&mut self, pose: Option<HandPose>, x: f32, ms: u64) {
        for _ in 0..ms / FRAME_MS {
            self.frame(pose, x);
        }
    }
}

#[test]
fn pointing_hand_moving_right_on_screen_skips_forward() {
    let mut s = Session::new(GesturePolicy::default());
    s.hold(Some(HandPose::OpenPalm), 0.5, 1000);
    assert!(!s.app.content().is_paused());
    // The held palm re-fired near t=825; let that window run out.
    s.hold(None, 0.5, 800);
    let before = s.app.content().position();
    let fired = s.issued.len();

    assert_eq!(s.frame(Some(HandPose::Point), 0.50), Gesture::OneFinger);
    assert_eq!(s.frame(Some(HandPose::Point), 0.38), Gesture::SwipeRight);
    assert_eq!(s.issued[fired..].iter().map(|(_, c)| *c).collect::<Vec<_>>(), vec![Command::Seek(10.0)]);
    assert!(s.app.content().position() >= before + 10.0);
}

#[test]
fn pointing_hand_moving_left_on_screen_is_swipe_left() {
    let mut s = Session::new(GesturePolicy::default());
    assert_eq!(s.frame(Some(HandPose::Point), 0.30), Gesture::OneFinger);
    assert_eq!(s.frame(Some(HandPose::Point), 0.42), Gesture::SwipeLeft);
    assert_eq!(s.issued.last().map(|(_, c)| *c), Some(Command::Seek(-10.0)));
}

#[test]
fn held_palm_repeats_only_once_per_cooldown() {
    let mut s = Session::new(GesturePolicy::default());
    s.hold(Some(HandPose::OpenPalm), 0.5, 2000);
    let times: Vec<u64> = s.issued.iter().map(|(t, _)| *t).collect();
    assert_eq!(times.len(), 3, "{:?}", times);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 800, "{:?}", times);
    }
    assert!(s.issued.iter().all(|(_, c)| *c == Command::Play));
}

#[test]
fn play_pause_speed_sequence() {
    let mut s = Session::new(GesturePolicy::default());
    s.hold(Some(HandPose::OpenPalm), 0.5, 100);
    s.hold(None, 0.5, 900);
    s.hold(Some(HandPose::TwoFingers), 0.5, 100);
    assert_eq!(s.app.content().rate(), 2.0);
    s.hold(None, 0.5, 900);
    s.hold(Some(HandPose::Fist), 0.5, 100);
    assert!(s.app.content().is_paused());

    let cmds: Vec<Command> = s.issued.iter().map(|(_, c)| *c).collect();
    assert_eq!(cmds, vec![Command::Play, Command::ToggleRate, Command::Pause]);
    assert_eq!(s.app.status(), &TrackerStatus::Tracking);
}

#[test]
fn disabled_policy_ignores_every_pose() {
    let mut s = Session::new(GesturePolicy { enabled: false, cooldown_ms: 800 });
    for pose in [HandPose::OpenPalm, HandPose::TwoFingers, HandPose::Fist, HandPose::Point] {
        s.hold(Some(pose), 0.5, 500);
    }
    assert!(s.issued.is_empty());
    assert!(s.app.content().is_paused());
}

#[test]
fn camera_failure_ends_the_session() {
    let mut s = Session::new(GesturePolicy::default());
    s.hold(Some(HandPose::Fist), 0.5, 100);
    s.push(FrameEvent::failure("NotReadableError: device in use"));
    s.hold(Some(HandPose::OpenPalm), 0.5, 2000);

    assert_eq!(s.app.status().to_string(), "Error: NotReadableError: device in use");
    assert!(s.app.content().is_paused());
    assert_eq!(s.issued.len(), 1);
    assert!(!s.app.camera().is_paused());
}

#[test]
fn policy_survives_restart() {
    let dir  = std::env::temp_dir().join(format!("gesture_player_restart_{}", std::process::id()));
    let path = dir.join("policy.json");

    {
        let mut app = AppState::new(ActionDispatcher::with_store(JsonFileStore::at(&path)), MediaPlayer::content("clip", 60.0));
        app.apply_setting(SettingsAction::CooldownUp);
        app.apply_setting(SettingsAction::CooldownUp);
        app.apply_setting(SettingsAction::ToggleEnabled);
    }

    let reloaded = ActionDispatcher::with_store(JsonFileStore::at(&path));
    assert_eq!(reloaded.policy(), GesturePolicy { enabled: false, cooldown_ms: 1000 });

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn simulator_drives_the_app() {
    let (tx, rx) = mpsc::channel();
    let source = SimFrameSource { interval: Duration::from_millis(2), ..SimFrameSource::new(rx, HandTracker::default()) };
    let frames = spawn_frame_source(source);

    let mut app = AppState::new(ActionDispatcher::new(GesturePolicy::default()), MediaPlayer::content("clip", 60.0));

    tx.send(SimInput::KeyDown(SimKey::Pose(HandPose::OpenPalm))).unwrap();
    let mut now_ms = 0;
    let played = frames.iter().take(500).any(|f| {
        now_ms += FRAME_MS;
        app.handle_frame(&f, now_ms) == Some(Command::Play)
    });
    assert!(played);
    assert!(!app.content().is_paused());

    tx.send(SimInput::KeyDown(SimKey::Fail)).unwrap();
    for f in frames.iter() {
        app.handle_frame(&f, now_ms);
    }
    assert!(app.status().is_failed());
}
