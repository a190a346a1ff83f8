//! Top-level application state machine.
//!
//! `AppState` owns the `ActionDispatcher`, the content player and the camera
//! preview.  It consumes `FrameEvent`s from the frame source, applies the
//! user's settings changes, and feeds the visualizer each frame.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;
use std::fmt;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use gesture_dispatch::{
    save_policy, ActionDispatcher, Command, GesturePolicy, JsonFileStore, Phase, PolicyPatch,
};
use hand_gesture::{
    ClassifierConfig, FingerOpenness, Gesture, HandLandmarkSet, LandmarkClassifier,
    SampledRatioLog,
};

use crate::frame::{spawn_frame_source, FrameEvent, HandTracker};
use crate::media::MediaPlayer;
use crate::sim::{SimFrameSource, SimInput};
use crate::visualizer::Visualizer;

/// How long the "last action" banner stays up.
pub const BANNER_MS: u64 = 2000;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Policy file; `None` uses the user config directory.
    pub policy_path:      Option<PathBuf>,
    /// Overwrite the stored policy with defaults before starting.
    pub reset_policy:     bool,
    pub media_duration_s: f64,
    pub autoplay_blocked: bool,
    /// Log finger ratios every N frames with a hand (`None` = off).
    pub ratio_log_every:  Option<u64>,
    pub classifier:       ClassifierConfig,
    /// Read landmarks from a LeapMotion instead of the keyboard simulator.
    pub hardware:         bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            policy_path:      None,
            reset_policy:     false,
            media_duration_s: 180.0,
            autoplay_blocked: false,
            ratio_log_every:  None,
            classifier:       ClassifierConfig::default(),
            hardware:         false,
        }
    }
}

impl AppConfig {
    fn store(&self) -> JsonFileStore {
        match &self.policy_path {
            Some(p) => JsonFileStore::at(p),
            None    => JsonFileStore::in_config_dir(),
        }
    }

    fn tracker(&self) -> HandTracker {
        let mut classifier = LandmarkClassifier::with_config(self.classifier);
        if let Some(n) = self.ratio_log_every {
            classifier = classifier.probe(SampledRatioLog::every(n));
        }
        HandTracker::new(classifier)
    }

    /// Build the dispatcher, loading the persisted policy once.
    pub fn dispatcher(&self) -> Result<ActionDispatcher> {
        let store = self.store();
        if self.reset_policy {
            save_policy(&store, &GesturePolicy::default())
                .with_context(|| format!("resetting policy at {}", store.path().display()))?;
            info!(path = %store.path().display(), "gesture policy reset to defaults");
        }
        Ok(ActionDispatcher::with_store(store))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tracker status and user actions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerStatus {
    Initializing,
    Tracking,
    NoHand,
    /// Terminal: the camera/sensor is gone for this session.
    Failed(String),
}

impl TrackerStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, TrackerStatus::Failed(_))
    }
}

impl fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerStatus::Initializing => f.write_str("Initializing..."),
            TrackerStatus::Tracking     => f.write_str("Tracking"),
            TrackerStatus::NoHand       => f.write_str("No Hand Detected"),
            TrackerStatus::Failed(msg)  => write!(f, "Error: {}", msg),
        }
    }
}

/// Policy changes offered in the settings panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    ToggleEnabled,
    CooldownDown,
    CooldownUp,
}

/// Non-gesture input from the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    Settings(SettingsAction),
    /// Manual play/pause on the content player.
    TogglePlayback,
}

#[derive(Clone, Debug, PartialEq)]
struct Banner {
    text:     String,
    since_ms: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── control ──────────────────────────────────────────────────────────
    dispatcher:    ActionDispatcher,

    // ── media ────────────────────────────────────────────────────────────
    content:       MediaPlayer,
    camera:        MediaPlayer,

    // ── latest frame ─────────────────────────────────────────────────────
    status:        TrackerStatus,
    gesture:       Gesture,
    finger_states: Option<FingerOpenness>,
    landmarks:     Option<HandLandmarkSet>,

    banner:        Option<Banner>,
}

impl AppState {
    pub fn new(dispatcher: ActionDispatcher, content: MediaPlayer) -> Self {
        AppState {
            dispatcher,
            content,
            camera:        MediaPlayer::camera_feed(),
            status:        TrackerStatus::Initializing,
            gesture:       Gesture::None,
            finger_states: None,
            landmarks:     None,
            banner:        None,
        }
    }

    // ── process one FrameEvent ───────────────────────────────────────────

    /// Consume one tracker frame observed at `now_ms`.  Returns the command
    /// dispatched for it, if any.
    pub fn handle_frame(&mut self, frame: &FrameEvent, now_ms: u64) -> Option<Command> {
        if self.status.is_failed() {
            return None;
        }

        if let Some(msg) = &frame.error {
            error!("hand tracking stopped: {}", msg);
            self.status        = TrackerStatus::Failed(msg.clone());
            self.gesture       = Gesture::None;
            self.finger_states = None;
            self.landmarks     = None;
            return None;
        }

        self.gesture       = frame.gesture;
        self.finger_states = frame.finger_states;
        self.landmarks     = frame.landmarks;

        if !frame.detected {
            if self.status != TrackerStatus::NoHand {
                debug!("hand lost");
            }
            self.status = TrackerStatus::NoHand;
            return None;
        }
        self.status = TrackerStatus::Tracking;

        let command = self.dispatcher.dispatch(
            frame.gesture,
            now_ms,
            [&mut self.camera, &mut self.content],
        )?;
        self.banner = Some(Banner {
            text:     format!("{}: {}", frame.gesture, command),
            since_ms: now_ms,
        });
        Some(command)
    }

    // ── user input ───────────────────────────────────────────────────────

    pub fn apply_setting(&mut self, action: SettingsAction) {
        let policy = self.dispatcher.policy();
        let patch = match action {
            SettingsAction::ToggleEnabled => PolicyPatch::enabled(!policy.enabled),
            SettingsAction::CooldownDown  => PolicyPatch::cooldown_ms(policy.nudged_cooldown(-1)),
            SettingsAction::CooldownUp    => PolicyPatch::cooldown_ms(policy.nudged_cooldown(1)),
        };
        self.dispatcher.update_policy(patch);
        info!(policy = ?self.dispatcher.policy(), "settings changed");
    }

    pub fn apply_ui(&mut self, action: UiAction) {
        match action {
            UiAction::Settings(s)    => self.apply_setting(s),
            UiAction::TogglePlayback => self.content.toggle_by_user(),
        }
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, dt_s: f64, now_ms: u64) {
        self.content.tick(dt_s);
        self.camera.tick(dt_s);
        if self.banner.as_ref().is_some_and(|b| now_ms.saturating_sub(b.since_ms) >= BANNER_MS) {
            self.banner = None;
        }
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn status(&self)        -> &TrackerStatus            { &self.status }
    pub fn gesture(&self)       -> Gesture                   { self.gesture }
    pub fn finger_states(&self) -> Option<FingerOpenness>    { self.finger_states }
    pub fn landmarks(&self)     -> Option<&HandLandmarkSet>  { self.landmarks.as_ref() }
    pub fn content(&self)       -> &MediaPlayer              { &self.content }
    pub fn camera(&self)        -> &MediaPlayer              { &self.camera }
    pub fn policy(&self)        -> GesturePolicy             { self.dispatcher.policy() }
    pub fn phase(&self, now_ms: u64) -> Phase                { self.dispatcher.phase(now_ms) }

    /// The last-action text, while it is still fresh.
    pub fn banner(&self, now_ms: u64) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| now_ms.saturating_sub(b.since_ms) < BANNER_MS)
            .map(|b| b.text.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "leap")]
fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Receiver<FrameEvent> {
    if cfg.hardware {
        info!("reading hands from LeapMotion");
        spawn_frame_source(crate::leap::LeapFrameSource::new(cfg.tracker()))
    } else {
        spawn_frame_source(SimFrameSource::new(sim_rx, cfg.tracker()))
    }
}

#[cfg(not(feature = "leap"))]
fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Receiver<FrameEvent> {
    spawn_frame_source(SimFrameSource::new(sim_rx, cfg.tracker()))
}

/// Run the full application.
///
/// Creates the dispatcher from the stored policy, the frame source
/// (simulation by default, hardware with `--features leap --hardware`), and
/// the visualizer, then drives the event/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<()> {
    let dispatcher = cfg.dispatcher()?;
    info!(policy = ?dispatcher.policy(), "starting");

    let content = MediaPlayer::content("content", cfg.media_duration_s)
        .with_autoplay_blocked(cfg.autoplay_blocked);
    let mut app = AppState::new(dispatcher, content);

    // ── Frame source ──────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let frames = open_source(&cfg, sim_rx);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    let start = Instant::now();
    let mut last_tick = start;

    while vis.is_open() {
        // 1. Window input → sim keys + settings
        if !vis.poll_input() { break; }
        for action in vis.take_actions() {
            app.apply_ui(action);
        }

        // 2. Drain tracker frames
        let now_ms = start.elapsed().as_millis() as u64;
        loop {
            match frames.try_recv() {
                Ok(frame) => { app.handle_frame(&frame, now_ms); }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Keep the window up so a failure stays visible.
                    if app.status().is_failed() { break; }
                    info!("frame source closed");
                    return Ok(());
                }
            }
        }

        // 3. Media clocks
        let now = Instant::now();
        app.tick((now - last_tick).as_secs_f64(), now_ms);
        last_tick = now;

        // 4. Render
        vis.render(&app, now_ms);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
