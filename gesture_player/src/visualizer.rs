//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬─────────────────────────────┐
//! │  CAMERA PREVIEW (mirrored)   │  GESTURE    OPEN_PALM       │
//! │                              │  STATUS     Tracking        │
//! │     [hand skeleton]          │  [T][I][M][R][P]  open: 5   │
//! │                              │  gestures ON  cooldown 800  │
//! │                              │  ARMED / COOLING            │
//! │                              │  last action banner         │
//! ├──────────────────────────────┴─────────────────────────────┤
//! │  content  ▓▓▓▓▓▓▓▓░░░░░░░░░░░░  12.3 / 180.0 s   2x        │
//! │  key legend                                                │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gesture_dispatch::{MediaControllable, Phase};
use hand_gesture::{Finger, HandLandmarkSet, HAND_BONES};
use hand_gesture::pose::HandPose;

use crate::app::{AppState, SettingsAction, TrackerStatus, UiAction};
use crate::sim::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 960;
pub const WIN_H:      usize = 480;
const PREVIEW_W:      usize = 480;
const PREVIEW_H:      usize = 360;
const PANEL_X:        usize = PREVIEW_W + 24;
const MEDIA_Y:        usize = PREVIEW_H + 24;
const BAR_W:          usize = 600;
const BAR_H:          usize = 14;
const FINGER_BOX:     usize = 36;
const BG_COLOR:       u32   = 0xFF1A1A2E;
const PREVIEW_BG:     u32   = 0xFF0B0B16;
const BONE_COLOR:     u32   = 0xFF00E0A0;
const JOINT_COLOR:    u32   = 0xFFFFFFFF;
const OPEN_COLOR:     u32   = 0xFF2ECC71;
const CURLED_COLOR:   u32   = 0xFFC0392B;
const UNKNOWN_COLOR:  u32   = 0xFF444455;
const ACCENT:         u32   = 0xFFFFD700;
const TEXT_COLOR:     u32   = 0xFFEEEEEE;
const DIM_TEXT:       u32   = 0xFF888888;
const ERROR_COLOR:    u32   = 0xFFFF5555;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    sim_tx:  Sender<SimInput>,
    /// Non-gesture input collected by the last `poll_input`.
    actions: Vec<UiAction>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            "Gesture Player",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening preview window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            actions: Vec::new(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard input.  Hand keys go to the simulator; settings and
    /// playback keys are buffered for [`Visualizer::take_actions`].
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }

        let mut keys = Vec::new();
        for (key, sim) in [
            (Key::Key1,  SimKey::Pose(HandPose::OpenPalm)),
            (Key::Key2,  SimKey::Pose(HandPose::Fist)),
            (Key::Key3,  SimKey::Pose(HandPose::TwoFingers)),
            (Key::Key4,  SimKey::Pose(HandPose::Point)),
            (Key::H,     SimKey::Hide),
            (Key::Left,  SimKey::MoveLeft),
            (Key::Right, SimKey::MoveRight),
            (Key::E,     SimKey::Fail),
        ] {
            if pressed(key) { keys.push(sim); }
        }

        let mut actions = Vec::new();
        for (key, action) in [
            (Key::Space, UiAction::TogglePlayback),
            (Key::G,     UiAction::Settings(SettingsAction::ToggleEnabled)),
            (Key::Minus, UiAction::Settings(SettingsAction::CooldownDown)),
            (Key::Equal, UiAction::Settings(SettingsAction::CooldownUp)),
        ] {
            if pressed(key) { actions.push(action); }
        }

        for key in keys {
            // The hardware source never reads these; a closed channel is fine.
            let _ = self.sim_tx.send(SimInput::KeyDown(key));
        }
        self.actions.extend(actions);
        true
    }

    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.actions)
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState, now_ms: u64) {
        self.buf.fill(BG_COLOR);

        // ── Camera preview ────────────────────────────────────────────────
        self.fill_rect(0, 0, PREVIEW_W, PREVIEW_H, PREVIEW_BG);
        match app.landmarks() {
            Some(hand) => self.draw_skeleton(hand),
            None => {
                let msg = match app.status() {
                    TrackerStatus::Failed(_) => "NO CAMERA",
                    _                        => "SHOW YOUR HAND",
                };
                self.draw_text(msg, PREVIEW_W / 2 - msg.len() * 6, PREVIEW_H / 2, 3, DIM_TEXT);
            }
        }
        self.draw_border(0, 0, PREVIEW_W, PREVIEW_H, UNKNOWN_COLOR);

        // ── Side panel ───────────────────────────────────────────────────
        self.draw_label("GESTURE", PANEL_X, 16, DIM_TEXT);
        self.draw_text(app.gesture().as_str(), PANEL_X, 28, 3, ACCENT);

        let status_color = match app.status() {
            TrackerStatus::Failed(_) => ERROR_COLOR,
            TrackerStatus::Tracking  => OPEN_COLOR,
            _                        => TEXT_COLOR,
        };
        self.draw_label("STATUS", PANEL_X, 60, DIM_TEXT);
        self.draw_text(&app.status().to_string(), PANEL_X, 72, 2, status_color);

        self.draw_finger_indicators(app, PANEL_X, 100);

        let policy = app.policy();
        let policy_line = format!(
            "gestures {}  cooldown {}ms",
            if policy.enabled { "on" } else { "off" },
            policy.cooldown_ms,
        );
        self.draw_text(&policy_line, PANEL_X, 170, 2, TEXT_COLOR);

        let (phase_line, phase_color) = match app.phase(now_ms) {
            Phase::Armed                     => ("armed".to_string(), OPEN_COLOR),
            Phase::Cooling { remaining_ms }  => (format!("cooling {}ms", remaining_ms), ACCENT),
        };
        self.draw_text(&phase_line, PANEL_X, 192, 2, phase_color);

        if let Some(text) = app.banner(now_ms) {
            self.fill_rect(PANEL_X - 6, 226, WIN_W - PANEL_X, 30, 0xFF0F3460);
            self.draw_text(text, PANEL_X, 234, 3, ACCENT);
        }

        // ── Media bar ─────────────────────────────────────────────────────
        self.draw_media_bar(app);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "1=palm 2=fist 3=two 4=point h=hide </>=move e=fail  space=play/pause g=gestures -/+=cooldown q=quit",
            10, WIN_H - 12, DIM_TEXT,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Hand skeleton ─────────────────────────────────────────────────────

    /// Normalized landmark → preview pixel, mirrored like a selfie view.
    fn to_preview(x: f32, y: f32) -> (isize, isize) {
        let px = ((1.0 - x) * PREVIEW_W as f32) as isize;
        let py = (y * PREVIEW_H as f32) as isize;
        (px, py)
    }

    fn draw_skeleton(&mut self, hand: &HandLandmarkSet) {
        for &(a, b) in HAND_BONES.iter() {
            let (x0, y0) = Self::to_preview(hand[a].x, hand[a].y);
            let (x1, y1) = Self::to_preview(hand[b].x, hand[b].y);
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }
        for p in hand.points() {
            let (x, y) = Self::to_preview(p.x, p.y);
            self.fill_rect_clipped(x - 2, y - 2, 5, 5, JOINT_COLOR);
        }
    }

    // ── Finger indicators ─────────────────────────────────────────────────

    fn draw_finger_indicators(&mut self, app: &AppState, x: usize, y: usize) {
        let states = app.finger_states();
        for (i, finger) in Finger::ALL.iter().enumerate() {
            let bx = x + i * (FINGER_BOX + 6);
            let color = match states {
                Some(s) if s.is_extended(*finger) => OPEN_COLOR,
                Some(_)                           => CURLED_COLOR,
                None                              => UNKNOWN_COLOR,
            };
            self.fill_rect(bx, y, FINGER_BOX, FINGER_BOX, color);
            self.draw_border(bx, y, FINGER_BOX, FINGER_BOX, 0xFF000000);
            let initial: String = finger.name().chars().take(1).collect();
            self.draw_text(&initial, bx + FINGER_BOX / 2 - 3, y + FINGER_BOX / 2 - 5, 2, 0xFF000000);
        }
        let count = states.map(|s| s.open_count()).unwrap_or(0);
        self.draw_text(&format!("open: {}", count), x + 5 * (FINGER_BOX + 6) + 8, y + 12, 2, TEXT_COLOR);
    }

    // ── Media bar ─────────────────────────────────────────────────────────

    fn draw_media_bar(&mut self, app: &AppState) {
        let player = app.content();
        let x = 10;
        let y = MEDIA_Y;

        self.draw_text(&player.label, x, y + 2, 2, TEXT_COLOR);
        let bar_x = x + 90;
        self.fill_rect(bar_x, y, BAR_W, BAR_H, UNKNOWN_COLOR);
        let filled = (BAR_W as f64 * player.progress()) as usize;
        self.fill_rect(bar_x, y, filled, BAR_H, if player.is_paused() { DIM_TEXT } else { OPEN_COLOR });
        self.draw_border(bar_x, y, BAR_W, BAR_H, 0xFF000000);

        let info = format!(
            "{:.1} / {:.1}s  {}x  {}",
            player.position(),
            player.duration(),
            player.rate(),
            if player.is_paused() { "paused" } else { "playing" },
        );
        self.draw_text(&info, bar_x + BAR_W + 12, y + 2, 2, TEXT_COLOR);

        if player.autoplay_blocked() {
            self.draw_label("autoplay blocked - press space once", bar_x, y + BAR_H + 8, ERROR_COLOR);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// `fill_rect` for coordinates that may fall off the top/left edge.
    fn fill_rect_clipped(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w as isize).max(0) as usize;
        let y1 = (y + h as isize).max(0) as usize;
        self.fill_rect(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0), color);
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            if y < WIN_H           { self.buf[y           * WIN_W + col] = color; }
            if y+h-1 < WIN_H       { self.buf[(y+h-1)     * WIN_W + col] = color; }
        }
        for row in y..(y+h).min(WIN_H) {
            if x < WIN_W           { self.buf[row * WIN_W + x    ] = color; }
            if x+w-1 < WIN_W       { self.buf[row * WIN_W + x+w-1] = color; }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Two-pixel-wide line clipped to the preview area.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            if x < 0 || y < 0 || x as usize >= PREVIEW_W || y as usize >= PREVIEW_H { continue; }
            self.set_pixel(x as usize,     y as usize, color);
            self.set_pixel(x as usize + 1, y as usize, color);
        }
    }

    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_text(text, x, y, 1, color);
    }

    /// Minimal bitmap font: 3×5 glyphs, each pixel drawn as a
    /// `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
