//! # gesture_dispatch
//!
//! Turns a per-frame stream of [`Gesture`] labels into rate-limited playback
//! commands against any number of [`MediaControllable`] targets.
//!
//! ## Gesture → Command mapping
//!
//! | Gesture | Command | Effect on each content target |
//! |---|---|---|
//! | `OPEN_PALM`   | [`Command::Play`]       | resume if paused |
//! | `CLOSED_FIST` | [`Command::Pause`]      | pause if playing |
//! | `TWO_FINGERS` | [`Command::ToggleRate`] | 1.0× ↔ 2.0× |
//! | `SWIPE_RIGHT` | [`Command::Seek`] `+10` | skip forward 10 s |
//! | `SWIPE_LEFT`  | [`Command::Seek`] `-10` | skip back 10 s |
//!
//! `NONE` and `ONE_FINGER` never produce a command.
//!
//! ## Cooldown
//!
//! After any dispatched command the dispatcher is *cooling* for
//! `cooldown_ms`; gestures arriving in that window are dropped.  Holding a
//! pose therefore repeats its command once per window.
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_dispatch::{ActionDispatcher, GesturePolicy, Command, MediaControllable,
//!                        MediaKind, PlaybackRejected};
//! use hand_gesture::Gesture;
//!
//! #[derive(Default)]
//! struct Clip { paused: bool, rate: f64, pos: f64 }
//!
//! impl MediaControllable for Clip {
//!     fn kind(&self) -> MediaKind { MediaKind::Content }
//!     fn is_paused(&self) -> bool { self.paused }
//!     fn play(&mut self) -> Result<(), PlaybackRejected> { self.paused = false; Ok(()) }
//!     fn pause(&mut self) { self.paused = true; }
//!     fn rate(&self) -> f64 { self.rate }
//!     fn set_rate(&mut self, rate: f64) { self.rate = rate; }
//!     fn position(&self) -> f64 { self.pos }
//!     fn seek(&mut self, delta: f64) { self.pos += delta; }
//! }
//!
//! let mut clips = vec![Clip { paused: true, rate: 1.0, pos: 0.0 }];
//! let mut d = ActionDispatcher::new(GesturePolicy::default());
//!
//! assert_eq!(d.dispatch(Gesture::OpenPalm, 0, clips.iter_mut()), Some(Command::Play));
//! assert!(!clips[0].paused);
//! // Still cooling 500 ms later.
//! assert_eq!(d.dispatch(Gesture::ClosedFist, 500, clips.iter_mut()), None);
//! ```

pub mod policy;
pub mod media;
pub mod command;
pub mod dispatcher;
pub mod store;

pub use hand_gesture::Gesture;
pub use policy::{GesturePolicy, PolicyPatch, COOLDOWN_RANGE_MS, COOLDOWN_STEP_MS};
pub use media::{MediaControllable, MediaKind, PlaybackRejected};
pub use command::{Command, SEEK_STEP_SECONDS, NORMAL_RATE, FAST_RATE};
pub use dispatcher::{ActionDispatcher, DispatchState, Phase};
pub use store::{load_policy, save_policy, PolicyStore, MemoryStore, JsonFileStore, POLICY_NAMESPACE};
