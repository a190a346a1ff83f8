//! Playback commands and how each one lands on a target.

use std::fmt;

use tracing::debug;

use hand_gesture::Gesture;

use crate::media::MediaControllable;

/// Seek distance for a swipe, in seconds.
pub const SEEK_STEP_SECONDS: f64 = 10.0;
pub const NORMAL_RATE:       f64 = 1.0;
pub const FAST_RATE:         f64 = 2.0;

/// A command issued for one dispatched gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Play,
    Pause,
    /// Flip between normal and fast playback rate.
    ToggleRate,
    /// Relative seek in seconds.
    Seek(f64),
}

impl Command {
    /// `None` for gestures that carry no action.
    pub fn for_gesture(gesture: Gesture) -> Option<Command> {
        match gesture {
            Gesture::OpenPalm   => Some(Command::Play),
            Gesture::ClosedFist => Some(Command::Pause),
            Gesture::TwoFingers => Some(Command::ToggleRate),
            Gesture::SwipeRight => Some(Command::Seek(SEEK_STEP_SECONDS)),
            Gesture::SwipeLeft  => Some(Command::Seek(-SEEK_STEP_SECONDS)),
            Gesture::None | Gesture::OneFinger => None,
        }
    }

    /// Apply to one target.  Play and pause only act when they would change
    /// something; a rejected play is dropped here and never retried.
    pub fn apply<M: MediaControllable + ?Sized>(&self, target: &mut M) {
        match *self {
            Command::Play => {
                if target.is_paused() {
                    if let Err(e) = target.play() {
                        debug!("ignoring {}", e);
                    }
                }
            }
            Command::Pause => {
                if !target.is_paused() {
                    target.pause();
                }
            }
            Command::ToggleRate => {
                let next = if target.rate() == FAST_RATE { NORMAL_RATE } else { FAST_RATE };
                target.set_rate(next);
            }
            Command::Seek(delta) => target.seek(delta),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Play        => f.write_str("play"),
            Command::Pause       => f.write_str("pause"),
            Command::ToggleRate  => f.write_str("toggle rate"),
            Command::Seek(delta) => write!(f, "seek {:+}s", delta),
        }
    }
}
