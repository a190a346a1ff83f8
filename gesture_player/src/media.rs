//! Clock-driven simulated video players.
//!
//! A [`MediaPlayer`] has no decoder; it only keeps the transport state a
//! real `<video>`-like element exposes (position, rate, paused) and advances
//! it from the host's frame clock.

use gesture_dispatch::{MediaControllable, MediaKind, PlaybackRejected, NORMAL_RATE};

#[derive(Clone, Debug, PartialEq)]
pub struct MediaPlayer {
    pub label:        String,
    kind:             MediaKind,
    /// Seconds; `f64::INFINITY` for a live feed.
    duration_s:       f64,
    position_s:       f64,
    rate:             f64,
    paused:           bool,
    /// Models a browser autoplay policy: `play()` is refused until the user
    /// has interacted with the player directly.
    autoplay_blocked: bool,
}

impl MediaPlayer {
    /// A paused content video at position 0.
    pub fn content(label: impl Into<String>, duration_s: f64) -> Self {
        MediaPlayer {
            label:            label.into(),
            kind:             MediaKind::Content,
            duration_s:       duration_s.max(0.0),
            position_s:       0.0,
            rate:             NORMAL_RATE,
            paused:           true,
            autoplay_blocked: false,
        }
    }

    /// The live camera preview.  Always playing, no end.
    pub fn camera_feed() -> Self {
        MediaPlayer {
            label:            "camera".to_string(),
            kind:             MediaKind::CameraFeed,
            duration_s:       f64::INFINITY,
            position_s:       0.0,
            rate:             NORMAL_RATE,
            paused:           false,
            autoplay_blocked: false,
        }
    }

    pub fn with_autoplay_blocked(mut self, blocked: bool) -> Self {
        self.autoplay_blocked = blocked;
        self
    }

    pub fn duration(&self)         -> f64  { self.duration_s }
    pub fn autoplay_blocked(&self) -> bool { self.autoplay_blocked }

    /// Fraction played, in `[0, 1]`.  Zero for a live feed.
    pub fn progress(&self) -> f64 {
        if self.duration_s.is_finite() && self.duration_s > 0.0 {
            (self.position_s / self.duration_s).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Advance the clock by `dt_s` wall-clock seconds.  Reaching the end
    /// pauses the player.
    pub fn tick(&mut self, dt_s: f64) {
        if self.paused || dt_s <= 0.0 {
            return;
        }
        self.position_s += dt_s * self.rate;
        if self.position_s >= self.duration_s {
            self.position_s = self.duration_s;
            self.paused = true;
        }
    }

    /// Direct user interaction: lifts the autoplay block and toggles
    /// play/pause.
    pub fn toggle_by_user(&mut self) {
        self.autoplay_blocked = false;
        if self.paused {
            if self.position_s >= self.duration_s {
                self.position_s = 0.0;
            }
            self.paused = false;
        } else {
            self.paused = true;
        }
    }
}

impl MediaControllable for MediaPlayer {
    fn kind(&self) -> MediaKind { self.kind }

    fn is_paused(&self) -> bool { self.paused }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.autoplay_blocked {
            return Err(PlaybackRejected::new("play() requires a user interaction first"));
        }
        if self.position_s >= self.duration_s {
            self.position_s = 0.0;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) { self.paused = true; }

    fn rate(&self) -> f64 { self.rate }

    fn set_rate(&mut self, rate: f64) { self.rate = rate; }

    fn position(&self) -> f64 { self.position_s }

    fn seek(&mut self, delta: f64) {
        self.position_s = (self.position_s + delta).clamp(0.0, self.duration_s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_dispatch::FAST_RATE;

    #[test]
    fn content_starts_paused_at_zero() {
        let p = MediaPlayer::content("clip", 120.0);
        assert!(p.is_paused());
        assert_eq!(p.position(), 0.0);
        assert_eq!(p.kind(), MediaKind::Content);
    }

    #[test]
    fn tick_respects_rate_and_pause() {
        let mut p = MediaPlayer::content("clip", 120.0);
        p.tick(1.0);
        assert_eq!(p.position(), 0.0);

        p.play().unwrap();
        p.tick(1.0);
        p.set_rate(FAST_RATE);
        p.tick(1.0);
        assert_eq!(p.position(), 3.0);
    }

    #[test]
    fn reaching_the_end_pauses() {
        let mut p = MediaPlayer::content("clip", 5.0);
        p.play().unwrap();
        p.tick(10.0);
        assert_eq!(p.position(), 5.0);
        assert!(p.is_paused());
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn play_at_end_restarts() {
        let mut p = MediaPlayer::content("clip", 5.0);
        p.seek(99.0);
        p.play().unwrap();
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut p = MediaPlayer::content("clip", 30.0);
        p.seek(-10.0);
        assert_eq!(p.position(), 0.0);
        p.seek(25.0);
        p.seek(10.0);
        assert_eq!(p.position(), 30.0);
    }

    #[test]
    fn autoplay_block_until_user_interacts() {
        let mut p = MediaPlayer::content("clip", 30.0).with_autoplay_blocked(true);
        assert!(p.play().is_err());
        assert!(p.is_paused());

        p.toggle_by_user();
        assert!(!p.is_paused());
        assert!(!p.autoplay_blocked());

        p.pause();
        assert!(p.play().is_ok());
    }

    #[test]
    fn camera_feed_is_live() {
        let mut cam = MediaPlayer::camera_feed();
        assert_eq!(cam.kind(), MediaKind::CameraFeed);
        assert!(!cam.is_paused());
        cam.tick(3600.0);
        assert!(!cam.is_paused());
        assert_eq!(cam.progress(), 0.0);
    }
}
