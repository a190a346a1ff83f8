//! The capability set a playback target must offer.

use std::fmt;

/// What a media handle is showing.
///
/// Only [`MediaKind::Content`] is ever acted on.  The camera preview that
/// feeds the hand tracker is a video too, and must never be paused or
/// seeked by a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Content,
    CameraFeed,
}

/// A target refused to start playing (e.g. an autoplay policy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackRejected {
    pub reason: String,
}

impl PlaybackRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        PlaybackRejected { reason: reason.into() }
    }
}

impl fmt::Display for PlaybackRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playback rejected: {}", self.reason)
    }
}

impl std::error::Error for PlaybackRejected {}

/// Anything the dispatcher can drive.  Positions and seek deltas are in
/// seconds.
pub trait MediaControllable {
    fn kind(&self) -> MediaKind;

    fn is_paused(&self) -> bool;
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);

    fn rate(&self) -> f64;
    fn set_rate(&mut self, rate: f64);

    fn position(&self) -> f64;
    fn seek(&mut self, delta: f64);
}

macro_rules! forward_media {
    ($($ptr:ty),*) => {$(
        impl<T: MediaControllable + ?Sized> MediaControllable for $ptr {
            fn kind(&self) -> MediaKind                         { (**self).kind() }
            fn is_paused(&self) -> bool                         { (**self).is_paused() }
            fn play(&mut self) -> Result<(), PlaybackRejected>  { (**self).play() }
            fn pause(&mut self)                                 { (**self).pause() }
            fn rate(&self) -> f64                               { (**self).rate() }
            fn set_rate(&mut self, rate: f64)                   { (**self).set_rate(rate) }
            fn position(&self) -> f64                           { (**self).position() }
            fn seek(&mut self, delta: f64)                      { (**self).seek(delta) }
        }
    )*};
}

forward_media!(Box<T>, &mut T);
