//! The closed set of gesture labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One label per frame.
///
/// [`Gesture::OneFinger`] is a candidate swipe: a lone pointing index finger
/// that has not (yet) moved far enough.  It is reported so observers can see
/// it, but it is never actionable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    #[default]
    None,
    OpenPalm,
    ClosedFist,
    TwoFingers,
    OneFinger,
    SwipeLeft,
    SwipeRight,
}

impl Gesture {
    pub const ALL: [Gesture; 7] = [
        Gesture::None, Gesture::OpenPalm, Gesture::ClosedFist, Gesture::TwoFingers,
        Gesture::OneFinger, Gesture::SwipeLeft, Gesture::SwipeRight,
    ];

    /// Stable upper-snake name, e.g. `"OPEN_PALM"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::None        => "NONE",
            Gesture::OpenPalm    => "OPEN_PALM",
            Gesture::ClosedFist  => "CLOSED_FIST",
            Gesture::TwoFingers  => "TWO_FINGERS",
            Gesture::OneFinger   => "ONE_FINGER",
            Gesture::SwipeLeft   => "SWIPE_LEFT",
            Gesture::SwipeRight  => "SWIPE_RIGHT",
        }
    }

    /// True for labels that map to a playback command.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Gesture::None | Gesture::OneFinger)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
