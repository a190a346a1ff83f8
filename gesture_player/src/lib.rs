//! # gesture_player
//!
//! Hand-gesture transport control for a video, with a keyboard-driven hand
//! simulator and a software-rendered preview.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Open palm | Play (if paused) |
//! | Closed fist | Pause (if playing) |
//! | Index + middle | Toggle 1× / 2× speed |
//! | Point, then move right | Skip forward 10 s |
//! | Point, then move left | Skip back 10 s |
//!
//! Actions are rate-limited by the dispatcher cooldown (default 800 ms).
//! The camera preview is never affected by gestures.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: keyboard keys pose a synthetic hand.
//! * `leap`: **Hardware mode**: hand landmarks from a LeapMotion via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `1` `2` `3` `4` | Open palm / fist / two fingers / point |
//! | `H` | Hide hand (no hand in view) |
//! | `←` / `→` | Move the hand (swipe while pointing) |
//! | `E` | Simulate a camera failure |
//! | `Space` | Manual play / pause (counts as user interaction) |
//! | `G` | Enable / disable gestures |
//! | `-` / `=` | Cooldown −/+ 100 ms |
//! | `Q` | Quit |

pub mod frame;
pub mod sim;
#[cfg(feature = "leap")]
pub mod leap;
pub mod media;
pub mod app;
pub mod visualizer;
