//! gesture_player: interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use gesture_player::app::{run, AppConfig};
use hand_gesture::ClassifierConfig;

#[derive(Parser, Debug)]
#[command(name = "gesture_player", about = "Control video playback with hand gestures")]
struct Cli {
    /// Overwrite the stored gesture policy with defaults before starting
    #[arg(long)]
    reset_policy: bool,

    /// Length of the simulated content video, in seconds
    #[arg(long, default_value_t = 180.0)]
    media_duration: f64,

    /// Refuse gesture-initiated play until Space is pressed once
    #[arg(long)]
    autoplay_blocked: bool,

    /// Log finger openness ratios every N frames
    #[arg(long)]
    ratio_log_every: Option<u64>,

    /// Policy file (default: <config dir>/gesture_player/gestureControllerSettings.json)
    #[arg(long)]
    policy_file: Option<PathBuf>,

    /// Minimum index-fingertip travel between frames that counts as a swipe
    #[arg(long)]
    swipe_threshold: Option<f32>,

    /// Read hands from a LeapMotion controller
    #[cfg(feature = "leap")]
    #[arg(long)]
    hardware: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let mut classifier = ClassifierConfig::default();
        if let Some(t) = self.swipe_threshold {
            classifier.swipe_threshold = t;
        }
        AppConfig {
            policy_path:      self.policy_file,
            reset_policy:     self.reset_policy,
            media_duration_s: self.media_duration,
            autoplay_blocked: self.autoplay_blocked,
            ratio_log_every:  self.ratio_log_every,
            classifier,
            #[cfg(feature = "leap")]
            hardware:         self.hardware,
            #[cfg(not(feature = "leap"))]
            hardware:         false,
        }
    }
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(ratio_log: bool) -> String {
    let mut filter = String::from("gesture_player=info,gesture_dispatch=info");
    if ratio_log {
        filter.push_str(",hand_gesture::ratios=debug");
    }
    filter
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = default_filter(cli.ratio_log_every.is_some());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Gesture Player : hand-gesture video control        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = cli.into_config();

    if cfg.hardware {
        println!("  Mode: LeapMotion hardware");
    } else {
        println!("  Mode: Keyboard simulation  (1-4 pose, H hide, arrows move, Q quit)");
    }
    println!();

    info!("gesture_player v{} starting", env!("CARGO_PKG_VERSION"));
    run(cfg)
}
