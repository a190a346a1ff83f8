//! User-tunable dispatch policy and partial updates to it.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Cooldown adjustment step offered to the user.
pub const COOLDOWN_STEP_MS: u64 = 100;

/// Range the interactive cooldown control stays within.
pub const COOLDOWN_RANGE_MS: RangeInclusive<u64> = 200..=2000;

/// Whether gestures act at all, and how far apart two actions must be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GesturePolicy {
    pub enabled:     bool,
    pub cooldown_ms: u64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        GesturePolicy { enabled: true, cooldown_ms: 800 }
    }
}

impl GesturePolicy {
    /// Overwrite only the fields present in `patch`.
    pub fn merged(self, patch: PolicyPatch) -> Self {
        GesturePolicy {
            enabled:     patch.enabled.unwrap_or(self.enabled),
            cooldown_ms: patch.cooldown_ms.unwrap_or(self.cooldown_ms),
        }
    }

    /// Cooldown moved by `steps` × [`COOLDOWN_STEP_MS`], clamped to
    /// [`COOLDOWN_RANGE_MS`].
    pub fn nudged_cooldown(&self, steps: i64) -> u64 {
        let lo = *COOLDOWN_RANGE_MS.start() as i64;
        let hi = *COOLDOWN_RANGE_MS.end() as i64;
        (self.cooldown_ms as i64 + steps * COOLDOWN_STEP_MS as i64).clamp(lo, hi) as u64
    }
}

/// A partial policy; `None` fields are left unchanged on merge.
///
/// Also the shape stored policies are read back as, so a document missing a
/// key keeps that key's default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled:     Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u64>,
}

impl PolicyPatch {
    pub fn enabled(enabled: bool) -> Self {
        PolicyPatch { enabled: Some(enabled), ..PolicyPatch::default() }
    }

    pub fn cooldown_ms(ms: u64) -> Self {
        PolicyPatch { cooldown_ms: Some(ms), ..PolicyPatch::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = GesturePolicy::default();
        assert!(p.enabled);
        assert_eq!(p.cooldown_ms, 800);
    }

    #[test]
    fn cooldown_patch_leaves_enabled_alone() {
        let p = GesturePolicy { enabled: false, cooldown_ms: 800 };
        let q = p.merged(PolicyPatch::cooldown_ms(2000));
        assert_eq!(q, GesturePolicy { enabled: false, cooldown_ms: 2000 });
    }

    #[test]
    fn empty_patch_is_identity() {
        let p = GesturePolicy { enabled: false, cooldown_ms: 1234 };
        assert_eq!(p.merged(PolicyPatch::default()), p);
    }

    #[test]
    fn nudge_clamps_to_range() {
        let p = GesturePolicy { enabled: true, cooldown_ms: 300 };
        assert_eq!(p.nudged_cooldown(-1), 200);
        assert_eq!(p.nudged_cooldown(-5), 200);
        assert_eq!(p.nudged_cooldown(4), 700);
        assert_eq!(p.nudged_cooldown(100), 2000);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&GesturePolicy::default()).unwrap();
        assert_eq!(json, r#"{"enabled":true,"cooldownMs":800}"#);
    }

    #[test]
    fn patch_reads_partial_documents() {
        let patch: PolicyPatch = serde_json::from_str(r#"{"cooldownMs":1500}"#).unwrap();
        assert_eq!(patch, PolicyPatch::cooldown_ms(1500));
    }
}
