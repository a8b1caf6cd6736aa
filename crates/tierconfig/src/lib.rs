//! Device-capability tier policy.
//!
//! The renderer classifies the runtime environment into a coarse tier
//! (low/medium/high) and derives default performance parameters from it.
//! Which signals map to which tier is deliberately not hard-coded: the
//! policy ships with built-in defaults and every rule can be overridden
//! from a TOML file supplied by the caller.
//!
//! ```toml
//! version = 1
//!
//! [classify]
//! integrated = "high"
//! min_texture_dimension = 4096
//!
//! [tiers.low]
//! target_fps = 20
//!
//! [pacing]
//! stable = "12s"
//! fade = "3s"
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read tier policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tier policy: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid tier policy: {0}")]
    Invalid(String),
}

/// Coarse rendering-power classification of the runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    Low,
    Medium,
    High,
}

impl CapabilityTier {
    /// One step down; low stays low.
    pub fn demoted(self) -> Self {
        match self {
            CapabilityTier::High => CapabilityTier::Medium,
            CapabilityTier::Medium | CapabilityTier::Low => CapabilityTier::Low,
        }
    }
}

impl fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityTier::Low => f.write_str("low"),
            CapabilityTier::Medium => f.write_str("medium"),
            CapabilityTier::High => f.write_str("high"),
        }
    }
}

/// The adapter family reported by the GPU layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterClass {
    Discrete,
    Integrated,
    Virtual,
    Software,
    Unknown,
}

/// Environment signals the policy classifies. Gathered once at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySignals {
    pub adapter_class: AdapterClass,
    pub max_texture_dimension: u32,
}

/// Per-adapter-class tier assignments plus a texture-dimension demotion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifyRules {
    #[serde(default = "default_discrete_tier")]
    pub discrete: CapabilityTier,
    #[serde(default = "default_integrated_tier")]
    pub integrated: CapabilityTier,
    #[serde(default = "default_integrated_tier", rename = "virtual")]
    pub virtual_adapter: CapabilityTier,
    #[serde(default = "default_software_tier")]
    pub software: CapabilityTier,
    #[serde(default = "default_integrated_tier")]
    pub unknown: CapabilityTier,
    /// Adapters reporting a smaller max 2D texture dimension are demoted
    /// one tier.
    #[serde(default = "default_min_texture_dimension")]
    pub min_texture_dimension: u32,
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self {
            discrete: default_discrete_tier(),
            integrated: default_integrated_tier(),
            virtual_adapter: default_integrated_tier(),
            software: default_software_tier(),
            unknown: default_integrated_tier(),
            min_texture_dimension: default_min_texture_dimension(),
        }
    }
}

fn default_discrete_tier() -> CapabilityTier {
    CapabilityTier::High
}

fn default_integrated_tier() -> CapabilityTier {
    CapabilityTier::Medium
}

fn default_software_tier() -> CapabilityTier {
    CapabilityTier::Low
}

fn default_min_texture_dimension() -> u32 {
    8192
}

/// Fully-resolved per-tier rendering defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierDefaults {
    pub target_fps: f32,
    pub fine_spacing: f32,
    pub coarse_spacing: f32,
    pub render_scale: f32,
}

impl TierDefaults {
    /// Built-in defaults for a tier; the baseline a policy file layers over.
    pub fn builtin(tier: CapabilityTier) -> Self {
        match tier {
            CapabilityTier::Low => Self {
                target_fps: 24.0,
                fine_spacing: 16.0,
                coarse_spacing: 32.0,
                render_scale: 0.75,
            },
            CapabilityTier::Medium => Self {
                target_fps: 30.0,
                fine_spacing: 12.0,
                coarse_spacing: 24.0,
                render_scale: 1.0,
            },
            CapabilityTier::High => Self {
                target_fps: 60.0,
                fine_spacing: 12.0,
                coarse_spacing: 24.0,
                render_scale: 1.0,
            },
        }
    }
}

/// Partial tier override as written in the policy file; unset fields fall
/// through to [`TierDefaults::builtin`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TierOverride {
    pub target_fps: Option<f32>,
    pub fine_spacing: Option<f32>,
    pub coarse_spacing: Option<f32>,
    pub render_scale: Option<f32>,
}

impl TierOverride {
    fn resolve(&self, base: TierDefaults) -> TierDefaults {
        TierDefaults {
            target_fps: self.target_fps.unwrap_or(base.target_fps),
            fine_spacing: self.fine_spacing.unwrap_or(base.fine_spacing),
            coarse_spacing: self.coarse_spacing.unwrap_or(base.coarse_spacing),
            render_scale: self.render_scale.unwrap_or(base.render_scale),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TierTable {
    #[serde(default)]
    pub low: TierOverride,
    #[serde(default)]
    pub medium: TierOverride,
    #[serde(default)]
    pub high: TierOverride,
}

/// Transition-cycle pacing carried alongside the tier table so deployments
/// can slow the rotation on constrained devices.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacingConfig {
    #[serde(
        default = "default_stable_period",
        deserialize_with = "deserialize_duration"
    )]
    pub stable: Duration,
    #[serde(
        default = "default_fade_period",
        deserialize_with = "deserialize_duration"
    )]
    pub fade: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            stable: default_stable_period(),
            fade: default_fade_period(),
        }
    }
}

fn default_stable_period() -> Duration {
    Duration::from_secs(8)
}

fn default_fade_period() -> Duration {
    Duration::from_secs(2)
}

/// The complete, injectable capability policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TierPolicy {
    pub version: u32,
    #[serde(default)]
    pub classify: ClassifyRules,
    #[serde(default)]
    pub tiers: TierTable,
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            version: 1,
            classify: ClassifyRules::default(),
            tiers: TierTable::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl TierPolicy {
    pub fn from_toml_str(input: &str) -> Result<Self, PolicyError> {
        let policy: TierPolicy = toml::from_str(input)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Maps environment signals to a tier.
    pub fn classify(&self, signals: &CapabilitySignals) -> CapabilityTier {
        let base = match signals.adapter_class {
            AdapterClass::Discrete => self.classify.discrete,
            AdapterClass::Integrated => self.classify.integrated,
            AdapterClass::Virtual => self.classify.virtual_adapter,
            AdapterClass::Software => self.classify.software,
            AdapterClass::Unknown => self.classify.unknown,
        };
        if signals.max_texture_dimension < self.classify.min_texture_dimension {
            base.demoted()
        } else {
            base
        }
    }

    /// Resolved defaults for a tier: file overrides layered on built-ins.
    pub fn defaults_for(&self, tier: CapabilityTier) -> TierDefaults {
        let over = match tier {
            CapabilityTier::Low => &self.tiers.low,
            CapabilityTier::Medium => &self.tiers.medium,
            CapabilityTier::High => &self.tiers.high,
        };
        over.resolve(TierDefaults::builtin(tier))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version != 1 {
            return Err(PolicyError::Invalid(format!(
                "unsupported policy version {}; expected 1",
                self.version
            )));
        }

        for tier in [
            CapabilityTier::Low,
            CapabilityTier::Medium,
            CapabilityTier::High,
        ] {
            let resolved = self.defaults_for(tier);
            if resolved.target_fps <= 0.0 {
                return Err(PolicyError::Invalid(format!(
                    "tier '{tier}' target_fps must be > 0"
                )));
            }
            if resolved.fine_spacing <= 0.0 || resolved.coarse_spacing <= 0.0 {
                return Err(PolicyError::Invalid(format!(
                    "tier '{tier}' grid spacings must be > 0"
                )));
            }
            if !(0.1..=2.0).contains(&resolved.render_scale) {
                return Err(PolicyError::Invalid(format!(
                    "tier '{tier}' render_scale must lie in [0.1, 2.0]"
                )));
            }
        }

        if self.pacing.stable.is_zero() {
            return Err(PolicyError::Invalid(
                "pacing.stable must be greater than zero".into(),
            ));
        }
        if self.pacing.fade.is_zero() {
            return Err(PolicyError::Invalid(
                "pacing.fade must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[classify]
integrated = "high"
min_texture_dimension = 4096

[tiers.low]
target_fps = 20
render_scale = 0.5

[pacing]
stable = "12s"
fade = 3
"#;

    fn signals(class: AdapterClass, dim: u32) -> CapabilitySignals {
        CapabilitySignals {
            adapter_class: class,
            max_texture_dimension: dim,
        }
    }

    #[test]
    fn parses_sample_policy() {
        let policy = TierPolicy::from_toml_str(SAMPLE).expect("parse policy");
        assert_eq!(policy.classify.integrated, CapabilityTier::High);
        assert_eq!(policy.pacing.stable, Duration::from_secs(12));
        assert_eq!(policy.pacing.fade, Duration::from_secs(3));
    }

    #[test]
    fn default_policy_classifies_by_adapter_class() {
        let policy = TierPolicy::default();
        assert_eq!(
            policy.classify(&signals(AdapterClass::Discrete, 16384)),
            CapabilityTier::High
        );
        assert_eq!(
            policy.classify(&signals(AdapterClass::Integrated, 16384)),
            CapabilityTier::Medium
        );
        assert_eq!(
            policy.classify(&signals(AdapterClass::Software, 16384)),
            CapabilityTier::Low
        );
    }

    #[test]
    fn small_texture_dimension_demotes_one_tier() {
        let policy = TierPolicy::default();
        assert_eq!(
            policy.classify(&signals(AdapterClass::Discrete, 4096)),
            CapabilityTier::Medium
        );
        assert_eq!(
            policy.classify(&signals(AdapterClass::Software, 2048)),
            CapabilityTier::Low
        );
    }

    #[test]
    fn overrides_layer_over_builtin_defaults() {
        let policy = TierPolicy::from_toml_str(SAMPLE).unwrap();
        let low = policy.defaults_for(CapabilityTier::Low);
        assert_eq!(low.target_fps, 20.0);
        assert_eq!(low.render_scale, 0.5);
        // Untouched fields keep the built-ins.
        assert_eq!(low.fine_spacing, 16.0);
        assert_eq!(low.coarse_spacing, 32.0);
    }

    #[test]
    fn builtin_tiers_scale_with_capability() {
        let high = TierDefaults::builtin(CapabilityTier::High);
        let low = TierDefaults::builtin(CapabilityTier::Low);
        assert!(high.target_fps > low.target_fps);
        assert!(high.render_scale >= low.render_scale);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = TierPolicy::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, PolicyError::Invalid(_)));
    }

    #[test]
    fn rejects_nonpositive_fps_override() {
        let err = TierPolicy::from_toml_str(
            r#"
version = 1

[tiers.medium]
target_fps = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_fade() {
        let err = TierPolicy::from_toml_str(
            r#"
version = 1

[pacing]
fade = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Invalid(_)));
    }

    #[test]
    fn default_policy_validates() {
        TierPolicy::default().validate().expect("defaults valid");
    }
}
