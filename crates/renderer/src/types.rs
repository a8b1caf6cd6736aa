use std::path::PathBuf;

use field::compose::LayerParams;
use field::GlyphSet;
use tierconfig::{AdapterClass, CapabilitySignals, TierDefaults};

/// Caller-supplied parameter overrides. Every field is optional; unset
/// fields fall through to the capability tier's defaults and then to the
/// built-in defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOverrides {
    /// Overall layer transparency.
    pub opacity: Option<f32>,
    /// Whether time advances at all.
    pub animated: Option<bool>,
    /// Frame-rate cap for the time uniform.
    pub target_fps: Option<f32>,
    /// Pixel period of the fine grid.
    pub fine_spacing: Option<f32>,
    /// Pixel period of the coarse grid.
    pub coarse_spacing: Option<f32>,
    /// Base alpha of the fine layer.
    pub fine_opacity: Option<f32>,
    /// Base alpha of the coarse layer.
    pub coarse_opacity: Option<f32>,
    /// Time multiplier of the fine layer.
    pub fine_speed: Option<f32>,
    /// Time multiplier of the coarse layer.
    pub coarse_speed: Option<f32>,
    /// Glyph set rendered on the fine grid (the coarse grid is always
    /// geometric).
    pub glyph_set: Option<GlyphSet>,
}

/// Fully-resolved render parameters, immutable for the mount's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParameters {
    pub opacity: f32,
    pub animated: bool,
    pub target_fps: f32,
    pub layers: LayerParams,
    pub glyph_set: GlyphSet,
    pub render_scale: f32,
}

impl RenderParameters {
    /// Layers caller overrides over tier defaults over built-ins.
    ///
    /// Grid spacings come from the tier (the tier's whole point is trading
    /// cell density for fill rate); layer opacities and speeds are aesthetic
    /// rather than performance-bound, so their built-ins are fixed.
    pub fn resolve(overrides: &RenderOverrides, tier: &TierDefaults) -> Self {
        let defaults = LayerParams::default();
        Self {
            opacity: overrides.opacity.unwrap_or(0.08).clamp(0.0, 1.0),
            animated: overrides.animated.unwrap_or(true),
            target_fps: overrides
                .target_fps
                .filter(|fps| *fps > 0.0)
                .unwrap_or(tier.target_fps),
            layers: LayerParams {
                fine_spacing: overrides.fine_spacing.unwrap_or(tier.fine_spacing),
                coarse_spacing: overrides.coarse_spacing.unwrap_or(tier.coarse_spacing),
                fine_opacity: overrides.fine_opacity.unwrap_or(defaults.fine_opacity),
                coarse_opacity: overrides.coarse_opacity.unwrap_or(defaults.coarse_opacity),
                fine_speed: overrides.fine_speed.unwrap_or(defaults.fine_speed),
                coarse_speed: overrides.coarse_speed.unwrap_or(defaults.coarse_speed),
            },
            glyph_set: overrides.glyph_set.unwrap_or(GlyphSet::Minimal),
            render_scale: tier.render_scale,
        }
    }
}

/// Whether the environment asks for reduced motion.
///
/// The renderer treats this as an externally-supplied signal; `Inherit`
/// consults the `GLYPHFIELD_REDUCED_MOTION` environment variable, the two
/// explicit variants pin the answer (used by the CLI flag and by tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MotionPreference {
    #[default]
    Inherit,
    Reduced,
    Full,
}

impl MotionPreference {
    pub fn reduced(self) -> bool {
        match self {
            MotionPreference::Reduced => true,
            MotionPreference::Full => false,
            MotionPreference::Inherit => std::env::var("GLYPHFIELD_REDUCED_MOTION")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the animated preview loop.
    Animate,
    /// Show a single frozen frame at an optional timestamp.
    Still { time: Option<f32> },
    /// Render one frame on the CPU reference path and write it to disk.
    Export { time: Option<f32>, path: PathBuf },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate
    }
}

/// Identity and limits of the selected GPU adapter, captured once at mount
/// and fed to the tier policy.
#[derive(Clone, Debug)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub max_texture_dimension: u32,
}

impl AdapterProfile {
    pub fn from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            max_texture_dimension: limits.max_texture_dimension_2d,
        }
    }

    pub fn adapter_class(&self) -> AdapterClass {
        match self.device_type {
            wgpu::DeviceType::DiscreteGpu => AdapterClass::Discrete,
            wgpu::DeviceType::IntegratedGpu => AdapterClass::Integrated,
            wgpu::DeviceType::VirtualGpu => AdapterClass::Virtual,
            wgpu::DeviceType::Cpu => AdapterClass::Software,
            wgpu::DeviceType::Other => AdapterClass::Unknown,
        }
    }

    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }

    /// The signal set the tier policy classifies.
    pub fn signals(&self) -> CapabilitySignals {
        CapabilitySignals {
            adapter_class: self.adapter_class(),
            max_texture_dimension: self.max_texture_dimension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierconfig::CapabilityTier;

    #[test]
    fn overrides_win_over_tier_defaults() {
        let tier = TierDefaults::builtin(CapabilityTier::Low);
        let overrides = RenderOverrides {
            target_fps: Some(48.0),
            fine_spacing: Some(10.0),
            ..RenderOverrides::default()
        };
        let params = RenderParameters::resolve(&overrides, &tier);
        assert_eq!(params.target_fps, 48.0);
        assert_eq!(params.layers.fine_spacing, 10.0);
        // Unset fields pick up the tier, then the built-ins.
        assert_eq!(params.layers.coarse_spacing, tier.coarse_spacing);
        assert_eq!(params.layers.fine_opacity, 0.6);
        assert_eq!(params.opacity, 0.08);
        assert!(params.animated);
        assert_eq!(params.glyph_set, GlyphSet::Minimal);
    }

    #[test]
    fn zero_fps_override_falls_back_to_the_tier_cap() {
        let tier = TierDefaults::builtin(CapabilityTier::Medium);
        let overrides = RenderOverrides {
            target_fps: Some(0.0),
            ..RenderOverrides::default()
        };
        let params = RenderParameters::resolve(&overrides, &tier);
        assert_eq!(params.target_fps, tier.target_fps);
    }

    #[test]
    fn opacity_is_clamped_to_unit_range() {
        let tier = TierDefaults::builtin(CapabilityTier::High);
        let overrides = RenderOverrides {
            opacity: Some(3.0),
            ..RenderOverrides::default()
        };
        assert_eq!(RenderParameters::resolve(&overrides, &tier).opacity, 1.0);
    }

    #[test]
    fn motion_preference_pins_win_over_environment() {
        assert!(MotionPreference::Reduced.reduced());
        assert!(!MotionPreference::Full.reduced());
    }
}
