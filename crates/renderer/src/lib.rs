//! Render orchestrator for the glyphfield background.
//!
//! Composes the pure field math, the transition scheduler and the tier
//! policy into an animated GPU layer. The overall flow:
//!
//! ```text
//!   CLI / host
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ window::run_preview ──▶ winit event loop
//!        │                   │
//!        │                   ├─▶ Playback (visibility / reduced motion /
//!        │                   │             context loss / frame throttle)
//!        │                   ├─▶ TransitionScheduler (8 s / 2 s cycle)
//!        │                   └─▶ RenderStrategy::frame ─▶ GPU uniforms
//!        └─▶ still export (CPU reference path ─▶ PNG)
//! ```
//!
//! `GpuState` owns all GPU resources; `Playback` owns all temporal state.
//! A lost GPU context is never patched: the strategy is disposed and fully
//! re-initialised, which is the only recovery that behaves the same across
//! drivers.

mod gpu;
pub mod playback;
mod shader;
mod still;
pub mod strategy;
mod types;
mod uniforms;
mod window;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;

use field::color::ColorTheme;
use scheduler::{CyclePacing, TransitionScheduler};
use strategy::{FrameRequest, FrameStatus, RenderStrategy, StillStrategy};
use tierconfig::{CapabilityTier, TierPolicy};

pub use types::{
    AdapterProfile, MotionPreference, RenderOverrides, RenderParameters, RenderPolicy,
};

/// Immutable configuration passed to the renderer at start-up.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Window or surface size in physical pixels.
    pub surface_size: (u32, u32),
    /// Color theme driving the density gradients.
    pub theme: ColorTheme,
    /// Caller parameter overrides (win over tier defaults).
    pub overrides: RenderOverrides,
    /// Animate, still, or export behaviour.
    pub policy: RenderPolicy,
    /// Reduced-motion signal handling.
    pub motion: MotionPreference,
    /// Injectable capability tier policy.
    pub tier_policy: TierPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            theme: ColorTheme::default(),
            overrides: RenderOverrides::default(),
            policy: RenderPolicy::default(),
            motion: MotionPreference::default(),
            tier_policy: TierPolicy::default(),
        }
    }
}

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Runs the configured policy: the windowed preview for animate/still,
    /// or a headless CPU export.
    pub fn run(&mut self) -> Result<()> {
        match self.config.policy.clone() {
            RenderPolicy::Export { time, path } => self.run_export(time, &path),
            RenderPolicy::Animate | RenderPolicy::Still { .. } => {
                window::run_preview(&self.config)
            }
        }
    }

    /// Renders one frame on the CPU reference path and writes it to disk.
    ///
    /// Headless: there is no adapter to classify, so the medium tier's
    /// defaults apply (overrides still win). The clock offset is zero so
    /// exports are reproducible.
    fn run_export(&self, time: Option<f32>, path: &Path) -> Result<()> {
        let palette = palette_or_default(&self.config.theme);
        let tier = self
            .config
            .tier_policy
            .defaults_for(CapabilityTier::Medium);
        let params = RenderParameters::resolve(&self.config.overrides, &tier);

        let scale = params.render_scale;
        let size = (
            ((self.config.surface_size.0 as f32 * scale) as u32).max(1),
            ((self.config.surface_size.1 as f32 * scale) as u32).max(1),
        );

        let pacing = CyclePacing {
            stable: self.config.tier_policy.pacing.stable,
            fade: self.config.tier_policy.pacing.fade,
        };
        let cycles = TransitionScheduler::with_pacing(params.glyph_set, pacing);
        let request = FrameRequest {
            time: time.unwrap_or(0.0),
            cycle: cycles.snapshot(),
        };

        let mut strategy = StillStrategy::new(path.to_path_buf(), size, params, palette);
        strategy.init()?;
        match strategy
            .frame(&request)
            .context("still export failed")?
        {
            FrameStatus::Captured(written) => {
                tracing::info!(path = %written.display(), "still export complete");
                Ok(())
            }
            other => Err(anyhow!("still export produced no frame ({other:?})")),
        }
    }
}

/// The three uniform color slots for a theme, falling back to the default
/// theme when the host supplied fewer than two colors. The background is
/// decorative; malformed input degrades, it never fails.
pub(crate) fn palette_or_default(theme: &ColorTheme) -> [Vec3; 3] {
    if theme.colors.len() < 2 {
        tracing::warn!(
            theme = %theme.name,
            "theme has fewer than two colors; using the default theme"
        );
        return ColorTheme::default().uniform_palette();
    }
    theme.uniform_palette()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn short_theme_falls_back_to_default_palette() {
        let broken = ColorTheme {
            name: "Broken".into(),
            description: String::new(),
            colors: vec![vec3(1.0, 0.0, 0.0)],
        };
        assert_eq!(
            palette_or_default(&broken),
            ColorTheme::default().uniform_palette()
        );
    }

    #[test]
    fn export_policy_round_trips_through_config() {
        let config = RendererConfig {
            policy: RenderPolicy::Export {
                time: Some(2.0),
                path: "/tmp/out.png".into(),
            },
            ..RendererConfig::default()
        };
        assert!(matches!(config.policy, RenderPolicy::Export { .. }));
    }
}
