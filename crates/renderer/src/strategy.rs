//! Render strategies.
//!
//! The orchestration loop schedules frames without knowing how they are
//! produced. [`GpuStrategy`] is the production path; [`StillStrategy`]
//! renders one frame on the CPU reference path and writes it to disk. A
//! future CPU-canvas or fully static tier slots in behind the same trait
//! without touching the scheduling logic.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::gpu::GpuState;
use crate::still;
use crate::types::{RenderOverrides, RenderParameters};
use scheduler::CycleSnapshot;
use tierconfig::TierPolicy;

/// Everything a strategy needs to produce one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest {
    /// Shader time in seconds (already offset and throttled).
    pub time: f32,
    /// Blended noise/glyph selections for this frame.
    pub cycle: CycleSnapshot,
}

/// Outcome of a strategy frame.
#[derive(Debug)]
pub enum FrameStatus {
    /// A frame reached the output surface.
    Presented,
    /// Nothing was drawn this frame; try again next tick.
    Skipped,
    /// The GPU context became invalid; the caller must dispose and re-init.
    ContextLost,
    /// An offline frame landed at the given path.
    Captured(PathBuf),
}

/// A way of turning frame requests into pixels.
pub trait RenderStrategy {
    /// Creates (or re-creates) the strategy's resources.
    fn init(&mut self) -> Result<()>;
    /// Produces one frame.
    fn frame(&mut self, request: &FrameRequest) -> Result<FrameStatus>;
    /// Tracks a host viewport size change.
    fn resize(&mut self, size: PhysicalSize<u32>);
    /// Releases all resources. Must be idempotent; `init` may follow.
    fn dispose(&mut self);
}

/// The wgpu-backed production strategy.
///
/// Owns the GPU state as an `Option` so a lost context can be dropped
/// wholesale and rebuilt by the next `init`, never patched in place.
pub struct GpuStrategy {
    window: Arc<Window>,
    overrides: RenderOverrides,
    tier_policy: TierPolicy,
    palette: [Vec3; 3],
    gpu: Option<GpuState>,
    params: Option<RenderParameters>,
}

impl GpuStrategy {
    pub fn new(
        window: Arc<Window>,
        overrides: RenderOverrides,
        tier_policy: TierPolicy,
        palette: [Vec3; 3],
    ) -> Self {
        Self {
            window,
            overrides,
            tier_policy,
            palette,
            gpu: None,
            params: None,
        }
    }

    /// Parameters resolved at the last successful `init`.
    pub fn params(&self) -> Option<&RenderParameters> {
        self.params.as_ref()
    }
}

impl RenderStrategy for GpuStrategy {
    fn init(&mut self) -> Result<()> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let size = self.window.inner_size();
        let (gpu, params) = GpuState::new(
            self.window.as_ref(),
            size,
            &self.overrides,
            &self.tier_policy,
            &self.palette,
        )
        .context("failed to initialise GPU strategy")?;
        tracing::debug!(
            adapter = %gpu.adapter_profile().name,
            target_fps = params.target_fps,
            "GPU strategy ready"
        );
        self.gpu = Some(gpu);
        self.params = Some(params);
        Ok(())
    }

    fn frame(&mut self, request: &FrameRequest) -> Result<FrameStatus> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(FrameStatus::Skipped);
        };
        match gpu.render(request.time, &request.cycle) {
            Ok(()) => Ok(FrameStatus::Presented),
            Err(wgpu::SurfaceError::Lost) => {
                tracing::warn!("GPU surface lost; scheduling full re-initialisation");
                Ok(FrameStatus::ContextLost)
            }
            Err(wgpu::SurfaceError::Outdated) => {
                // A stale swapchain after a resize, not a loss: reconfigure
                // and present on the next tick.
                let size = gpu.size();
                gpu.resize(size);
                Ok(FrameStatus::Skipped)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                Err(anyhow::anyhow!("GPU surface out of memory"))
            }
            Err(err) => {
                tracing::warn!(?err, "surface error; retrying next frame");
                Ok(FrameStatus::Skipped)
            }
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(size);
        }
    }

    fn dispose(&mut self) {
        self.gpu = None;
    }
}

/// Renders a single frame on the CPU reference path and writes a PNG.
pub struct StillStrategy {
    path: PathBuf,
    size: (u32, u32),
    params: RenderParameters,
    palette: [Vec3; 3],
    captured: bool,
}

impl StillStrategy {
    pub fn new(
        path: PathBuf,
        size: (u32, u32),
        params: RenderParameters,
        palette: [Vec3; 3],
    ) -> Self {
        Self {
            path,
            size,
            params,
            palette,
            captured: false,
        }
    }
}

impl RenderStrategy for StillStrategy {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn frame(&mut self, request: &FrameRequest) -> Result<FrameStatus> {
        if self.captured {
            return Ok(FrameStatus::Captured(self.path.clone()));
        }
        let image = still::render_image(
            self.size,
            request.time,
            &self.params,
            &self.palette,
            &request.cycle,
        );
        image
            .save(&self.path)
            .with_context(|| format!("failed to write still frame to {}", self.path.display()))?;
        self.captured = true;
        tracing::info!(path = %self.path.display(), "captured still frame");
        Ok(FrameStatus::Captured(self.path.clone()))
    }

    fn resize(&mut self, _size: PhysicalSize<u32>) {}

    fn dispose(&mut self) {
        self.captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::{BlendedSelection, GlyphSet, NoiseKind};
    use glam::vec3;
    use tierconfig::{CapabilityTier, TierDefaults};

    fn request() -> FrameRequest {
        FrameRequest {
            time: 0.0,
            cycle: CycleSnapshot {
                noise: BlendedSelection::steady(NoiseKind::Sphere, NoiseKind::Terrain),
                glyph: BlendedSelection::steady(GlyphSet::Minimal, GlyphSet::Dense),
            },
        }
    }

    fn params() -> RenderParameters {
        RenderParameters::resolve(
            &RenderOverrides::default(),
            &TierDefaults::builtin(CapabilityTier::Medium),
        )
    }

    #[derive(Default)]
    struct RecordingStrategy {
        inits: u32,
        frames: u32,
        disposes: u32,
    }

    impl RenderStrategy for RecordingStrategy {
        fn init(&mut self) -> Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn frame(&mut self, _request: &FrameRequest) -> Result<FrameStatus> {
            self.frames += 1;
            Ok(FrameStatus::Presented)
        }

        fn resize(&mut self, _size: PhysicalSize<u32>) {}

        fn dispose(&mut self) {
            self.disposes += 1;
        }
    }

    #[test]
    fn strategies_are_driven_through_the_trait_object() {
        let mut strategy: Box<dyn RenderStrategy> = Box::<RecordingStrategy>::default();
        strategy.init().expect("init");
        strategy.frame(&request()).expect("frame");
        // Dispose must be idempotent and init callable again afterwards;
        // that is the whole context-loss recovery contract.
        strategy.dispose();
        strategy.dispose();
        strategy.init().expect("re-init");
    }

    #[test]
    fn still_strategy_captures_once_and_is_reusable_after_dispose() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.png");
        let mut strategy = StillStrategy::new(
            path.clone(),
            (64, 36),
            params(),
            [vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, 1.0)],
        );
        strategy.init().expect("init");

        let status = strategy.frame(&request()).expect("frame");
        assert!(matches!(status, FrameStatus::Captured(p) if p == path));
        assert!(path.exists());

        // A second frame re-reports the capture without re-rendering.
        let again = strategy.frame(&request()).expect("frame");
        assert!(matches!(again, FrameStatus::Captured(_)));

        // Dispose resets the capture latch; init is callable again.
        strategy.dispose();
        strategy.init().expect("re-init");
        let after = strategy.frame(&request()).expect("frame");
        assert!(matches!(after, FrameStatus::Captured(_)));
    }
}
