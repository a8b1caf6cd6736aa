//! Windowed preview host.
//!
//! The reference embedding of the renderer: a winit window whose event loop
//! drives the playback state machine, the transition scheduler, and the GPU
//! strategy. Occlusion events gate animation, resizes reconfigure the
//! surface, and a lost GPU context tears the strategy down and re-creates
//! it on a later tick.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::palette_or_default;
use crate::playback::{FrameClock, FrameDirective, Playback, PlaybackPhase};
use crate::strategy::{FrameRequest, FrameStatus, GpuStrategy, RenderStrategy};
use crate::types::RenderPolicy;
use crate::RendererConfig;
use scheduler::{CyclePacing, TransitionScheduler};

pub(crate) fn run_preview(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("glyphfield")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create preview window")?;
    let window = Arc::new(window);

    let palette = palette_or_default(&config.theme);
    let mut strategy = GpuStrategy::new(
        window.clone(),
        config.overrides.clone(),
        config.tier_policy.clone(),
        palette,
    );
    strategy.init()?;
    let params = strategy
        .params()
        .cloned()
        .ok_or_else(|| anyhow!("GPU strategy initialised without resolved parameters"))?;

    // Still mode freezes the clock at the requested timestamp; animated
    // mounts start at a random, already-interesting point instead.
    let (animated, offset) = match &config.policy {
        RenderPolicy::Still { time } => (false, time.unwrap_or(0.0)),
        _ => (params.animated, FrameClock::random_offset()),
    };
    let reduced_motion = config.motion.reduced();
    if reduced_motion {
        tracing::info!("reduced motion requested; the time uniform will hold its first value");
    }

    let clock = FrameClock::new(params.target_fps, offset);
    let mut playback = Playback::new(clock, animated, reduced_motion);
    let mounted_at = Instant::now();
    playback.set_visible(true, mounted_at);

    let pacing = CyclePacing {
        stable: config.tier_policy.pacing.stable,
        fade: config.tier_policy.pacing.fade,
    };
    let mut cycles = TransitionScheduler::with_pacing(params.glyph_set, pacing);
    let mut snapshot = cycles.snapshot();
    let mut last_tick = mounted_at;

    window.request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            playback.unmount(Instant::now());
                            strategy.dispose();
                            elwt.exit();
                        }
                        WindowEvent::Occluded(occluded) => {
                            playback.set_visible(!occluded, Instant::now());
                        }
                        WindowEvent::Resized(new_size) => {
                            strategy.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current logical size across DPI changes.
                            let _ = inner_size_writer.request_inner_size(window.inner_size());
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let delta = now.saturating_duration_since(last_tick);
                            last_tick = now;

                            match playback.next_frame(now) {
                                FrameDirective::Skip => {
                                    if playback.phase() == PlaybackPhase::ContextLost {
                                        match strategy.init() {
                                            Ok(()) => {
                                                tracing::info!(
                                                    "GPU context restored; resuming playback"
                                                );
                                                playback.context_restored(now);
                                            }
                                            Err(err) => tracing::warn!(
                                                error = %err,
                                                "GPU re-initialisation failed; retrying"
                                            ),
                                        }
                                    }
                                }
                                FrameDirective::Draw { time } => {
                                    // The cycle only advances while animating,
                                    // so pauses freeze the rotation too.
                                    if playback.phase() == PlaybackPhase::Animating {
                                        snapshot = cycles.advance(delta);
                                    }
                                    let request = FrameRequest {
                                        time,
                                        cycle: snapshot,
                                    };
                                    match strategy.frame(&request) {
                                        Ok(FrameStatus::Presented | FrameStatus::Skipped) => {}
                                        Ok(FrameStatus::Captured(path)) => {
                                            tracing::info!(
                                                path = %path.display(),
                                                "frame captured"
                                            );
                                        }
                                        Ok(FrameStatus::ContextLost) => {
                                            strategy.dispose();
                                            playback.context_lost(now);
                                        }
                                        Err(err) => {
                                            tracing::error!(
                                                error = %err,
                                                "unrecoverable render error; shutting down"
                                            );
                                            playback.unmount(now);
                                            strategy.dispose();
                                            elwt.exit();
                                        }
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Schedule the next frame once winit is about to idle.
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}
