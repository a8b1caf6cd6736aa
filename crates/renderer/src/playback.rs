//! Playback lifecycle: the frame clock and the orchestrator state machine.
//!
//! Visibility, reduced motion and GPU context loss were easy to mis-handle
//! as independent booleans; here they are one tagged state with explicit
//! transitions:
//!
//! ```text
//!   Mounting ──visible──▶ Settling(100 ms) ──▶ Animating
//!       ▲                      │                  │ hidden / reduced motion
//!       │                      ▼                  ▼
//!   Unmounted ◀─────────── ContextLost ◀──── Paused(reason)
//!                (restored ⇒ Settling again)
//! ```
//!
//! The clock holds its accumulated value across pauses, so resuming never
//! jumps, and the per-mount random offset makes every mount start at an
//! already-interesting point of the animation instead of a cold start.

use std::time::{Duration, Instant};

use rand::Rng;

/// Delay between first visibility and the first animated frame.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Lower bound of the per-mount time offset, in seconds.
pub const MIN_TIME_OFFSET: f32 = 50.0;
/// Upper bound of the per-mount time offset, in seconds.
pub const MAX_TIME_OFFSET: f32 = 150.0;

/// Monotonic shader time with a per-mount offset and FPS throttling.
#[derive(Debug)]
pub struct FrameClock {
    offset: f32,
    accumulated: Duration,
    running_since: Option<Instant>,
    last_advance: Option<Instant>,
    frame_interval: Duration,
}

impl FrameClock {
    /// A clock capped at `target_fps`, starting paused at `offset` seconds.
    pub fn new(target_fps: f32, offset: f32) -> Self {
        let fps = target_fps.max(1.0);
        Self {
            offset,
            accumulated: Duration::ZERO,
            running_since: None,
            last_advance: None,
            frame_interval: Duration::from_secs_f32(1.0 / fps),
        }
    }

    /// Draws the random per-mount offset.
    pub fn random_offset() -> f32 {
        rand::thread_rng().gen_range(MIN_TIME_OFFSET..MAX_TIME_OFFSET)
    }

    /// The shader time at `now`, whether or not the clock is running.
    pub fn time_at(&self, now: Instant) -> f32 {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or(Duration::ZERO);
        self.offset + (self.accumulated + running).as_secs_f32()
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Starts accumulating from `now`. Idempotent.
    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Freezes the accumulated time at `now`. Idempotent.
    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    /// Advances the throttled time uniform.
    ///
    /// Returns the new time when at least one frame interval elapsed since
    /// the previous advance, otherwise `None` (the caller keeps presenting
    /// the held frame).
    pub fn try_advance(&mut self, now: Instant) -> Option<f32> {
        if self.running_since.is_none() {
            return None;
        }
        if let Some(last) = self.last_advance {
            if now.saturating_duration_since(last) < self.frame_interval {
                return None;
            }
        }
        self.last_advance = Some(now);
        Some(self.time_at(now))
    }
}

/// Why an otherwise-ready playback is not advancing time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseReason {
    /// The surface is occluded or scrolled out of view.
    Hidden,
    /// The environment asked for reduced motion.
    ReducedMotion,
    /// The caller requested a frozen frame (`animated = false`).
    Frozen,
}

/// The orchestrator lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    Mounting,
    Settling { visible_since: Instant },
    Animating,
    Paused(PauseReason),
    ContextLost,
    Unmounted,
}

/// What the render loop should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDirective {
    /// Present a frame at the given shader time.
    Draw { time: f32 },
    /// Present nothing (context lost or unmounted).
    Skip,
}

/// Owns the clock and the lifecycle state; pure of any GPU or windowing
/// concern so every transition is unit-testable.
#[derive(Debug)]
pub struct Playback {
    phase: PlaybackPhase,
    clock: FrameClock,
    visible: bool,
    reduced_motion: bool,
    animated: bool,
    settle_delay: Duration,
}

impl Playback {
    pub fn new(clock: FrameClock, animated: bool, reduced_motion: bool) -> Self {
        Self {
            phase: PlaybackPhase::Mounting,
            clock,
            visible: false,
            reduced_motion,
            animated,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// True while the GPU surface must stay blank.
    pub fn is_blanked(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::ContextLost | PlaybackPhase::Unmounted
        )
    }

    fn blocked_reason(&self) -> Option<PauseReason> {
        if !self.animated {
            Some(PauseReason::Frozen)
        } else if self.reduced_motion {
            Some(PauseReason::ReducedMotion)
        } else if !self.visible {
            Some(PauseReason::Hidden)
        } else {
            None
        }
    }

    /// Visibility change from the host (occlusion / intersection).
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if matches!(
            self.phase,
            PlaybackPhase::Unmounted | PlaybackPhase::ContextLost
        ) {
            self.visible = visible;
            return;
        }
        self.visible = visible;

        if visible {
            match self.blocked_reason() {
                Some(reason) => self.phase = PlaybackPhase::Paused(reason),
                None => {
                    if !matches!(self.phase, PlaybackPhase::Animating) {
                        self.phase = PlaybackPhase::Settling { visible_since: now };
                    }
                }
            }
        } else {
            // Time stops within this event; the held frame stays mounted.
            self.clock.pause(now);
            if self.animated && !self.reduced_motion {
                self.phase = PlaybackPhase::Paused(PauseReason::Hidden);
            }
        }
    }

    /// Promotes a settled surface into animation. Call once per loop tick.
    pub fn poll(&mut self, now: Instant) {
        if let PlaybackPhase::Settling { visible_since } = self.phase {
            if now.saturating_duration_since(visible_since) >= self.settle_delay {
                self.phase = PlaybackPhase::Animating;
                self.clock.resume(now);
            }
        }
    }

    /// GPU context became invalid: blank output and hold time.
    pub fn context_lost(&mut self, now: Instant) {
        if matches!(self.phase, PlaybackPhase::Unmounted) {
            return;
        }
        self.clock.pause(now);
        self.phase = PlaybackPhase::ContextLost;
    }

    /// GPU context came back; the caller has already rebuilt the surface.
    /// Re-enters through the settle window so the first animated frame does
    /// not race the fresh swapchain.
    pub fn context_restored(&mut self, now: Instant) {
        if !matches!(self.phase, PlaybackPhase::ContextLost) {
            return;
        }
        self.phase = match self.blocked_reason() {
            Some(reason) if self.visible => PlaybackPhase::Paused(reason),
            _ if self.visible => PlaybackPhase::Settling { visible_since: now },
            _ => PlaybackPhase::Mounting,
        };
    }

    /// Terminal transition; idempotent. All scheduling stops here.
    pub fn unmount(&mut self, now: Instant) {
        self.clock.pause(now);
        self.phase = PlaybackPhase::Unmounted;
    }

    /// Decides this frame's action and advances the throttled clock while
    /// animating.
    pub fn next_frame(&mut self, now: Instant) -> FrameDirective {
        self.poll(now);
        match self.phase {
            PlaybackPhase::Unmounted | PlaybackPhase::ContextLost => FrameDirective::Skip,
            PlaybackPhase::Animating => {
                let time = self
                    .clock
                    .try_advance(now)
                    .unwrap_or_else(|| self.clock.time_at(now));
                FrameDirective::Draw { time }
            }
            // Mounting, settling and paused states keep presenting the held
            // frame so the layer never flashes out.
            _ => FrameDirective::Draw {
                time: self.clock.time_at(now),
            },
        }
    }

    /// The held shader time (test and uniform-seeding hook).
    pub fn held_time(&self, now: Instant) -> f32 {
        self.clock.time_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FrameClock {
        FrameClock::new(60.0, 75.0)
    }

    fn advance(now: Instant, ms: u64) -> Instant {
        now + Duration::from_millis(ms)
    }

    #[test]
    fn random_offset_stays_in_the_documented_window() {
        for _ in 0..64 {
            let offset = FrameClock::random_offset();
            assert!((MIN_TIME_OFFSET..MAX_TIME_OFFSET).contains(&offset));
        }
    }

    #[test]
    fn clock_holds_offset_until_resumed() {
        let t0 = Instant::now();
        let clock = clock();
        assert_eq!(clock.time_at(advance(t0, 5_000)), 75.0);
    }

    #[test]
    fn clock_throttles_to_the_frame_interval() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50.0, 0.0); // 20 ms interval
        clock.resume(t0);
        assert!(clock.try_advance(t0).is_some());
        assert!(clock.try_advance(advance(t0, 10)).is_none());
        assert!(clock.try_advance(advance(t0, 20)).is_some());
    }

    #[test]
    fn settle_delay_gates_the_first_animated_frame() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), true, false);
        playback.set_visible(true, t0);
        assert!(matches!(playback.phase(), PlaybackPhase::Settling { .. }));

        playback.poll(advance(t0, 50));
        assert!(matches!(playback.phase(), PlaybackPhase::Settling { .. }));

        playback.poll(advance(t0, 120));
        assert_eq!(playback.phase(), PlaybackPhase::Animating);
    }

    #[test]
    fn reduced_motion_never_advances_time() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), true, true);
        playback.set_visible(true, t0);
        assert_eq!(
            playback.phase(),
            PlaybackPhase::Paused(PauseReason::ReducedMotion)
        );

        let first = playback.next_frame(advance(t0, 200));
        let later = playback.next_frame(advance(t0, 60_000));
        assert_eq!(first, FrameDirective::Draw { time: 75.0 });
        assert_eq!(later, FrameDirective::Draw { time: 75.0 });
    }

    #[test]
    fn frozen_playback_presents_but_never_animates() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), false, false);
        playback.set_visible(true, t0);
        assert_eq!(playback.phase(), PlaybackPhase::Paused(PauseReason::Frozen));
        let directive = playback.next_frame(advance(t0, 10_000));
        assert_eq!(directive, FrameDirective::Draw { time: 75.0 });
    }

    #[test]
    fn hiding_pauses_and_revealing_resumes_from_the_held_time() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), true, false);
        playback.set_visible(true, t0);
        playback.poll(advance(t0, 150));
        assert_eq!(playback.phase(), PlaybackPhase::Animating);

        // Two seconds of animation, then the surface scrolls away.
        let hide_at = advance(t0, 2_150);
        playback.set_visible(false, hide_at);
        assert_eq!(playback.phase(), PlaybackPhase::Paused(PauseReason::Hidden));
        let held = playback.held_time(advance(t0, 50_000));
        assert!((held - 77.0).abs() < 0.05, "held time drifted to {held}");

        // Presenting while hidden keeps the held frame.
        let directive = playback.next_frame(advance(t0, 50_000));
        assert_eq!(directive, FrameDirective::Draw { time: held });

        // Back into view: resumes from the held value, no jump.
        let show_at = advance(t0, 60_000);
        playback.set_visible(true, show_at);
        playback.poll(advance(t0, 60_150));
        assert_eq!(playback.phase(), PlaybackPhase::Animating);
        let resumed = playback.held_time(advance(t0, 60_150));
        assert!((resumed - held).abs() < 0.2, "resume jumped to {resumed}");
    }

    #[test]
    fn context_loss_blanks_and_restore_remounts() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), true, false);
        playback.set_visible(true, t0);
        playback.poll(advance(t0, 150));

        playback.context_lost(advance(t0, 1_000));
        assert_eq!(playback.phase(), PlaybackPhase::ContextLost);
        assert!(playback.is_blanked());
        assert_eq!(playback.next_frame(advance(t0, 1_100)), FrameDirective::Skip);

        playback.context_restored(advance(t0, 2_000));
        assert!(matches!(playback.phase(), PlaybackPhase::Settling { .. }));
        playback.poll(advance(t0, 2_200));
        assert_eq!(playback.phase(), PlaybackPhase::Animating);
        // Time resumed from the held value.
        let resumed = playback.held_time(advance(t0, 2_200));
        assert!((resumed - 75.85).abs() < 0.1, "resumed at {resumed}");
    }

    #[test]
    fn unmount_is_terminal_and_idempotent() {
        let t0 = Instant::now();
        let mut playback = Playback::new(clock(), true, false);
        playback.set_visible(true, t0);
        playback.poll(advance(t0, 150));

        playback.unmount(advance(t0, 500));
        assert_eq!(playback.phase(), PlaybackPhase::Unmounted);
        playback.unmount(advance(t0, 600));
        assert_eq!(playback.phase(), PlaybackPhase::Unmounted);

        // Events after unmount are inert.
        playback.set_visible(true, advance(t0, 700));
        playback.context_restored(advance(t0, 800));
        playback.poll(advance(t0, 900));
        assert_eq!(playback.phase(), PlaybackPhase::Unmounted);
        assert_eq!(playback.next_frame(advance(t0, 1_000)), FrameDirective::Skip);
    }
}
