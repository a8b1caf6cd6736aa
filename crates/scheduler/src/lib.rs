//! Transition scheduling for the noise-type and glyph-set cycles.
//!
//! Each mounted background owns one [`TransitionScheduler`]; there is no
//! process-wide cycle state, so several backgrounds on one surface never
//! interfere with each other's rotations.
//!
//! The scheduler is advanced by explicit time deltas from the host loop
//! rather than reading a clock itself. That makes the cycle pause for free
//! when the host stops ticking (hidden surface, reduced motion) and makes
//! every timing property testable with synthetic deltas.
//!
//! ```text
//!   |◀──── stable 8 s ────▶|◀─ fade 2 s ─▶|
//!   blend = 1.0             blend 0 → 1    rotate, restart
//! ```

use std::time::Duration;

use field::{BlendedSelection, GlyphSet, NoiseKind};

/// How long a cycle holds the settled selection before fading.
pub const STABLE_PERIOD: Duration = Duration::from_secs(8);
/// How long the cross-fade into the next selection lasts.
pub const FADE_PERIOD: Duration = Duration::from_secs(2);

/// Stable/fade window lengths. The defaults are the production cadence;
/// policies may override them (e.g. longer holds on low-power tiers).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CyclePacing {
    pub stable: Duration,
    pub fade: Duration,
}

impl CyclePacing {
    fn total(&self) -> Duration {
        self.stable + self.fade
    }
}

impl Default for CyclePacing {
    fn default() -> Self {
        Self {
            stable: STABLE_PERIOD,
            fade: FADE_PERIOD,
        }
    }
}

/// The blended noise and glyph selections for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSnapshot {
    pub noise: BlendedSelection<NoiseKind>,
    pub glyph: BlendedSelection<GlyphSet>,
}

/// Advances the noise-type and glyph-set state machines in lockstep.
///
/// During the stable window both selections report `blend = 1.0`; during the
/// fade window `current` names the incoming selection, `previous` the
/// outgoing one, and `blend` ramps linearly 0 → 1 (consumers smoothstep it).
/// `current` and `previous` are never equal at any observable point.
pub struct TransitionScheduler {
    pacing: CyclePacing,
    /// Elapsed time within the current cycle.
    position: Duration,
    noise_current: NoiseKind,
    noise_previous: NoiseKind,
    glyph_current: GlyphSet,
    glyph_previous: GlyphSet,
    /// Index into [`GlyphSet::AUTO_CYCLE`] that the next fade targets.
    next_glyph_index: usize,
}

impl TransitionScheduler {
    /// Creates a scheduler settled on the given glyph set.
    ///
    /// Typography is never part of the automatic rotation: when selected it
    /// is held for the first stable window and the first fade enters the
    /// cycle at minimal.
    pub fn new(initial_glyph: GlyphSet) -> Self {
        Self::with_pacing(initial_glyph, CyclePacing::default())
    }

    /// Creates a scheduler with custom stable/fade windows.
    pub fn with_pacing(initial_glyph: GlyphSet, pacing: CyclePacing) -> Self {
        let cycle = GlyphSet::AUTO_CYCLE;
        let (glyph_previous, next_glyph_index) =
            match cycle.iter().position(|&set| set == initial_glyph) {
                Some(index) => {
                    let prev = cycle[(index + cycle.len() - 1) % cycle.len()];
                    (prev, (index + 1) % cycle.len())
                }
                // Held selection outside the rotation: the first fade
                // re-enters the cycle at its start.
                None => (cycle[cycle.len() - 1], 0),
            };

        Self {
            pacing,
            position: Duration::ZERO,
            noise_current: NoiseKind::Sphere,
            noise_previous: NoiseKind::Sphere.predecessor(),
            glyph_current: initial_glyph,
            glyph_previous,
            next_glyph_index,
        }
    }

    /// Advances the cycle by `delta` and returns the resulting snapshot.
    ///
    /// Deltas larger than a full cycle fold over as many rotations as have
    /// elapsed, so an irregular tick cadence cannot stall or skip the
    /// rotation order.
    pub fn advance(&mut self, delta: Duration) -> CycleSnapshot {
        self.position += delta;
        let total = self.pacing.total();
        while self.position >= total {
            self.position -= total;
            self.rotate();
        }
        self.snapshot()
    }

    /// The snapshot for the current cycle position, without advancing.
    pub fn snapshot(&self) -> CycleSnapshot {
        if self.position < self.pacing.stable {
            CycleSnapshot {
                noise: BlendedSelection::steady(self.noise_current, self.noise_previous),
                glyph: BlendedSelection::steady(self.glyph_current, self.glyph_previous),
            }
        } else {
            let into_fade = self.position - self.pacing.stable;
            let blend = into_fade.as_secs_f32() / self.pacing.fade.as_secs_f32().max(f32::EPSILON);
            CycleSnapshot {
                noise: BlendedSelection::fading(
                    self.noise_current,
                    self.noise_current.next(),
                    blend,
                ),
                glyph: BlendedSelection::fading(
                    self.glyph_current,
                    GlyphSet::AUTO_CYCLE[self.next_glyph_index],
                    blend,
                ),
            }
        }
    }

    fn rotate(&mut self) {
        self.noise_previous = self.noise_current;
        self.noise_current = self.noise_current.next();

        self.glyph_previous = self.glyph_current;
        self.glyph_current = GlyphSet::AUTO_CYCLE[self.next_glyph_index];
        self.next_glyph_index = (self.next_glyph_index + 1) % GlyphSet::AUTO_CYCLE.len();
    }
}
