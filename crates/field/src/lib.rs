//! Pure per-pixel math for the glyphfield renderer.
//!
//! Everything in this crate is a pure function of its arguments: the noise
//! synthesizers, the glyph mask tables, and the full frame composition. The
//! GPU fragment shader in the `renderer` crate is a line-for-line port of
//! these functions; this crate is the reference the tests and the still
//! exporter run against.
//!
//! ```text
//!   (point, time) ──▶ noise::field_density ──▶ density scalar
//!                           │
//!   (grid cell, density) ──▶ glyph::glyph_mask_blended ──▶ ink alpha
//!                           │
//!   (pixel uv, palette) ───▶ compose::shade_pixel ──▶ RGBA
//! ```

pub mod color;
pub mod compose;
pub mod glyph;
pub mod noise;

mod ops;

/// Procedural noise families the synthesizer can evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseKind {
    /// Five breathing metaballs on a golden-angle ring.
    Sphere,
    /// A pulsing ring with angular waviness.
    Torus,
    /// Standing-wave interference that pulses in place.
    Wave,
    /// Three-octave fractal terrain that evolves without scrolling.
    Terrain,
}

impl NoiseKind {
    /// Fixed rotation order used by the transition scheduler.
    pub const CYCLE: [NoiseKind; 4] = [
        NoiseKind::Sphere,
        NoiseKind::Torus,
        NoiseKind::Wave,
        NoiseKind::Terrain,
    ];

    /// The kind that follows `self` in the rotation.
    pub fn next(self) -> Self {
        match self {
            NoiseKind::Sphere => NoiseKind::Torus,
            NoiseKind::Torus => NoiseKind::Wave,
            NoiseKind::Wave => NoiseKind::Terrain,
            NoiseKind::Terrain => NoiseKind::Sphere,
        }
    }

    /// The kind that precedes `self` in the rotation.
    pub fn predecessor(self) -> Self {
        match self {
            NoiseKind::Sphere => NoiseKind::Terrain,
            NoiseKind::Torus => NoiseKind::Sphere,
            NoiseKind::Wave => NoiseKind::Torus,
            NoiseKind::Terrain => NoiseKind::Wave,
        }
    }

    /// Integer selector handed to the fragment shader.
    pub fn shader_index(self) -> u32 {
        match self {
            NoiseKind::Sphere => 0,
            NoiseKind::Torus => 1,
            NoiseKind::Wave => 2,
            NoiseKind::Terrain => 3,
        }
    }
}

/// The five glyph mask tables.
///
/// `Typography` is selectable by the caller but excluded from the automatic
/// rotation; see [`GlyphSet::AUTO_CYCLE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphSet {
    Minimal,
    Typography,
    Symbols,
    Geometric,
    Dense,
}

impl GlyphSet {
    /// Fixed automatic rotation order. Typography never appears here.
    pub const AUTO_CYCLE: [GlyphSet; 4] = [
        GlyphSet::Minimal,
        GlyphSet::Symbols,
        GlyphSet::Geometric,
        GlyphSet::Dense,
    ];

    /// Integer selector handed to the fragment shader.
    pub fn shader_index(self) -> u32 {
        match self {
            GlyphSet::Minimal => 0,
            GlyphSet::Typography => 1,
            GlyphSet::Symbols => 2,
            GlyphSet::Geometric => 3,
            GlyphSet::Dense => 4,
        }
    }

    /// Parses the user-facing set name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(GlyphSet::Minimal),
            "typography" => Some(GlyphSet::Typography),
            "symbols" => Some(GlyphSet::Symbols),
            "geometric" => Some(GlyphSet::Geometric),
            "dense" => Some(GlyphSet::Dense),
            _ => None,
        }
    }
}

impl std::fmt::Display for GlyphSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GlyphSet::Minimal => "minimal",
            GlyphSet::Typography => "typography",
            GlyphSet::Symbols => "symbols",
            GlyphSet::Geometric => "geometric",
            GlyphSet::Dense => "dense",
        };
        f.write_str(name)
    }
}

/// A cross-fade between two discrete selections.
///
/// `blend` is the interpolation weight toward `current`; 1.0 renders the
/// current selection alone, 0.0 the previous one alone. The consumers apply
/// a smoothstep on top, so a linear ramp here produces an eased fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendedSelection<T> {
    pub current: T,
    pub previous: T,
    pub blend: f32,
}

impl<T: Copy> BlendedSelection<T> {
    /// A settled selection: blend pinned at 1.0.
    pub fn steady(current: T, previous: T) -> Self {
        Self {
            current,
            previous,
            blend: 1.0,
        }
    }

    /// A mid-fade selection from `previous` into `current`.
    pub fn fading(previous: T, current: T, blend: f32) -> Self {
        Self {
            current,
            previous,
            blend: blend.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_cycle_rotates_through_all_kinds() {
        let mut kind = NoiseKind::Sphere;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(kind);
            kind = kind.next();
        }
        assert_eq!(seen, NoiseKind::CYCLE.to_vec());
        assert_eq!(kind, NoiseKind::Sphere);
    }

    #[test]
    fn predecessor_inverts_next() {
        for kind in NoiseKind::CYCLE {
            assert_eq!(kind.next().predecessor(), kind);
        }
    }

    #[test]
    fn typography_is_not_in_the_auto_cycle() {
        assert!(!GlyphSet::AUTO_CYCLE.contains(&GlyphSet::Typography));
    }

    #[test]
    fn glyph_set_names_round_trip() {
        for set in [
            GlyphSet::Minimal,
            GlyphSet::Typography,
            GlyphSet::Symbols,
            GlyphSet::Geometric,
            GlyphSet::Dense,
        ] {
            assert_eq!(GlyphSet::parse(&set.to_string()), Some(set));
        }
        assert_eq!(GlyphSet::parse("cursive"), None);
    }

    #[test]
    fn fading_clamps_blend() {
        let sel = BlendedSelection::fading(NoiseKind::Sphere, NoiseKind::Torus, 1.7);
        assert_eq!(sel.blend, 1.0);
        let sel = BlendedSelection::fading(NoiseKind::Sphere, NoiseKind::Torus, -0.2);
        assert_eq!(sel.blend, 0.0);
    }
}
