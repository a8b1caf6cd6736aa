//! Glyph density masks.
//!
//! A grid cell plus a density scalar select one of five ink shapes per set,
//! evaluated as smoothstep masks against the fractional position inside the
//! cell. Densities are compressed to 0.75 of their input range first, which
//! drops the two heaviest marks of a full ramp and keeps the overall texture
//! light.

use glam::{vec2, Vec2};

use crate::ops::{fract2, mix, smoothstep};
use crate::{BlendedSelection, GlyphSet};

/// Fraction of the density range that maps onto the five tiers.
pub const DENSITY_COMPRESSION: f32 = 0.75;

/// Ink coverage for one grid cell.
///
/// `grid_coord` is the cell-space coordinate (pixel position divided by the
/// grid spacing); only its fractional part selects the position within the
/// cell. Returns a mask in [0, 1].
pub fn glyph_mask(grid_coord: Vec2, density: f32, set: GlyphSet) -> f32 {
    let density = density * DENSITY_COMPRESSION;

    let cell = fract2(grid_coord);
    let centered = cell - Vec2::splat(0.5);
    let d_center = centered.length();

    match set {
        // Dot progression: . -> small dot -> ring -> solid dot -> cored disc.
        GlyphSet::Minimal => {
            if density < 0.2 {
                smoothstep(0.45, 0.38, d_center) * 0.3
            } else if density < 0.4 {
                smoothstep(0.42, 0.32, d_center) * 0.6
            } else if density < 0.6 {
                smoothstep(0.38, 0.28, d_center) * 0.8
            } else if density < 0.8 {
                smoothstep(0.4, 0.28, d_center)
            } else {
                let outer = smoothstep(0.42, 0.32, d_center);
                let core = smoothstep(0.12, 0.08, d_center);
                outer.max(core)
            }
        }
        // Punctuation-like marks: quote, raised dot, bullet, en dash, em dash.
        GlyphSet::Typography => {
            if density < 0.2 {
                smoothstep(0.45, 0.4, (cell.y - 0.7).abs())
                    * smoothstep(0.46, 0.42, (cell.x - 0.5).abs())
                    * 0.3
            } else if density < 0.4 {
                smoothstep(0.42, 0.35, (cell - vec2(0.5, 0.65)).length()) * 0.6
            } else if density < 0.6 {
                smoothstep(0.38, 0.28, d_center) * 0.8
            } else if density < 0.8 {
                smoothstep(0.12, 0.08, (cell.y - 0.5).abs())
                    * smoothstep(0.35, 0.25, (cell.x - 0.5).abs())
            } else {
                smoothstep(0.12, 0.08, (cell.y - 0.5).abs())
                    * smoothstep(0.42, 0.32, (cell.x - 0.5).abs())
            }
        }
        // Math-glyph marks: degree ring, plus-minus, diagonal cross, section
        // curves, copyright ring.
        GlyphSet::Symbols => {
            if density < 0.2 {
                let ring = (d_center - 0.15).abs();
                smoothstep(0.08, 0.05, ring) * 0.3
            } else if density < 0.4 {
                let horiz = smoothstep(0.12, 0.08, (cell.y - 0.5).abs())
                    * smoothstep(0.32, 0.22, (cell.x - 0.5).abs());
                let vert = smoothstep(0.12, 0.08, (cell.x - 0.5).abs())
                    * smoothstep(0.25, 0.15, (cell.y - 0.5).abs());
                horiz.max(vert) * 0.6
            } else if density < 0.6 {
                let diag1 = smoothstep(0.14, 0.1, (cell.x - cell.y).abs());
                let diag2 = smoothstep(0.14, 0.1, (cell.x - (1.0 - cell.y)).abs());
                diag1.max(diag2) * 0.8
            } else if density < 0.8 {
                let top = smoothstep(0.28, 0.2, (cell - vec2(0.5, 0.62)).length());
                let bottom = smoothstep(0.28, 0.2, (cell - vec2(0.5, 0.38)).length());
                top.max(bottom)
            } else {
                let ring = (d_center - 0.32).abs();
                smoothstep(0.08, 0.05, ring)
            }
        }
        // Structural lines: thin cross, diagonals, rule, thick cross, diamond.
        GlyphSet::Geometric => {
            if density < 0.2 {
                let horiz = smoothstep(0.12, 0.08, (cell.y - 0.5).abs())
                    * smoothstep(0.3, 0.2, (cell.x - 0.5).abs());
                let vert = smoothstep(0.12, 0.08, (cell.x - 0.5).abs())
                    * smoothstep(0.3, 0.2, (cell.y - 0.5).abs());
                horiz.max(vert) * 0.3
            } else if density < 0.4 {
                let diag1 = smoothstep(0.14, 0.1, (cell.x - cell.y).abs());
                let diag2 = smoothstep(0.14, 0.1, (cell.x - (1.0 - cell.y)).abs());
                diag1.max(diag2) * 0.6
            } else if density < 0.6 {
                smoothstep(0.12, 0.08, (cell.y - 0.5).abs()) * 0.8
            } else if density < 0.8 {
                let horiz = smoothstep(0.12, 0.08, (cell.y - 0.5).abs());
                let vert = smoothstep(0.12, 0.08, (cell.x - 0.5).abs());
                horiz.max(vert)
            } else {
                let taxicab = centered.x.abs() + centered.y.abs();
                let ring = (taxicab - 0.35).abs();
                smoothstep(0.1, 0.06, ring)
            }
        }
        // Heavier progression: dots, hash grid, double dots, solid disc.
        GlyphSet::Dense => {
            if density < 0.2 {
                smoothstep(0.42, 0.35, d_center) * 0.3
            } else if density < 0.4 {
                smoothstep(0.38, 0.28, d_center) * 0.6
            } else if density < 0.6 {
                let horiz = smoothstep(0.12, 0.08, (cell.y - 0.5).abs());
                let vert = smoothstep(0.12, 0.08, (cell.x - 0.5).abs());
                horiz.max(vert) * 0.8
            } else if density < 0.8 {
                let top = smoothstep(0.28, 0.2, (cell - vec2(0.5, 0.62)).length());
                let bottom = smoothstep(0.28, 0.2, (cell - vec2(0.5, 0.38)).length());
                top.max(bottom)
            } else {
                smoothstep(0.42, 0.3, d_center)
            }
        }
    }
}

/// Evaluates both glyph sets of a cross-fade at the same cell/density and
/// mixes by a smoothstepped blend, so a set change never pops.
pub fn glyph_mask_blended(
    grid_coord: Vec2,
    density: f32,
    sel: BlendedSelection<GlyphSet>,
) -> f32 {
    let current = glyph_mask(grid_coord, density, sel.current);
    let previous = glyph_mask(grid_coord, density, sel.previous);
    mix(previous, current, smoothstep(0.0, 1.0, sel.blend))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SETS: [GlyphSet; 5] = [
        GlyphSet::Minimal,
        GlyphSet::Typography,
        GlyphSet::Symbols,
        GlyphSet::Geometric,
        GlyphSet::Dense,
    ];

    // One density per tier after the 0.75 compression.
    const TIER_DENSITIES: [f32; 5] = [0.1, 0.35, 0.6, 0.9, 1.2];

    #[test]
    fn masks_stay_normalized_for_every_set_and_tier() {
        for set in ALL_SETS {
            for &density in &TIER_DENSITIES {
                for ix in 0..12 {
                    for iy in 0..12 {
                        let coord = vec2(ix as f32 / 12.0 + 3.0, iy as f32 / 12.0 + 7.0);
                        let mask = glyph_mask(coord, density, set);
                        assert!(
                            (0.0..=1.0).contains(&mask),
                            "{set} mask {mask} out of range at {coord:?} density {density}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn masks_are_deterministic() {
        let coord = vec2(18.4, 6.9);
        for set in ALL_SETS {
            assert_eq!(glyph_mask(coord, 0.5, set), glyph_mask(coord, 0.5, set));
        }
    }

    #[test]
    fn compression_excludes_the_heaviest_tier_below_full_density() {
        // 0.8 / 0.75 > 1.0: a full-range density of 1.0 still lands in the
        // fourth tier, so the heaviest mark needs inputs above the ramp.
        let probe = vec2(0.8, 0.5);
        let fourth = glyph_mask(probe, 1.0, GlyphSet::Minimal);
        let fifth = glyph_mask(probe, 1.1, GlyphSet::Minimal);
        assert!(fifth > fourth);
    }

    #[test]
    fn blend_endpoints_match_single_set_masks() {
        let coord = vec2(4.3, 9.8);
        let density = 0.55;
        let at_zero = glyph_mask_blended(
            coord,
            density,
            BlendedSelection::fading(GlyphSet::Minimal, GlyphSet::Dense, 0.0),
        );
        assert!((at_zero - glyph_mask(coord, density, GlyphSet::Minimal)).abs() < 1e-6);

        let at_one = glyph_mask_blended(
            coord,
            density,
            BlendedSelection::fading(GlyphSet::Minimal, GlyphSet::Dense, 1.0),
        );
        assert!((at_one - glyph_mask(coord, density, GlyphSet::Dense)).abs() < 1e-6);
    }

    #[test]
    fn blend_is_monotone_between_distinct_masks() {
        let coord = vec2(2.5, 2.5);
        let density = 0.9;
        let from = glyph_mask(coord, density, GlyphSet::Geometric);
        let to = glyph_mask(coord, density, GlyphSet::Minimal);
        let mut last = from;
        for step in 0..=20 {
            let blend = step as f32 / 20.0;
            let value = glyph_mask_blended(
                coord,
                density,
                BlendedSelection::fading(GlyphSet::Geometric, GlyphSet::Minimal, blend),
            );
            if to >= from {
                assert!(value + 1e-6 >= last);
            } else {
                assert!(value <= last + 1e-6);
            }
            last = value;
        }
    }
}
