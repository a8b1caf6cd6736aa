//! Procedural density fields.
//!
//! Four interchangeable noise families plus a small sparkle term, all pure
//! functions of a centered, aspect-corrected point and an elapsed-time
//! scalar. None of them translate their sampling domain over time: every
//! animation term modulates scale, rotation or phase so the fields pulse in
//! place instead of visibly scrolling.

use glam::{vec2, Vec2};

use crate::ops::{fract, mix, smoothstep};
use crate::{BlendedSelection, NoiseKind};

/// Weight of the sparkle term added on top of the blended field.
pub const SPARKLE_WEIGHT: f32 = 0.15;

/// Fract/dot scramble. Pure: the same input always hashes to the same value,
/// which keeps blob placement stable across frames and makes golden tests
/// possible.
pub fn hash(p: Vec2) -> f32 {
    let mut p = vec2(fract(p.x * 123.34), fract(p.y * 456.21));
    let k = p.dot(p + Vec2::splat(34.23));
    p += Vec2::splat(k);
    fract(p.x * p.y)
}

/// Bilinear value noise with a smoothstep fade between lattice points.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + vec2(1.0, 0.0));
    let c = hash(i + vec2(0.0, 1.0));
    let d = hash(i + vec2(1.0, 1.0));

    mix(mix(a, b, f.x), mix(c, d, f.x), f.y)
}

/// Four-octave fractal Brownian motion over [`value_noise`].
pub fn fbm(p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..4 {
        value += amplitude * value_noise(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value
}

/// Metaball field: five blobs whose radius, speed and ring position derive
/// from hashes of their index. The bounded contribution
/// `r^2 / (d^2 + r^2 * 0.5)` never blows up as the sample point approaches a
/// blob center, unlike a naive inverse-square field. Output in [0.3, 1.0].
pub fn sphere_field(centered: Vec2, t: f32) -> f32 {
    let mut total = 0.0;
    for i in 0..5 {
        let fi = i as f32;
        let seed = fi * 7.123;
        let size_variation = hash(vec2(seed, 1.0));
        let speed_variation = hash(vec2(seed, 2.0));
        let pos_variation = hash(vec2(seed, 3.0));
        let phase_offset = hash(vec2(seed, 4.0)) * 6.28;

        let base_radius = 0.15 + size_variation * 0.25;
        let growth_speed = 0.3 + speed_variation * 0.4;
        let growth = (t * growth_speed + phase_offset).sin() * 0.15;
        let active_radius = base_radius + growth;

        // Golden-angle spacing around a ring that itself breathes.
        let angle = phase_offset + fi * 2.4;
        let dist_from_origin = 0.2 + pos_variation * 0.3;
        let radial_pulse = (t * 0.2 + fi).sin() * 0.1;
        let ring_dist = dist_from_origin + radial_pulse;
        let center = vec2(angle.cos(), angle.sin()) * ring_dist;

        let dist_sq = (centered - center).length_squared();
        let radius_sq = active_radius * active_radius;
        let blob = radius_sq / (dist_sq + radius_sq * 0.5);
        total += smoothstep(0.0, 1.0, blob);
    }

    let density = smoothstep(0.2, 1.5, total * 0.35);
    density.clamp(0.3, 1.0)
}

/// Ring field: breathing ring radius and tube radius (out of phase), 6-lobe
/// angular waviness, and a radial pulse layered on top. Output in [0.3, 1.0].
pub fn torus_field(centered: Vec2, t: f32) -> f32 {
    let angle = centered.y.atan2(centered.x);
    let radius = centered.length();

    let ring_radius = 0.3 + (t * 0.4).sin() * 0.1;
    let tube_radius = 0.12 + (t * 0.5 + 1.57).sin() * 0.03;

    // Waviness evolves in place rather than rotating around the ring.
    let wave_phase = (t * 0.3).sin();
    let modulation = (angle * 6.0 + wave_phase).sin() * 0.04;

    let dist_from_ring = (radius - ring_radius).abs();
    let mut torus = 1.0 - (dist_from_ring - modulation) / tube_radius;
    torus += (radius * 4.0 + t * 0.6).sin() * 0.1;

    torus.clamp(0.3, 1.0)
}

/// Standing-wave interference. Time modulates frequency and phase, never a
/// scroll offset, so the pattern pulses without drifting in one direction.
/// Output in [0.25, 0.75].
pub fn wave_field(centered: Vec2, t: f32) -> f32 {
    let freq1 = 3.0 + (t * 0.3).sin() * 0.5;
    let freq2 = 3.0 + (t * 0.25).cos() * 0.5;

    let wave1 = (centered.x * freq1).sin() * (centered.y * freq2).cos();
    let wave2 = ((centered.x + centered.y) * 2.5 + (t * 0.4).sin() * 0.5).sin();

    (wave1 + wave2) * 0.125 + 0.5
}

/// Fractal terrain. Octave one breathes its sampling scale, octave two
/// rotates very slowly, octave three pulses at a faster phase, so the
/// terrain evolves organically with no translation. Output in [0.35, 1.0].
pub fn terrain_field(centered: Vec2, t: f32) -> f32 {
    let scale1 = 1.0 + (t * 0.2).sin() * 0.3;
    let n1 = fbm(centered * 0.6 * scale1) * 0.4;

    let angle = t * 0.1;
    let (sin_a, cos_a) = angle.sin_cos();
    let rotated = vec2(
        centered.x * cos_a - centered.y * sin_a,
        centered.x * sin_a + centered.y * cos_a,
    );
    let n2 = fbm(rotated) * 0.3;

    let phase = (t * 0.3).sin();
    let n3 = value_noise(centered * (1.5 + phase * 0.2)) * 0.2;

    let terrain = smoothstep(0.2, 0.8, n1 + n2 + n3 + 0.2);
    terrain.max(0.35)
}

/// Three hash-driven flicker points, independent of the active noise family.
pub fn sparkle_field(p: Vec2, t: f32) -> f32 {
    let mut glints = 0.0;
    for i in 0..3 {
        let fi = i as f32;
        let pos = vec2(
            hash(vec2(fi * 7.123 + t * 0.3, 0.0)),
            hash(vec2(0.0, fi * 5.456 + t * 0.3)),
        ) - Vec2::splat(0.5);
        let dist = (p - pos).length();
        glints += smoothstep(0.05, 0.02, dist);
    }
    glints * 0.3
}

/// Evaluates a single noise family.
pub fn noise_for_kind(centered: Vec2, t: f32, kind: NoiseKind) -> f32 {
    match kind {
        NoiseKind::Sphere => sphere_field(centered, t),
        NoiseKind::Torus => torus_field(centered, t),
        NoiseKind::Wave => wave_field(centered, t),
        NoiseKind::Terrain => terrain_field(centered, t),
    }
}

/// Cross-faded field density: both the outgoing and incoming families are
/// evaluated and mixed by a smoothstepped blend, then the sparkle term is
/// added at [`SPARKLE_WEIGHT`]. The sparkle is present regardless of family,
/// which carries visual continuity across transitions.
pub fn field_density(centered: Vec2, t: f32, sel: BlendedSelection<NoiseKind>) -> f32 {
    let current = noise_for_kind(centered, t, sel.current);
    let previous = noise_for_kind(centered, t, sel.previous);
    let base = mix(previous, current, smoothstep(0.0, 1.0, sel.blend));
    base + sparkle_field(centered, t) * SPARKLE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Vec2> {
        let mut points = Vec::new();
        for ix in -4..=4 {
            for iy in -4..=4 {
                points.push(vec2(ix as f32 * 0.22, iy as f32 * 0.22));
            }
        }
        points
    }

    #[test]
    fn fields_are_deterministic() {
        for kind in NoiseKind::CYCLE {
            for &p in &sample_points() {
                for t in [0.0, 17.3, 142.9] {
                    let a = noise_for_kind(p, t, kind);
                    let b = noise_for_kind(p, t, kind);
                    assert_eq!(a, b, "{kind:?} must be pure at {p:?} t={t}");
                }
            }
        }
    }

    #[test]
    fn bounded_fields_stay_in_documented_ranges() {
        for &p in &sample_points() {
            for t in [0.0, 3.7, 55.5, 149.0] {
                let sphere = sphere_field(p, t);
                assert!((0.3..=1.0).contains(&sphere), "sphere {sphere} at {p:?}");
                let torus = torus_field(p, t);
                assert!((0.3..=1.0).contains(&torus), "torus {torus} at {p:?}");
                let terrain = terrain_field(p, t);
                assert!((0.3..=1.0).contains(&terrain), "terrain {terrain} at {p:?}");
                let wave = wave_field(p, t);
                assert!((0.25..=0.75).contains(&wave), "wave {wave} at {p:?}");
            }
        }
    }

    #[test]
    fn blend_endpoints_match_pure_evaluations() {
        let p = vec2(0.13, -0.28);
        let t = 61.4;
        let sparkle = sparkle_field(p, t) * SPARKLE_WEIGHT;

        let at_zero = field_density(
            p,
            t,
            BlendedSelection::fading(NoiseKind::Sphere, NoiseKind::Wave, 0.0),
        );
        assert!((at_zero - (sphere_field(p, t) + sparkle)).abs() < 1e-6);

        let at_one = field_density(
            p,
            t,
            BlendedSelection::fading(NoiseKind::Sphere, NoiseKind::Wave, 1.0),
        );
        assert!((at_one - (wave_field(p, t) + sparkle)).abs() < 1e-6);
    }

    #[test]
    fn blend_is_continuous() {
        // Adjacent blend samples must not jump: the fade is a smoothstepped
        // lerp between two fixed endpoints, so steps of 0.01 can move the
        // output by at most ~1.5% of the endpoint gap.
        let p = vec2(-0.41, 0.07);
        let t = 12.0;
        let gap = (torus_field(p, t) - terrain_field(p, t)).abs();
        let mut last = None;
        for step in 0..=100 {
            let blend = step as f32 / 100.0;
            let value = field_density(
                p,
                t,
                BlendedSelection::fading(NoiseKind::Terrain, NoiseKind::Torus, blend),
            );
            if let Some(prev) = last {
                let delta: f32 = value - prev;
                assert!(
                    delta.abs() <= gap * 0.02 + 1e-6,
                    "jump of {delta} at blend {blend}"
                );
            }
            last = Some(value);
        }
    }

    #[test]
    fn hash_is_stable_for_negative_inputs() {
        let a = hash(vec2(-3.7, 2.2));
        let b = hash(vec2(-3.7, 2.2));
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a));
    }
}
