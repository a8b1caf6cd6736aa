//! Scalar helpers matching GLSL semantics.
//!
//! `fract` is floor-based (GLSL), not trunc-based (`f32::fract`), which
//! matters for negative inputs. `smoothstep` tolerates inverted edges the
//! same way GPU implementations do; several mask tables rely on that.

use glam::{Vec2, Vec3};

pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

pub(crate) fn fract2(v: Vec2) -> Vec2 {
    Vec2::new(fract(v.x), fract(v.y))
}

pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub(crate) fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fract_is_floor_based() {
        assert!((fract(1.25) - 0.25).abs() < 1e-6);
        assert!((fract(-1.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn smoothstep_handles_inverted_edges() {
        // Falling edge: full ink inside the inner radius, none outside.
        assert_eq!(smoothstep(0.05, 0.02, 0.01), 1.0);
        assert_eq!(smoothstep(0.05, 0.02, 0.10), 0.0);
        let mid = smoothstep(0.05, 0.02, 0.035);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mix_is_linear() {
        assert_eq!(mix(2.0, 4.0, 0.5), 3.0);
        // The saturation boost extrapolates past t = 1.
        assert_eq!(mix(0.5, 1.0, 1.8), 1.4);
    }
}
