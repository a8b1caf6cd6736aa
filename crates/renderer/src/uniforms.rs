use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use winit::dpi::PhysicalSize;

use crate::types::RenderParameters;
use scheduler::CycleSnapshot;

/// CPU-side mirror of the shader's uniform block.
///
/// Every member is a `vec4` slot, which sidesteps std140 vec3 padding rules
/// entirely: the GLSL block in [`crate::shader`] must declare the same eight
/// slots in the same order. Selector enums travel as floats and are rounded
/// back to ints in the shader.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct FieldUniforms {
    /// xy = resolution in pixels, z = time in seconds, w = master opacity.
    pub surface: [f32; 4],
    /// Fine-gradient start color.
    pub color_a: [f32; 4],
    /// Shared middle color.
    pub color_b: [f32; 4],
    /// Coarse-gradient end color.
    pub color_c: [f32; 4],
    /// x = fine spacing, y = coarse spacing, z = fine opacity, w = coarse opacity.
    pub grid: [f32; 4],
    /// x = fine speed, y = coarse speed.
    pub speed: [f32; 4],
    /// x = current noise kind, y = previous, z = blend.
    pub noise_sel: [f32; 4],
    /// x = current glyph set, y = previous, z = blend.
    pub glyph_sel: [f32; 4],
}

unsafe impl Zeroable for FieldUniforms {}
unsafe impl Pod for FieldUniforms {}

impl FieldUniforms {
    pub fn new(size: PhysicalSize<u32>, params: &RenderParameters, palette: &[Vec3; 3]) -> Self {
        let color = |c: Vec3| [c.x, c.y, c.z, 0.0];
        Self {
            surface: [
                size.width.max(1) as f32,
                size.height.max(1) as f32,
                0.0,
                params.opacity,
            ],
            color_a: color(palette[0]),
            color_b: color(palette[1]),
            color_c: color(palette[2]),
            grid: [
                params.layers.fine_spacing,
                params.layers.coarse_spacing,
                params.layers.fine_opacity,
                params.layers.coarse_opacity,
            ],
            speed: [params.layers.fine_speed, params.layers.coarse_speed, 0.0, 0.0],
            noise_sel: [0.0, 0.0, 1.0, 0.0],
            glyph_sel: [
                params.glyph_set.shader_index() as f32,
                params.glyph_set.shader_index() as f32,
                1.0,
                0.0,
            ],
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.surface[0] = width.max(1.0);
        self.surface[1] = height.max(1.0);
    }

    pub fn set_time(&mut self, time: f32) {
        self.surface[2] = time;
    }

    pub fn set_cycle(&mut self, cycle: &CycleSnapshot) {
        self.noise_sel[0] = cycle.noise.current.shader_index() as f32;
        self.noise_sel[1] = cycle.noise.previous.shader_index() as f32;
        self.noise_sel[2] = cycle.noise.blend;
        self.glyph_sel[0] = cycle.glyph.current.shader_index() as f32;
        self.glyph_sel[1] = cycle.glyph.previous.shader_index() as f32;
        self.glyph_sel[2] = cycle.glyph.blend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::{BlendedSelection, GlyphSet, NoiseKind};
    use glam::vec3;
    use std::mem::{align_of, size_of};
    use tierconfig::{CapabilityTier, TierDefaults};

    fn params() -> RenderParameters {
        RenderParameters::resolve(
            &crate::types::RenderOverrides::default(),
            &TierDefaults::builtin(CapabilityTier::Medium),
        )
    }

    /// The GLSL block declares eight consecutive vec4 slots; the mirror must
    /// lay out identically.
    #[test]
    fn uniforms_follow_std140_layout() {
        let uniforms = FieldUniforms::new(
            PhysicalSize::new(1920, 1080),
            &params(),
            &[vec3(1.0, 0.0, 0.0); 3],
        );
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<FieldUniforms>(), 16);
        assert_eq!(size_of::<FieldUniforms>(), 128);
        assert_eq!((&uniforms.surface as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.color_a as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.color_b as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.color_c as *const _ as usize) - base, 48);
        assert_eq!((&uniforms.grid as *const _ as usize) - base, 64);
        assert_eq!((&uniforms.speed as *const _ as usize) - base, 80);
        assert_eq!((&uniforms.noise_sel as *const _ as usize) - base, 96);
        assert_eq!((&uniforms.glyph_sel as *const _ as usize) - base, 112);
    }

    #[test]
    fn cycle_snapshot_maps_to_selector_slots() {
        let mut uniforms = FieldUniforms::new(
            PhysicalSize::new(640, 480),
            &params(),
            &[vec3(0.0, 0.0, 0.0); 3],
        );
        let cycle = CycleSnapshot {
            noise: BlendedSelection::fading(NoiseKind::Sphere, NoiseKind::Torus, 0.25),
            glyph: BlendedSelection::fading(GlyphSet::Minimal, GlyphSet::Symbols, 0.25),
        };
        uniforms.set_cycle(&cycle);
        assert_eq!(uniforms.noise_sel[0], 1.0); // torus incoming
        assert_eq!(uniforms.noise_sel[1], 0.0); // sphere outgoing
        assert_eq!(uniforms.noise_sel[2], 0.25);
        assert_eq!(uniforms.glyph_sel[0], 2.0); // symbols incoming
        assert_eq!(uniforms.glyph_sel[2], 0.25);
    }

    #[test]
    fn resolution_floor_prevents_zero_extent() {
        let mut uniforms = FieldUniforms::new(
            PhysicalSize::new(800, 600),
            &params(),
            &[vec3(0.0, 0.0, 0.0); 3],
        );
        uniforms.set_resolution(0.0, 0.0);
        assert_eq!(uniforms.surface[0], 1.0);
        assert_eq!(uniforms.surface[1], 1.0);
    }
}
