//! Full-frame pixel composition.
//!
//! [`shade_pixel`] implements the complete per-pixel program: two overlaid
//! grids (fine and coarse), noise-driven chromatic aberration sampled per
//! color channel, gradient color mixing along density, a saturation boost,
//! and layer composition with a global alpha floor. The fragment shader in
//! the renderer crate is a direct port of this function.

use glam::{vec2, vec3, Vec2, Vec3};

use crate::glyph::{glyph_mask, glyph_mask_blended};
use crate::noise::{field_density, value_noise};
use crate::ops::{mix3, smoothstep};
use crate::{BlendedSelection, GlyphSet, NoiseKind};

/// Base chromatic-aberration offset in pixels before noise modulation.
pub const BASE_ABERRATION_PX: f32 = 3.0;
/// Saturation boost factor applied by pulling mixes away from mid-gray.
pub const SATURATION_BOOST: f32 = 1.8;
/// The composed alpha never drops below this, so the layer never vanishes.
pub const ALPHA_FLOOR: f32 = 0.1;
/// Coordinate scale of the coarse grid's noise lookup.
pub const COARSE_NOISE_SCALE: f32 = 1.2;
/// Density weighting applied to the coarse grid before mask lookup.
pub const COARSE_DENSITY_WEIGHT: f32 = 0.7;

/// Per-layer grid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerParams {
    /// Pixel period of the fine grid.
    pub fine_spacing: f32,
    /// Pixel period of the coarse grid.
    pub coarse_spacing: f32,
    /// Base alpha of the fine layer.
    pub fine_opacity: f32,
    /// Base alpha of the coarse layer.
    pub coarse_opacity: f32,
    /// Time multiplier of the fine layer.
    pub fine_speed: f32,
    /// Time multiplier of the coarse layer.
    pub coarse_speed: f32,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            fine_spacing: 12.0,
            coarse_spacing: 24.0,
            fine_opacity: 0.6,
            coarse_opacity: 0.4,
            fine_speed: 0.5,
            coarse_speed: 1.5,
        }
    }
}

/// Output of [`shade_pixel`]: straight-alpha color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shaded {
    pub color: Vec3,
    pub alpha: f32,
}

struct LayerSample {
    fine_density: f32,
    fine_pattern: f32,
    coarse_density: f32,
    coarse_pattern: f32,
}

fn sample_layers(
    uv: Vec2,
    resolution: Vec2,
    time: f32,
    layers: &LayerParams,
    noise: BlendedSelection<NoiseKind>,
    glyph: BlendedSelection<GlyphSet>,
) -> LayerSample {
    let aspect = vec2(resolution.x / resolution.y, 1.0);
    let centered = (uv - Vec2::splat(0.5)) * aspect;

    let fine_grid = uv * resolution / layers.fine_spacing;
    let fine_density = field_density(centered, time * layers.fine_speed, noise);
    let fine_pattern = glyph_mask_blended(fine_grid, fine_density, glyph);

    let coarse_grid = uv * resolution / layers.coarse_spacing;
    let coarse_density = field_density(
        centered * COARSE_NOISE_SCALE,
        time * layers.coarse_speed,
        noise,
    );
    // The coarse layer is a constant structural accent: always geometric,
    // independent of the cycling set on the fine grid.
    let coarse_pattern = glyph_mask(
        coarse_grid,
        coarse_density * COARSE_DENSITY_WEIGHT,
        GlyphSet::Geometric,
    );

    LayerSample {
        fine_density,
        fine_pattern,
        coarse_density,
        coarse_pattern,
    }
}

struct ChannelOut {
    color: Vec3,
    alpha: f32,
}

fn compose_channel(sample: &LayerSample, layers: &LayerParams, palette: &[Vec3; 3]) -> ChannelOut {
    let fine_mix = mix3(palette[0], palette[1], sample.fine_density);
    let coarse_mix = mix3(palette[1], palette[2], sample.coarse_density);

    let gray = Vec3::splat(0.5);
    let fine_mix = mix3(gray, fine_mix, SATURATION_BOOST);
    let coarse_mix = mix3(gray, coarse_mix, SATURATION_BOOST);

    let fine_alpha = (sample.fine_pattern * (layers.fine_opacity + sample.fine_density * 0.4))
        .max(sample.fine_pattern * 0.3);
    let coarse_alpha = (sample.coarse_pattern
        * (layers.coarse_opacity + sample.coarse_density * 0.6))
        .max(sample.coarse_pattern * 0.2);

    // Coarse-layer dominance decides how far the channel leans toward the
    // structural accent color.
    let coarse_strength = smoothstep(0.2, 0.6, coarse_alpha);
    let color = mix3(fine_mix, coarse_mix, coarse_strength);
    let alpha = (fine_alpha * 0.8).max(coarse_alpha);

    ChannelOut { color, alpha }
}

/// Shades one pixel.
///
/// `uv` is the normalized position in [0, 1]²; `resolution` the surface size
/// in pixels. Each color channel samples at a noise-displaced position: red
/// at `-offset`, green centered, blue at `+offset`, which is what produces
/// the chromatic fringe. The returned color may exceed [0, 1] because of the
/// saturation boost; clamp at the output stage.
pub fn shade_pixel(
    uv: Vec2,
    resolution: Vec2,
    time: f32,
    layers: &LayerParams,
    palette: &[Vec3; 3],
    noise: BlendedSelection<NoiseKind>,
    glyph: BlendedSelection<GlyphSet>,
) -> Shaded {
    // Aberration direction and magnitude are themselves animated: two
    // decorrelated noise lookups remapped to [-1, 1] scale the base offset.
    let nx = value_noise(uv * 8.0 + Vec2::splat(time * 0.05));
    let ny = value_noise(uv * 8.0 + vec2(100.0, 0.0) + Vec2::splat(time * 0.05));
    let noise_offset = vec2(nx, ny) * 2.0 - Vec2::splat(1.0);
    let aberration =
        (Vec2::splat(BASE_ABERRATION_PX) / resolution) * (Vec2::splat(1.0) + noise_offset * 0.5);

    let red_sample = sample_layers(uv - aberration, resolution, time, layers, noise, glyph);
    let green_sample = sample_layers(uv, resolution, time, layers, noise, glyph);
    let blue_sample = sample_layers(uv + aberration, resolution, time, layers, noise, glyph);

    let red = compose_channel(&red_sample, layers, palette);
    let green = compose_channel(&green_sample, layers, palette);
    let blue = compose_channel(&blue_sample, layers, palette);

    let color = vec3(red.color.x, green.color.y, blue.color.z);
    let alpha = (red.alpha + green.alpha + blue.alpha) / 3.0;

    Shaded {
        color,
        alpha: alpha.max(ALPHA_FLOOR),
    }
}
