//! CPU still rendering.
//!
//! Runs the reference per-pixel math from the `field` crate over a full
//! frame. This is the offline/export path and the golden-frame generator;
//! interactive rendering always goes through the GPU strategy.

use glam::{vec2, Vec3};
use image::{Rgba, RgbaImage};

use crate::types::RenderParameters;
use field::compose::shade_pixel;
use scheduler::CycleSnapshot;

/// Renders one frame at the given size (already scaled by the tier's
/// render scale, if any).
pub(crate) fn render_image(
    size: (u32, u32),
    time: f32,
    params: &RenderParameters,
    palette: &[Vec3; 3],
    cycle: &CycleSnapshot,
) -> RgbaImage {
    let width = size.0.max(1);
    let height = size.1.max(1);
    let resolution = vec2(width as f32, height as f32);

    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        // Image rows run top-down; shader UVs bottom-up.
        let uv = vec2(
            (x as f32 + 0.5) / resolution.x,
            1.0 - (y as f32 + 0.5) / resolution.y,
        );
        let shaded = shade_pixel(
            uv,
            resolution,
            time,
            &params.layers,
            palette,
            cycle.noise,
            cycle.glyph,
        );

        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        *pixel = Rgba([
            to_byte(shaded.color.x),
            to_byte(shaded.color.y),
            to_byte(shaded.color.z),
            to_byte(shaded.alpha * params.opacity),
        ]);
    }

    image
}
