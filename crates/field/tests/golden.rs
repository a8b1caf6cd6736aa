//! Golden baseline for the static snapshot scenario: a pure-red/green/blue
//! theme, the viewport-center pixel, time zero, no animation. The baseline
//! file is recorded on the first run and compared thereafter; delete it to
//! re-record after an intentional math change.

use std::fs;
use std::path::PathBuf;

use glam::{vec2, Vec2};
use serde::{Deserialize, Serialize};

use field::compose::{shade_pixel, LayerParams};
use field::glyph::glyph_mask;
use field::noise::sphere_field;
use field::{BlendedSelection, GlyphSet, NoiseKind};

const RESOLUTION: Vec2 = Vec2::new(1920.0, 1080.0);

#[derive(Debug, Serialize, Deserialize)]
struct Baseline {
    sphere_density: f32,
    minimal_alpha: f32,
    composed_color: [f32; 3],
    composed_alpha: f32,
}

fn baseline_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join("static_snapshot.json")
}

fn compute_baseline() -> Baseline {
    let center_uv = vec2(0.5, 0.5);
    // Aspect-corrected centered coordinate of the center pixel is the origin.
    let centered = Vec2::ZERO;
    let time = 0.0;

    let sphere_density = sphere_field(centered, time);
    let center_cell = center_uv * RESOLUTION / LayerParams::default().fine_spacing;
    let minimal_alpha = glyph_mask(center_cell, sphere_density, GlyphSet::Minimal);

    let palette = [
        glam::vec3(1.0, 0.0, 0.0),
        glam::vec3(0.0, 1.0, 0.0),
        glam::vec3(0.0, 0.0, 1.0),
    ];
    let shaded = shade_pixel(
        center_uv,
        RESOLUTION,
        time,
        &LayerParams::default(),
        &palette,
        BlendedSelection::steady(NoiseKind::Sphere, NoiseKind::Terrain),
        BlendedSelection::steady(GlyphSet::Minimal, GlyphSet::Dense),
    );

    Baseline {
        sphere_density,
        minimal_alpha,
        composed_color: shaded.color.to_array(),
        composed_alpha: shaded.alpha,
    }
}

#[test]
fn static_snapshot_matches_recorded_baseline() {
    let current = compute_baseline();

    // Structural invariants hold whether or not a baseline exists yet.
    assert!((0.3..=1.0).contains(&current.sphere_density));
    assert!((0.0..=1.0).contains(&current.minimal_alpha));
    assert!(current.composed_alpha >= field::compose::ALPHA_FLOOR);

    let path = baseline_path();
    if !path.exists() {
        fs::create_dir_all(path.parent().expect("baseline parent")).expect("create golden dir");
        let recorded = serde_json::to_string_pretty(&current).expect("serialize baseline");
        fs::write(&path, recorded).expect("record baseline");
        return;
    }

    let raw = fs::read_to_string(&path).expect("read baseline");
    let recorded: Baseline = serde_json::from_str(&raw).expect("parse baseline");

    let close = |a: f32, b: f32| (a - b).abs() < 1e-6;
    assert!(
        close(current.sphere_density, recorded.sphere_density),
        "sphere density drifted: {} vs {}",
        current.sphere_density,
        recorded.sphere_density
    );
    assert!(
        close(current.minimal_alpha, recorded.minimal_alpha),
        "minimal glyph alpha drifted: {} vs {}",
        current.minimal_alpha,
        recorded.minimal_alpha
    );
    for (i, (&a, &b)) in current
        .composed_color
        .iter()
        .zip(recorded.composed_color.iter())
        .enumerate()
    {
        assert!(close(a, b), "composed color channel {i} drifted: {a} vs {b}");
    }
    assert!(close(current.composed_alpha, recorded.composed_alpha));
}

#[test]
fn static_snapshot_is_reproducible_within_a_run() {
    let a = compute_baseline();
    let b = compute_baseline();
    assert_eq!(a.sphere_density, b.sphere_density);
    assert_eq!(a.minimal_alpha, b.minimal_alpha);
    assert_eq!(a.composed_color, b.composed_color);
    assert_eq!(a.composed_alpha, b.composed_alpha);
}
