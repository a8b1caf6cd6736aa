//! Embedded GLSL programs.
//!
//! The fragment shader is a direct port of the reference math in the
//! `field` crate: same functions, same constants, same clamps. Any change
//! here must land in `field` as well (and vice versa); the CPU reference
//! is what the golden tests pin down.

use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Fullscreen-triangle vertex shader.
pub(crate) const VERTEX_SOURCE: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Per-pixel field synthesis, glyph masking and channel composition.
pub(crate) const FRAGMENT_SOURCE: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform FieldParams {
    vec4 surface;    // xy = resolution px, z = time s, w = master opacity
    vec4 color_a;
    vec4 color_b;
    vec4 color_c;
    vec4 grid;       // x = fine spacing, y = coarse spacing, z/w = layer opacities
    vec4 speed;      // x = fine speed, y = coarse speed
    vec4 noise_sel;  // x = current kind, y = previous kind, z = blend
    vec4 glyph_sel;  // x = current set, y = previous set, z = blend
} params;

float hash_scramble(vec2 p) {
    p = fract(p * vec2(123.34, 456.21));
    p += dot(p, p + 34.23);
    return fract(p.x * p.y);
}

float value_noise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    f = f * f * (3.0 - 2.0 * f);

    float a = hash_scramble(i);
    float b = hash_scramble(i + vec2(1.0, 0.0));
    float c = hash_scramble(i + vec2(0.0, 1.0));
    float d = hash_scramble(i + vec2(1.0, 1.0));

    return mix(mix(a, b, f.x), mix(c, d, f.x), f.y);
}

float fbm(vec2 p) {
    float value = 0.0;
    float amplitude = 0.5;
    float frequency = 1.0;
    for (int i = 0; i < 4; i++) {
        value += amplitude * value_noise(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    return value;
}

// Five metaballs on a breathing golden-angle ring. The bounded formula
// r^2 / (d^2 + r^2 * 0.5) keeps contributions finite near blob centers.
float sphere_field(vec2 centered, float t) {
    float total = 0.0;
    for (int i = 0; i < 5; i++) {
        float fi = float(i);
        float seed = fi * 7.123;
        float size_variation = hash_scramble(vec2(seed, 1.0));
        float speed_variation = hash_scramble(vec2(seed, 2.0));
        float pos_variation = hash_scramble(vec2(seed, 3.0));
        float phase_offset = hash_scramble(vec2(seed, 4.0)) * 6.28;

        float base_radius = 0.15 + size_variation * 0.25;
        float growth_speed = 0.3 + speed_variation * 0.4;
        float growth = sin(t * growth_speed + phase_offset) * 0.15;
        float active_radius = base_radius + growth;

        float angle = phase_offset + fi * 2.4;
        float dist_from_origin = 0.2 + pos_variation * 0.3;
        float radial_pulse = sin(t * 0.2 + fi) * 0.1;
        float ring_dist = dist_from_origin + radial_pulse;
        vec2 center = vec2(cos(angle), sin(angle)) * ring_dist;

        vec2 offset = centered - center;
        float dist_sq = dot(offset, offset);
        float radius_sq = active_radius * active_radius;
        float blob = radius_sq / (dist_sq + radius_sq * 0.5);
        total += smoothstep(0.0, 1.0, blob);
    }

    float density = smoothstep(0.2, 1.5, total * 0.35);
    return clamp(density, 0.3, 1.0);
}

// Breathing ring with angular waviness and a radial pulse.
float torus_field(vec2 centered, float t) {
    float angle = atan(centered.y, centered.x);
    float radius = length(centered);

    float ring_radius = 0.3 + sin(t * 0.4) * 0.1;
    float tube_radius = 0.12 + sin(t * 0.5 + 1.57) * 0.03;

    float wave_phase = sin(t * 0.3);
    float modulation = sin(angle * 6.0 + wave_phase) * 0.04;

    float dist_from_ring = abs(radius - ring_radius);
    float torus = 1.0 - (dist_from_ring - modulation) / tube_radius;
    torus += sin(radius * 4.0 + t * 0.6) * 0.1;

    return clamp(torus, 0.3, 1.0);
}

// Standing-wave interference; time modulates frequency and phase only.
float wave_field(vec2 centered, float t) {
    float freq1 = 3.0 + sin(t * 0.3) * 0.5;
    float freq2 = 3.0 + cos(t * 0.25) * 0.5;

    float wave1 = sin(centered.x * freq1) * cos(centered.y * freq2);
    float wave2 = sin((centered.x + centered.y) * 2.5 + sin(t * 0.4) * 0.5);

    return (wave1 + wave2) * 0.125 + 0.5;
}

// Three octaves: breathing scale, slow rotation, faster-phase pulse.
float terrain_field(vec2 centered, float t) {
    float scale1 = 1.0 + sin(t * 0.2) * 0.3;
    float n1 = fbm(centered * 0.6 * scale1) * 0.4;

    float angle = t * 0.1;
    vec2 rotated = vec2(
        centered.x * cos(angle) - centered.y * sin(angle),
        centered.x * sin(angle) + centered.y * cos(angle)
    );
    float n2 = fbm(rotated) * 0.3;

    float phase = sin(t * 0.3);
    float n3 = value_noise(centered * (1.5 + phase * 0.2)) * 0.2;

    float terrain = smoothstep(0.2, 0.8, n1 + n2 + n3 + 0.2);
    return max(0.35, terrain);
}

float sparkle_field(vec2 p, float t) {
    float glints = 0.0;
    for (int i = 0; i < 3; i++) {
        float fi = float(i);
        vec2 pos = vec2(
            hash_scramble(vec2(fi * 7.123 + t * 0.3, 0.0)),
            hash_scramble(vec2(0.0, fi * 5.456 + t * 0.3))
        ) - 0.5;
        float dist = length(p - pos);
        glints += smoothstep(0.05, 0.02, dist);
    }
    return glints * 0.3;
}

float noise_for_kind(vec2 centered, float t, int kind) {
    if (kind == 0) return sphere_field(centered, t);
    else if (kind == 1) return torus_field(centered, t);
    else if (kind == 2) return wave_field(centered, t);
    else if (kind == 3) return terrain_field(centered, t);
    return 0.5;
}

float field_density(vec2 centered, float t) {
    int current = int(params.noise_sel.x + 0.5);
    int previous = int(params.noise_sel.y + 0.5);
    float d_current = noise_for_kind(centered, t, current);
    float d_previous = noise_for_kind(centered, t, previous);
    float base = mix(d_previous, d_current, smoothstep(0.0, 1.0, params.noise_sel.z));
    return base + sparkle_field(centered, t) * 0.15;
}

// Density is compressed to 0.75 of its range (drops the two heaviest marks
// of a full ramp), then bucketed into five tiers per set.
float glyph_mask(vec2 grid_coord, float density, int glyph_set) {
    density = density * 0.75;

    vec2 cell = fract(grid_coord);
    vec2 centered = cell - vec2(0.5);
    float d_center = length(centered);
    float pattern = 0.0;

    if (glyph_set == 0) {
        // Minimal: dot progression.
        if (density < 0.2) {
            pattern = smoothstep(0.45, 0.38, d_center) * 0.3;
        } else if (density < 0.4) {
            pattern = smoothstep(0.42, 0.32, d_center) * 0.6;
        } else if (density < 0.6) {
            pattern = smoothstep(0.38, 0.28, d_center) * 0.8;
        } else if (density < 0.8) {
            pattern = smoothstep(0.4, 0.28, d_center);
        } else {
            float outer = smoothstep(0.42, 0.32, d_center);
            float core = smoothstep(0.12, 0.08, d_center);
            pattern = max(outer, core);
        }
    } else if (glyph_set == 1) {
        // Typography: punctuation-like marks.
        if (density < 0.2) {
            pattern = smoothstep(0.45, 0.4, abs(cell.y - 0.7))
                * smoothstep(0.46, 0.42, abs(cell.x - 0.5)) * 0.3;
        } else if (density < 0.4) {
            pattern = smoothstep(0.42, 0.35, length(cell - vec2(0.5, 0.65))) * 0.6;
        } else if (density < 0.6) {
            pattern = smoothstep(0.38, 0.28, d_center) * 0.8;
        } else if (density < 0.8) {
            pattern = smoothstep(0.12, 0.08, abs(cell.y - 0.5))
                * smoothstep(0.35, 0.25, abs(cell.x - 0.5));
        } else {
            pattern = smoothstep(0.12, 0.08, abs(cell.y - 0.5))
                * smoothstep(0.42, 0.32, abs(cell.x - 0.5));
        }
    } else if (glyph_set == 2) {
        // Symbols: math-glyph marks.
        if (density < 0.2) {
            float ring = abs(d_center - 0.15);
            pattern = smoothstep(0.08, 0.05, ring) * 0.3;
        } else if (density < 0.4) {
            float horiz = smoothstep(0.12, 0.08, abs(cell.y - 0.5))
                * smoothstep(0.32, 0.22, abs(cell.x - 0.5));
            float vert = smoothstep(0.12, 0.08, abs(cell.x - 0.5))
                * smoothstep(0.25, 0.15, abs(cell.y - 0.5));
            pattern = max(horiz, vert) * 0.6;
        } else if (density < 0.6) {
            float diag1 = smoothstep(0.14, 0.1, abs(cell.x - cell.y));
            float diag2 = smoothstep(0.14, 0.1, abs(cell.x - (1.0 - cell.y)));
            pattern = max(diag1, diag2) * 0.8;
        } else if (density < 0.8) {
            float top = smoothstep(0.28, 0.2, length(cell - vec2(0.5, 0.62)));
            float bottom = smoothstep(0.28, 0.2, length(cell - vec2(0.5, 0.38)));
            pattern = max(top, bottom);
        } else {
            float ring = abs(d_center - 0.32);
            pattern = smoothstep(0.08, 0.05, ring);
        }
    } else if (glyph_set == 3) {
        // Geometric: structural lines.
        if (density < 0.2) {
            float horiz = smoothstep(0.12, 0.08, abs(cell.y - 0.5))
                * smoothstep(0.3, 0.2, abs(cell.x - 0.5));
            float vert = smoothstep(0.12, 0.08, abs(cell.x - 0.5))
                * smoothstep(0.3, 0.2, abs(cell.y - 0.5));
            pattern = max(horiz, vert) * 0.3;
        } else if (density < 0.4) {
            float diag1 = smoothstep(0.14, 0.1, abs(cell.x - cell.y));
            float diag2 = smoothstep(0.14, 0.1, abs(cell.x - (1.0 - cell.y)));
            pattern = max(diag1, diag2) * 0.6;
        } else if (density < 0.6) {
            pattern = smoothstep(0.12, 0.08, abs(cell.y - 0.5)) * 0.8;
        } else if (density < 0.8) {
            float horiz = smoothstep(0.12, 0.08, abs(cell.y - 0.5));
            float vert = smoothstep(0.12, 0.08, abs(cell.x - 0.5));
            pattern = max(horiz, vert);
        } else {
            float taxicab = abs(centered.x) + abs(centered.y);
            float ring = abs(taxicab - 0.35);
            pattern = smoothstep(0.1, 0.06, ring);
        }
    } else if (glyph_set == 4) {
        // Dense: heavier progression.
        if (density < 0.2) {
            pattern = smoothstep(0.42, 0.35, d_center) * 0.3;
        } else if (density < 0.4) {
            pattern = smoothstep(0.38, 0.28, d_center) * 0.6;
        } else if (density < 0.6) {
            float horiz = smoothstep(0.12, 0.08, abs(cell.y - 0.5));
            float vert = smoothstep(0.12, 0.08, abs(cell.x - 0.5));
            pattern = max(horiz, vert) * 0.8;
        } else if (density < 0.8) {
            float top = smoothstep(0.28, 0.2, length(cell - vec2(0.5, 0.62)));
            float bottom = smoothstep(0.28, 0.2, length(cell - vec2(0.5, 0.38)));
            pattern = max(top, bottom);
        } else {
            pattern = smoothstep(0.42, 0.3, d_center);
        }
    }

    return pattern;
}

float glyph_mask_blended(vec2 grid_coord, float density) {
    int current = int(params.glyph_sel.x + 0.5);
    int previous = int(params.glyph_sel.y + 0.5);
    float m_current = glyph_mask(grid_coord, density, current);
    float m_previous = glyph_mask(grid_coord, density, previous);
    return mix(m_previous, m_current, smoothstep(0.0, 1.0, params.glyph_sel.z));
}

// x = fine density, y = fine pattern, z = coarse density, w = coarse pattern.
vec4 sample_layers(vec2 uv) {
    vec2 aspect = vec2(params.surface.x / params.surface.y, 1.0);
    vec2 centered = (uv - 0.5) * aspect;
    float t = params.surface.z;

    vec2 fine_grid = uv * params.surface.xy / params.grid.x;
    float fine_density = field_density(centered, t * params.speed.x);
    float fine_pattern = glyph_mask_blended(fine_grid, fine_density);

    vec2 coarse_grid = uv * params.surface.xy / params.grid.y;
    float coarse_density = field_density(centered * 1.2, t * params.speed.y);
    // The coarse layer is a constant structural accent: always geometric.
    float coarse_pattern = glyph_mask(coarse_grid, coarse_density * 0.7, 3);

    return vec4(fine_density, fine_pattern, coarse_density, coarse_pattern);
}

vec4 compose_channel(vec4 s) {
    vec3 fine_mix = mix(params.color_a.rgb, params.color_b.rgb, s.x);
    vec3 coarse_mix = mix(params.color_b.rgb, params.color_c.rgb, s.z);

    vec3 gray = vec3(0.5);
    fine_mix = mix(gray, fine_mix, 1.8);
    coarse_mix = mix(gray, coarse_mix, 1.8);

    float fine_alpha = max(s.y * (params.grid.z + s.x * 0.4), s.y * 0.3);
    float coarse_alpha = max(s.w * (params.grid.w + s.z * 0.6), s.w * 0.2);

    float coarse_strength = smoothstep(0.2, 0.6, coarse_alpha);
    vec3 color = mix(fine_mix, coarse_mix, coarse_strength);
    float alpha = max(fine_alpha * 0.8, coarse_alpha);
    return vec4(color, alpha);
}

void main() {
    vec2 uv = v_uv;
    float t = params.surface.z;

    // Noise-driven chromatic aberration: direction and magnitude animate.
    float nx = value_noise(uv * 8.0 + t * 0.05);
    float ny = value_noise(uv * 8.0 + vec2(100.0, 0.0) + t * 0.05);
    vec2 noise_offset = vec2(nx, ny) * 2.0 - 1.0;
    vec2 aberration = (3.0 / params.surface.xy) * (1.0 + noise_offset * 0.5);

    vec4 red_ch = compose_channel(sample_layers(uv - aberration));
    vec4 green_ch = compose_channel(sample_layers(uv));
    vec4 blue_ch = compose_channel(sample_layers(uv + aberration));

    vec3 color = vec3(red_ch.r, green_ch.g, blue_ch.b);
    float alpha = (red_ch.a + green_ch.a + blue_ch.a) / 3.0;
    alpha = max(alpha, 0.1);

    out_color = vec4(color, alpha * params.surface.w);
}
";

/// Compiles the fullscreen-triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glyphfield vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SOURCE),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the field fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glyphfield fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SOURCE),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}
