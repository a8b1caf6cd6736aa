//! Color themes.
//!
//! A theme is an ordered run of two or three colors that the shader blends
//! along the density gradient. Themes arrive from the host as hex strings;
//! anything that does not yield at least two valid colors falls back to the
//! default theme rather than failing; the background is decorative and must
//! never take the page down with it.

use glam::{vec3, Vec3};

/// An ordered 2–3 color gradient plus display metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTheme {
    pub name: String,
    pub description: String,
    pub colors: Vec<Vec3>,
}

impl ColorTheme {
    /// Builds a theme from hex color strings, dropping any that fail to
    /// parse. Returns `None` when fewer than two colors survive.
    pub fn from_hex(name: &str, description: &str, hex: &[&str]) -> Option<Self> {
        let colors: Vec<Vec3> = hex.iter().filter_map(|h| parse_hex_color(h)).collect();
        if colors.len() < 2 {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
            colors,
        })
    }

    /// The three uniform color slots. A two-color theme duplicates its last
    /// color into the third slot.
    pub fn uniform_palette(&self) -> [Vec3; 3] {
        let a = self.colors[0];
        let b = self.colors[1];
        let c = self.colors.get(2).copied().unwrap_or(b);
        [a, b, c]
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        ColorTheme::from_hex(
            "Cool Purple",
            "Cool, professional, technical",
            &["#8b5cf6", "#6366f1", "#3b82f6"],
        )
        .expect("built-in default theme parses")
    }
}

/// Parses `#rrggbb` (leading `#` optional) into linear-scaled RGB in [0, 1].
pub fn parse_hex_color(raw: &str) -> Option<Vec3> {
    let digits = raw.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v as f32 / 255.0)
            .ok()
    };
    Some(vec3(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
