//! Built-in color themes.
//!
//! Vibrant 2–3 stop gradients the shader blends along the density field.
//! Hosts can also construct [`ColorTheme`] values directly; these are the
//! named presets reachable from the CLI.

use field::color::ColorTheme;

struct ThemeEntry {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    colors: [&'static str; 3],
}

const THEMES: &[ThemeEntry] = &[
    ThemeEntry {
        key: "cool-purple",
        name: "Cool Purple",
        description: "Cool, professional, technical",
        colors: ["#a855f7", "#6366f1", "#06b6d4"],
    },
    ThemeEntry {
        key: "teal-pink",
        name: "Teal Pink",
        description: "Fresh, creative, energetic",
        colors: ["#0d9488", "#06b6d4", "#f472b6"],
    },
    ThemeEntry {
        key: "coral-orange",
        name: "Coral Orange",
        description: "Warm, inviting, action-oriented",
        colors: ["#ea580c", "#fb923c", "#ec4899"],
    },
    ThemeEntry {
        key: "blue-teal",
        name: "Blue Teal",
        description: "Trust, stability, innovation",
        colors: ["#2563eb", "#06b6d4", "#10b981"],
    },
    ThemeEntry {
        key: "purple-pink",
        name: "Purple Pink",
        description: "Creative, bold, expressive",
        colors: ["#7c3aed", "#c026d3", "#ec4899"],
    },
    ThemeEntry {
        key: "indigo-blue",
        name: "Indigo Blue",
        description: "Deep, thoughtful, expansive",
        colors: ["#4f46e5", "#3b82f6", "#22d3ee"],
    },
    ThemeEntry {
        key: "emerald-green",
        name: "Emerald Green",
        description: "Growth, balance, natural wisdom",
        colors: ["#059669", "#10b981", "#06b6d4"],
    },
    ThemeEntry {
        key: "galaxy",
        name: "Galaxy",
        description: "Deep space, cosmic, innovative",
        colors: ["#4A148C", "#1A237E", "#0D47A1"],
    },
];

/// Looks up a built-in theme by its CLI key (case-insensitive).
pub fn find_theme(key: &str) -> Option<ColorTheme> {
    let wanted = key.trim().to_ascii_lowercase();
    THEMES
        .iter()
        .find(|entry| entry.key == wanted)
        .and_then(|entry| ColorTheme::from_hex(entry.name, entry.description, &entry.colors))
}

/// (key, name, description) listing for `--list-themes`.
pub fn theme_listing() -> Vec<(&'static str, &'static str, &'static str)> {
    THEMES
        .iter()
        .map(|entry| (entry.key, entry.name, entry.description))
        .collect()
}
