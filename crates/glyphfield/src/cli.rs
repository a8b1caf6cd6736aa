use std::path::PathBuf;

use clap::Parser;
use field::GlyphSet;

#[derive(Parser, Debug)]
#[command(
    name = "glyphfield",
    author,
    version,
    about = "Animated ASCII glyph-field background renderer",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Color theme name (see --list-themes).
    #[arg(long, value_name = "NAME", default_value = "cool-purple")]
    pub theme: String,

    /// Print the built-in color themes and exit.
    #[arg(long)]
    pub list_themes: bool,

    /// Glyph set rendered on the fine grid: minimal, typography, symbols,
    /// geometric, or dense.
    #[arg(long, value_name = "SET", value_parser = parse_glyph_set)]
    pub glyph_set: Option<GlyphSet>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Overall layer opacity in [0, 1].
    #[arg(long, value_name = "ALPHA")]
    pub opacity: Option<f32>,

    /// FPS cap for the time uniform (0 = use the capability tier's cap).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Freeze the animation (time never advances).
    #[arg(long = "static")]
    pub frozen: bool,

    /// Timestamp (seconds) for still/export rendering.
    #[arg(long, value_name = "SECONDS")]
    pub still_time: Option<f32>,

    /// Render a single frame on the CPU reference path to PNG, then exit.
    #[arg(long, value_name = "PATH")]
    pub still_export: Option<PathBuf>,

    /// Capability tier policy TOML file.
    #[arg(long, value_name = "FILE", env = "GLYPHFIELD_TIER_POLICY")]
    pub tier_policy: Option<PathBuf>,

    /// Hold the animation as if the environment preferred reduced motion.
    #[arg(long)]
    pub reduced_motion: bool,

    /// Fine grid spacing in pixels.
    #[arg(long, value_name = "PX")]
    pub fine_spacing: Option<f32>,

    /// Coarse grid spacing in pixels.
    #[arg(long, value_name = "PX")]
    pub coarse_spacing: Option<f32>,

    /// Fine layer base opacity.
    #[arg(long, value_name = "ALPHA")]
    pub fine_opacity: Option<f32>,

    /// Coarse layer base opacity.
    #[arg(long, value_name = "ALPHA")]
    pub coarse_opacity: Option<f32>,

    /// Fine layer time multiplier.
    #[arg(long, value_name = "FACTOR")]
    pub fine_speed: Option<f32>,

    /// Coarse layer time multiplier.
    #[arg(long, value_name = "FACTOR")]
    pub coarse_speed: Option<f32>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_glyph_set(value: &str) -> Result<GlyphSet, String> {
    GlyphSet::parse(value).ok_or_else(|| {
        format!(
            "invalid glyph set '{value}'; expected minimal, typography, symbols, geometric, or dense"
        )
    })
}

fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{value}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{value}' must be non-zero"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_sizes() {
        assert_eq!(parse_surface_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_surface_size("1920X1080"), Ok((1920, 1080)));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x720").is_err());
    }

    #[test]
    fn parses_glyph_sets() {
        assert_eq!(parse_glyph_set("dense"), Ok(GlyphSet::Dense));
        assert!(parse_glyph_set("wingdings").is_err());
    }

    #[test]
    fn cli_accepts_a_typical_invocation() {
        let cli = Cli::parse_from([
            "glyphfield",
            "--theme",
            "galaxy",
            "--glyph-set",
            "symbols",
            "--size",
            "800x600",
            "--fps",
            "30",
        ]);
        assert_eq!(cli.theme, "galaxy");
        assert_eq!(cli.glyph_set, Some(GlyphSet::Symbols));
        assert_eq!(cli.size, Some((800, 600)));
        assert_eq!(cli.fps, Some(30.0));
    }
}
