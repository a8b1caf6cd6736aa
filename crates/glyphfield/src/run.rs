use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use renderer::{MotionPreference, RenderOverrides, RenderPolicy, Renderer, RendererConfig};
use tierconfig::TierPolicy;

use crate::cli::Cli;
use crate::themes;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.list_themes {
        print_themes();
        return Ok(());
    }

    let theme = themes::find_theme(&cli.theme)
        .ok_or_else(|| anyhow!("unknown theme '{}'; try --list-themes", cli.theme))?;

    let tier_policy = match &cli.tier_policy {
        Some(path) => TierPolicy::load(path)
            .with_context(|| format!("failed to load tier policy {}", path.display()))?,
        None => TierPolicy::default(),
    };

    let overrides = RenderOverrides {
        opacity: cli.opacity,
        animated: cli.frozen.then_some(false),
        target_fps: cli.fps,
        fine_spacing: cli.fine_spacing,
        coarse_spacing: cli.coarse_spacing,
        fine_opacity: cli.fine_opacity,
        coarse_opacity: cli.coarse_opacity,
        fine_speed: cli.fine_speed,
        coarse_speed: cli.coarse_speed,
        glyph_set: cli.glyph_set,
    };

    let policy = if let Some(path) = cli.still_export.clone() {
        RenderPolicy::Export {
            time: cli.still_time,
            path,
        }
    } else if let Some(time) = cli.still_time {
        RenderPolicy::Still { time: Some(time) }
    } else {
        RenderPolicy::Animate
    };

    let motion = if cli.reduced_motion {
        MotionPreference::Reduced
    } else {
        MotionPreference::Inherit
    };

    let config = RendererConfig {
        surface_size: cli.size.unwrap_or((1280, 720)),
        theme,
        overrides,
        policy,
        motion,
        tier_policy,
    };

    tracing::info!(theme = %cli.theme, policy = ?config.policy, "starting glyphfield");
    Renderer::new(config).run()
}

fn print_themes() {
    println!("Built-in themes:");
    for (key, name, description) in themes::theme_listing() {
        println!("  {key:<16} {name:<16} {description}");
    }
}
