use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use helix::HelixConfig;
use renderer::{Renderer, RendererConfig, RenderPolicy};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the scene description, or falls back to the built-in defaults when
/// no file was given.
pub fn load_scene(path: Option<&Path>) -> Result<HelixConfig> {
    let Some(path) = path else {
        return Ok(HelixConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file at {}", path.display()))?;
    HelixConfig::from_toml_str(&text)
        .with_context(|| format!("failed to parse scene file at {}", path.display()))
}

/// Applies CLI overrides on top of the loaded scene.
fn apply_overrides(cli: &Cli, mut scene: HelixConfig) -> HelixConfig {
    if let Some(speed) = cli.speed {
        scene.animation_speed = speed;
    }
    if cli.no_interaction {
        scene.bend.enabled = false;
        scene.parallax.enabled = false;
    }
    scene
}

fn select_policy(cli: &Cli) -> RenderPolicy {
    if let Some(path) = &cli.export {
        return RenderPolicy::Export {
            time: cli.still_time,
            path: path.clone(),
        };
    }
    if cli.still {
        return RenderPolicy::Still {
            time: cli.still_time,
        };
    }
    RenderPolicy::Animate {
        target_fps: cli.fps.filter(|fps| *fps > 0.0),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let scene = apply_overrides(&cli, load_scene(cli.config.as_deref())?);
    let params = scene.resolve();
    let policy = select_policy(&cli);

    tracing::info!(
        width = cli.size.0,
        height = cli.size.1,
        ?policy,
        "starting helixbg"
    );

    let config = RendererConfig {
        surface_size: cli.size,
        scene: params,
        policy,
        antialiasing: cli.antialias,
    };
    Renderer::new(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("helixbg").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn export_flag_wins_over_still() {
        let cli = cli_from(&["--still", "--export", "frame.png", "--still-time", "2.5"]);
        match select_policy(&cli) {
            RenderPolicy::Export { time, path } => {
                assert_eq!(time, Some(2.5));
                assert_eq!(path, std::path::PathBuf::from("frame.png"));
            }
            other => panic!("unexpected policy: {other:?}"),
        }
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let cli = cli_from(&["--fps", "0"]);
        assert_eq!(
            select_policy(&cli),
            RenderPolicy::Animate { target_fps: None }
        );
    }

    #[test]
    fn overrides_touch_only_the_requested_fields() {
        let cli = cli_from(&["--speed", "2.0", "--no-interaction"]);
        let scene = apply_overrides(&cli, HelixConfig::default());
        assert_eq!(scene.animation_speed, 2.0);
        assert!(!scene.bend.enabled);
        assert!(!scene.parallax.enabled);
        assert_eq!(scene.gradient, HelixConfig::default().gradient);
    }

    #[test]
    fn missing_scene_file_is_an_error() {
        let result = load_scene(Some(Path::new("/nonexistent/scene.toml")));
        assert!(result.is_err());
    }
}
