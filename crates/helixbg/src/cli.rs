use std::path::PathBuf;

use clap::Parser;
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "helixbg",
    author,
    version,
    about = "Animated DNA-helix background renderer",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Scene description TOML; built-in defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Window size in physical pixels (e.g. `1280x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_size,
        default_value = "1280x720"
    )]
    pub size: (u32, u32),

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Animation speed multiplier, overriding the scene file.
    #[arg(long, value_name = "MULTIPLIER")]
    pub speed: Option<f32>,

    /// Disable pointer bend and parallax for this run.
    #[arg(long)]
    pub no_interaction: bool,

    /// Present a single still frame instead of animating.
    #[arg(long)]
    pub still: bool,

    /// Timestamp (seconds) to evaluate for still/export modes.
    #[arg(long, value_name = "SECONDS")]
    pub still_time: Option<f32>,

    /// Rasterize one frame to the given PNG path and exit.
    #[arg(long, value_name = "PATH", value_parser = parse_export_path)]
    pub export: Option<PathBuf>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4")
            })?;

            if samples <= 1 {
                return Ok(Antialiasing::Off);
            }
            if !matches!(samples, 2 | 4) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2 or 4"
                ));
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_export_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok(path),
        None => Err("export path has no extension; expected .png".to_string()),
        Some(other) => Err(format!("unsupported export format '.{other}'; expected .png")),
    }
}
