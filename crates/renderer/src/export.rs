use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use helix::{render_rgba, FrameState, SceneParams};
use image::{ImageFormat, RgbaImage};

/// Rasterizes one frame on the CPU and writes it as a PNG.
///
/// Runs the same per-pixel model the GPU shader implements, with the pointer
/// parked and no interaction applied, so the output is a deterministic
/// function of (scene, time, size).
pub(crate) fn export_still(
    scene: &SceneParams,
    size: (u32, u32),
    time: f32,
    path: &Path,
) -> Result<()> {
    let (width, height) = size;
    anyhow::ensure!(width > 0 && height > 0, "export size must be non-zero");

    let frame = FrameState::at_rest(time, Vec2::new(width as f32, height as f32));
    let pixels = render_rgba(scene, &frame, width, height);
    let image = RgbaImage::from_raw(width, height, pixels)
        .context("rasterized buffer did not match the requested dimensions")?;

    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write still frame to {}", path.display()))?;

    tracing::info!(width, height, time, path = %path.display(), "exported still frame");
    Ok(())
}
