//! Host-side lifecycle for the helixbg background renderer.
//!
//! The crate glues the pure model in `helix` to a real surface: a `winit`
//! preview window, a `wgpu` pipeline running the GLSL port of the shading
//! stage, and a CPU still-export path. The overall flow is:
//!
//! ```text
//!   CLI / helixbg
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                │                  │
//!          │                │ pointer/resize   └─▶ tracker.tick() ─▶ GPU UBO
//!          │                ▼
//!          │         InteractionTracker (helix)
//!          └── RenderPolicy::Export ──▶ CPU raster ──▶ PNG
//! ```
//!
//! `GpuState` owns every GPU resource for one mount (surface, device,
//! pipeline, uniform buffer) and is dropped exactly once when the event loop
//! exits; nothing survives into a later mount. When no adapter or surface
//! can be had, the window simply presents nothing: the host never sees a
//! crash from this crate once a mount has started.

mod compile;
mod export;
mod gpu;
mod runtime;
mod window;

use std::path::PathBuf;

use anyhow::Result;
use helix::SceneParams;

pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, RenderPolicy, SystemTimeSource,
    TimeSample, TimeSource,
};

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Mirrors the CLI flags: the normalized scene, the initial surface size,
/// the render policy, and the MSAA request.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Normalized scene parameters (see `helix::HelixConfig::resolve`).
    pub scene: SceneParams,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
}

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window and GPU modules; `Renderer`
/// simply selects the presentation path and forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Runs the configured policy to completion.
    ///
    /// Export policies never touch the GPU: the frame is rasterized on the
    /// CPU through the same per-pixel model the shader implements. The
    /// animate/still policies open the preview window and block until it is
    /// closed.
    pub fn run(&mut self) -> Result<()> {
        match &self.config.policy {
            RenderPolicy::Export { time, path } => {
                let path: PathBuf = path.clone();
                export::export_still(
                    &self.config.scene,
                    self.config.surface_size,
                    time.unwrap_or(0.0),
                    &path,
                )
            }
            _ => window::run(&self.config),
        }
    }
}
