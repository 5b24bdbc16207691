//! Core model for the helixbg animated background.
//!
//! Everything in this crate is pure: configuration parsing and
//! normalization, the damped interaction tracker, and the per-pixel shading
//! model. The `renderer` crate owns the side effects (GPU surface, uniform
//! uploads, the window event loop) and drives these types once per frame:
//!
//! ```text
//!   HelixConfig ── resolve() ──▶ SceneParams
//!                                    │
//!   pointer / resize events ──▶ InteractionTracker ── tick() ──▶ FrameState
//!                                    │                               │
//!                                    └──────── shade_pixel(scene, frame, px)
//! ```
//!
//! `shade_pixel` is the reference implementation of the fragment shader the
//! renderer compiles for the GPU; the two are kept numerically identical so
//! every visual property can be asserted here without a graphics device.

mod config;
mod params;
mod raster;
mod shading;
mod tracker;

pub use config::{
    BendSettings, BlendMode, ConfigError, HelixConfig, ParallaxSettings, PerWave, WaveId,
    WavePosition, WavePositions,
};
pub use params::{strand_t, Gradient, SceneParams, WaveParams, MAX_GRADIENT_STOPS};
pub use raster::render_rgba;
pub use shading::{bend_deflection, coverage, shade_pixel, soft_step, strand_field, StrandSample};
pub use tracker::{FrameState, InteractionTracker};
