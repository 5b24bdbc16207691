//! GPU orchestration for the helix pipeline.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `pipeline` compiles the embedded shaders into the single full-screen
//!   pipeline with the blend state the scene asked for.
//! - `uniforms` mirrors the std140 parameter block and writes changes
//!   straight through the queue each frame.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod pipeline;
mod uniforms;
mod state;

pub(crate) use state::GpuState;
