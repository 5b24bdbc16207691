use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use helix::InteractionTracker;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{time_source_for_policy, BoxedTimeSource, RenderPolicy};
use crate::RendererConfig;

/// Pointer-move events are coalesced to roughly one per display frame so a
/// high-rate mouse cannot flood the tracker with redundant targets.
const POINTER_COALESCE_INTERVAL: Duration = Duration::from_millis(16);

/// Aggregates window-side state for one mounted instance.
///
/// `gpu` is `None` when the host could not provide an accelerated surface;
/// the window then stays up but presents nothing. That mirrors the fail-soft
/// contract: a missing capability produces an empty visual, never a crash.
struct WindowState {
    window: Arc<Window>,
    gpu: Option<GpuState>,
    tracker: InteractionTracker,
    time_source: BoxedTimeSource,
    coalescer: PointerCoalescer,
    pacing: FramePacing,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Self {
        let size = window.inner_size();
        let gpu = match GpuState::new(window.as_ref(), size, &config.scene, config.antialiasing) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "no accelerated surface available; presenting nothing for this session"
                );
                None
            }
        };

        let target_fps = match config.policy {
            RenderPolicy::Animate { target_fps } => target_fps,
            _ => None,
        };

        Self {
            window,
            gpu,
            tracker: InteractionTracker::new(&config.scene),
            time_source: time_source_for_policy(&config.policy),
            coalescer: PointerCoalescer::new(POINTER_COALESCE_INTERVAL),
            pacing: FramePacing::new(target_fps),
        }
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn surface_size(&self) -> Vec2 {
        let size = self
            .gpu
            .as_ref()
            .map(|gpu| gpu.size())
            .unwrap_or_else(|| self.window.inner_size());
        Vec2::new(size.width as f32, size.height as f32)
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        if !self.coalescer.accept(Instant::now()) {
            return;
        }
        let surface = self.surface_size();
        self.tracker.pointer_moved(Vec2::new(x as f32, y as f32), surface);
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(new_size);
        }
    }

    /// Advances the tracker and submits one frame.
    ///
    /// State updates (clock sample, smoothing) complete before the
    /// submission that consumes them; the most recent coalesced pointer
    /// event before this call is the one the frame sees.
    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        if !self.pacing.should_render(Instant::now()) {
            return Ok(());
        }

        self.tracker.tick();
        let sample = self.time_source.sample();
        let size = gpu.size();
        let frame = self.tracker.frame_state(
            sample.seconds,
            Vec2::new(size.width as f32, size.height as f32),
        );
        gpu.render_frame(&frame)
    }
}

/// Opens the preview window and drives the `winit` event loop until the
/// window closes.
///
/// Teardown is by construction: when the loop exits, `WindowState` (and with
/// it every GPU resource) is dropped exactly once and no further redraw is
/// scheduled — including when the loop exits before the first frame.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0.max(1), config.surface_size.1.max(1));
    let window = WindowBuilder::new()
        .with_title("helixbg")
        .with_inner_size(window_size)
        .with_transparent(true)
        .build(&event_loop)
        .context("failed to create preview window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window.clone(), config);
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            // Drive redraws via vblank by waiting between events.
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            state.pointer_moved(position.x, position.y);
                        }
                        WindowEvent::CursorLeft { .. } => {
                            state.tracker.pointer_left();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current physical size when the scale factor changes.
                            if let Some(gpu) = state.gpu.as_ref() {
                                let _ = inner_size_writer.request_inner_size(gpu.size());
                            }
                        }
                        WindowEvent::RedrawRequested => match state.render_frame() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                let size = state.gpu.as_ref().map(|gpu| gpu.size());
                                if let Some(size) = size {
                                    state.resize(size);
                                }
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                tracing::warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                tracing::warn!(error = ?other, "surface error; retrying next frame");
                            }
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Schedule the next frame once winit is about to wait again.
                    state.window().request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

/// Drops pointer events that arrive faster than the configured interval.
struct PointerCoalescer {
    interval: Duration,
    last: Option<Instant>,
}

impl PointerCoalescer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn accept(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Accumulator-based frame pacing for an optional FPS cap.
///
/// Subtracts a single interval per rendered frame so a long gap never causes
/// a burst of catch-up frames.
struct FramePacing {
    target_interval: Option<Duration>,
    accumulator: Duration,
    last_tick: Option<Instant>,
}

impl FramePacing {
    fn new(target_fps: Option<f32>) -> Self {
        let target_interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            target_interval,
            accumulator: Duration::ZERO,
            last_tick: None,
        }
    }

    fn should_render(&mut self, now: Instant) -> bool {
        let Some(interval) = self.target_interval else {
            return true;
        };
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return true;
        };

        let delta = now.saturating_duration_since(last);
        self.last_tick = Some(now);
        self.accumulator = self.accumulator.saturating_add(delta);
        if self.accumulator + Duration::from_micros(250) < interval {
            false
        } else {
            self.accumulator = self.accumulator.saturating_sub(interval);
            true
        }
    }
}
