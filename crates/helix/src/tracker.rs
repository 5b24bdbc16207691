use glam::Vec2;

use crate::params::SceneParams;

/// Off-surface seed for the pointer, far enough away that the bend falloff
/// is zero everywhere until the first real move event arrives.
const POINTER_PARKED: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Immutable snapshot of the interaction state handed to the shading stage
/// for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Elapsed seconds since mount, unscaled.
    pub time: f32,
    /// Surface size in device pixels.
    pub resolution: Vec2,
    /// Smoothed pointer position in surface pixels, bottom-left origin.
    pub pointer: Vec2,
    /// Smoothed bend influence in [0,1].
    pub bend_influence: f32,
    /// Smoothed parallax shift in normalized coordinates.
    pub parallax_offset: Vec2,
}

impl FrameState {
    /// A snapshot with the pointer parked and no interaction applied, as
    /// used for still frames and exports.
    pub fn at_rest(time: f32, resolution: Vec2) -> Self {
        Self {
            time,
            resolution,
            pointer: POINTER_PARKED,
            bend_influence: 0.0,
            parallax_offset: Vec2::ZERO,
        }
    }
}

/// Damped pointer/parallax state for one mounted instance.
///
/// The tracker is the pure half of the frame loop: the windowing layer
/// translates events into `pointer_moved`/`pointer_left` calls and invokes
/// [`tick`](Self::tick) once per frame before building a [`FrameState`].
/// Nothing here touches a clock or a device, so every transition is
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct InteractionTracker {
    smoothing: f32,
    interactive: bool,
    parallax_enabled: bool,
    parallax_strength: f32,
    pointer_target: Vec2,
    pointer_current: Vec2,
    influence_target: f32,
    influence_current: f32,
    parallax_target: Vec2,
    parallax_current: Vec2,
}

impl InteractionTracker {
    pub fn new(params: &SceneParams) -> Self {
        Self {
            smoothing: params.smoothing,
            interactive: params.bend.enabled,
            parallax_enabled: params.parallax.enabled,
            parallax_strength: params.parallax.strength,
            pointer_target: POINTER_PARKED,
            pointer_current: POINTER_PARKED,
            influence_target: 0.0,
            influence_current: 0.0,
            parallax_target: Vec2::ZERO,
            parallax_current: Vec2::ZERO,
        }
    }

    /// Records a pointer position in surface pixels (top-left origin, as
    /// delivered by the windowing layer) against the given surface size.
    ///
    /// The vertical axis is flipped here so the stored target lives in the
    /// bottom-left-origin space the shading stage expects. Zero-sized
    /// surfaces are ignored outright; the normalization they would feed is
    /// degenerate.
    pub fn pointer_moved(&mut self, position: Vec2, surface: Vec2) {
        if surface.x <= 0.0 || surface.y <= 0.0 {
            return;
        }

        if self.interactive {
            self.pointer_target = Vec2::new(position.x, surface.y - position.y);
            self.influence_target = 1.0;
        }

        if self.parallax_enabled {
            let centre = surface * 0.5;
            let offset = Vec2::new(
                (position.x - centre.x) / surface.x,
                -(position.y - centre.y) / surface.y,
            );
            self.parallax_target = offset * self.parallax_strength;
        }
    }

    /// Drops the bend influence target to zero immediately. The smoothed
    /// value decays over the following ticks.
    pub fn pointer_left(&mut self) {
        self.influence_target = 0.0;
    }

    /// Advances every tracked value toward its target by the smoothing
    /// fraction of the remaining distance.
    ///
    /// The step is per tick, not per second: at a higher refresh rate the
    /// state converges faster in wall-clock terms. This matches the
    /// behavior the visual was tuned against and is kept deliberately.
    pub fn tick(&mut self) {
        let f = self.smoothing;
        self.pointer_current = self.pointer_current.lerp(self.pointer_target, f);
        self.influence_current += (self.influence_target - self.influence_current) * f;
        self.parallax_current = self.parallax_current.lerp(self.parallax_target, f);
    }

    /// Builds the per-frame snapshot from the current smoothed state.
    pub fn frame_state(&self, time: f32, resolution: Vec2) -> FrameState {
        FrameState {
            time,
            resolution,
            pointer: self.pointer_current,
            bend_influence: self.influence_current,
            parallax_offset: self.parallax_current,
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer_current
    }

    pub fn bend_influence(&self) -> f32 {
        self.influence_current
    }

    pub fn parallax_offset(&self) -> Vec2 {
        self.parallax_current
    }
}
