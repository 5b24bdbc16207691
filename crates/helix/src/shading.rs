//! Per-pixel model of the helix pattern.
//!
//! Pure functions of (pixel coordinate, frame snapshot, scene parameters);
//! no state survives between pixels or frames. The GLSL shader in the
//! `renderer` crate is a line-for-line port of this module and must stay
//! numerically identical to it.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::params::{strand_t, SceneParams};
use crate::tracker::FrameState;

const BACKBONE_AMPLITUDE: f32 = 0.18;
const WOBBLE_FREQUENCY: f32 = 3.7;
const WOBBLE_AMPLITUDE: f32 = 0.006;

const CORE_WIDTH: f32 = 0.002;
const GLOW_WIDTH: f32 = 0.022;

const RUNG_FREQUENCY: f32 = 6.0;
const RUNG_WIDTH: f32 = 0.01;

/// Depth tint endpoints: far strands sink toward the darker violet, near
/// strands lift toward the brighter one.
const DEPTH_TINT_FAR: Vec3 = Vec3::new(0.4, 0.2, 0.7);
const DEPTH_TINT_NEAR: Vec3 = Vec3::new(0.6, 0.4, 0.85);

/// Per-slot constants: phase offsets keep the three waves from ever
/// synchronizing, the top wave runs mirrored and slightly dimmed.
struct WaveProfile {
    phase_base: f32,
    phase_step: f32,
    mirror_x: bool,
    intensity_scale: f32,
}

const WAVE_PROFILES: [WaveProfile; 3] = [
    // top
    WaveProfile {
        phase_base: 1.0,
        phase_step: 0.2,
        mirror_x: true,
        intensity_scale: 0.8,
    },
    // middle
    WaveProfile {
        phase_base: 2.0,
        phase_step: 0.15,
        mirror_x: false,
        intensity_scale: 1.0,
    },
    // bottom
    WaveProfile {
        phase_base: 1.5,
        phase_step: 0.2,
        mirror_x: false,
        intensity_scale: 1.0,
    },
];

/// Slow spatial variation seeding each strand's depth tint, distinct per
/// wave slot so the three groups never shade in lockstep.
fn depth_seed(wave_index: usize, base_uv: Vec2, strand: f32) -> f32 {
    match wave_index {
        0 => ((base_uv.x * 1.3 + strand * 0.6).sin() + 1.0) * 0.5,
        1 => ((base_uv.y + strand * 0.7).cos() + 1.0) * 0.5,
        _ => ((base_uv.x + strand * 0.5).sin() + 1.0) * 0.5,
    }
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite ramp shared with the GLSL port.
///
/// Unlike `smoothstep`, the reversed-edge form (`edge0 > edge1`) is defined
/// here: the ramp simply runs downhill. The rung mask relies on that.
pub fn soft_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Maps a pixel coordinate into the shading space: centred on the surface,
/// aspect-corrected by dividing both axes by the height.
pub fn normalize_coord(pixel: Vec2, resolution: Vec2) -> Vec2 {
    (2.0 * pixel - resolution) / resolution.y
}

/// Vertical deflection applied to both backbones while the pointer hovers
/// nearby. Decays exponentially with squared distance; scaled by the
/// smoothed influence so it fades out after the pointer leaves.
pub fn bend_deflection(
    screen_uv: Vec2,
    pointer_uv: Vec2,
    radius: f32,
    strength: f32,
    influence: f32,
) -> f32 {
    let d = screen_uv - pointer_uv;
    let falloff = (-d.dot(d) * radius).exp();
    (pointer_uv.y - screen_uv.y) * falloff * strength * influence
}

/// What one strand contributes at one pixel, split so the backbone geometry
/// and the two intensity layers can be inspected separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrandSample {
    /// Centerline offset of the first backbone in shading space.
    pub backbone_a: f32,
    /// Centerline offset of the second backbone, 180° out of phase.
    pub backbone_b: f32,
    /// Core + glow intensity of both backbones.
    pub filaments: f32,
    /// Cross-bar intensity between the backbones.
    pub rungs: f32,
}

impl StrandSample {
    pub fn intensity(&self) -> f32 {
        self.filaments + self.rungs
    }
}

/// Evaluates one strand of the double helix at `pos` (strand-local shading
/// space). `time` is already scaled by the animation speed; `bend_y` is the
/// pointer deflection for this pixel, zero when bending is off.
pub fn strand_field(pos: Vec2, phase: f32, time: f32, bend_y: f32) -> StrandSample {
    let s = pos.x * 2.0 + time + phase;

    let mut y1 = s.sin() * BACKBONE_AMPLITUDE;
    let mut y2 = (s + PI).sin() * BACKBONE_AMPLITUDE;

    // Small high-frequency wobble keeps the ribbon from looking machined.
    y1 += (s * WOBBLE_FREQUENCY).sin() * WOBBLE_AMPLITUDE;
    y2 += (s * WOBBLE_FREQUENCY + PI).sin() * WOBBLE_AMPLITUDE;

    y1 += bend_y;
    y2 += bend_y;

    // The two backbones sit at complementary depths: when one faces the
    // viewer the other is behind the ribbon.
    let z1 = s.cos();
    let z2 = (s + PI).cos();
    let depth1 = (z1 + 1.0) * 0.5;
    let depth2 = (z2 + 1.0) * 0.5;

    let size1 = mix(0.5, 1.4, depth1);
    let size2 = mix(0.5, 1.4, depth2);
    let brightness1 = mix(0.3, 0.9, depth1);
    let brightness2 = mix(0.3, 0.9, depth2);

    let d1 = (pos.y - y1).abs();
    let d2 = (pos.y - y2).abs();

    // Thin bright core plus two wider glow sheaths per backbone. The
    // denominators clamp to a positive epsilon so the intensity stays
    // bounded at the exact centerline.
    let core1 = CORE_WIDTH * size1 / d1.max(0.001);
    let core2 = CORE_WIDTH * size2 / d2.max(0.001);

    let glow1_near = GLOW_WIDTH * 0.6 * size1 / d1.max(0.005);
    let glow1_far = GLOW_WIDTH * 1.5 * size1 / d1.max(0.015);
    let glow2_near = GLOW_WIDTH * 0.6 * size2 / d2.max(0.005);
    let glow2_far = GLOW_WIDTH * 1.5 * size2 / d2.max(0.015);

    let mut strand1 = (core1 * 1.5 + glow1_near * 0.4 + glow1_far * 0.15) * brightness1;
    let mut strand2 = (core2 * 1.5 + glow2_near * 0.4 + glow2_far * 0.15) * brightness2;

    // Faint travelling shimmer along each backbone.
    strand1 *= (s * 18.0 + time * 1.5).sin() * 0.012 + 0.988;
    strand2 *= (s * 18.0 + time * 1.5 + PI).sin() * 0.012 + 0.988;

    // Base-pair rungs: sharpened periodic bars masked to the band strictly
    // between the two centerlines, fading when the ribbon is edge-on.
    let mut stripes = soft_step(1.0 - RUNG_WIDTH, 1.0, (s * RUNG_FREQUENCY).sin());
    stripes *= (s * RUNG_FREQUENCY * 4.0).sin() * 0.04 + 0.96;

    let y_min = y1.min(y2);
    let y_max = y1.max(y2);
    let inside = soft_step(y_min - 0.005, y_min, pos.y) * soft_step(y_max + 0.005, y_max, pos.y);

    let visibility = soft_step(-0.4, 0.8, z1.abs());
    let rung_size = mix(0.5, 1.4, (depth1 + depth2) * 0.5);

    let rung_core = inside * stripes * visibility * rung_size;
    let rung_glow = rung_core * 1.8;
    let rungs = (rung_core * 0.7 + rung_glow * 0.25) * 0.6;

    StrandSample {
        backbone_a: y1,
        backbone_b: y2,
        filaments: strand1 + strand2,
        rungs,
    }
}

/// Rotation matching the GLSL `uv * mat2(c, s, -s, c)` product.
fn rotate(v: Vec2, r: f32) -> Vec2 {
    let (sin, cos) = r.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

/// Accumulated color of every enabled wave at one pixel.
///
/// `pixel` is in device pixels with a top-left origin; the frame's pointer
/// is in the bottom-left-origin space the tracker maintains. Disabled waves
/// contribute nothing and are never evaluated.
pub fn shade_pixel(scene: &SceneParams, frame: &FrameState, pixel: Vec2) -> Vec3 {
    let mut base_uv = normalize_coord(pixel, frame.resolution);
    if scene.parallax.enabled {
        base_uv += frame.parallax_offset;
    }

    let bend_y = if scene.bend.enabled {
        let mut pointer_uv = normalize_coord(frame.pointer, frame.resolution);
        pointer_uv.y = -pointer_uv.y;
        bend_deflection(
            base_uv,
            pointer_uv,
            scene.bend.radius,
            scene.bend.strength,
            frame.bend_influence,
        )
    } else {
        0.0
    };

    let time = frame.time * scene.animation_speed;
    let mut color = Vec3::ZERO;

    for (wave_index, wave) in scene.waves.iter().enumerate() {
        if !wave.enabled || wave.count == 0 {
            continue;
        }
        let profile = &WAVE_PROFILES[wave_index];
        let angle = wave.rotation * 0.5;

        for index in 0..wave.count {
            let fi = index as f32;
            let t = strand_t(index, wave.count);

            let mut ruv = rotate(base_uv, angle);
            if profile.mirror_x {
                ruv.x = -ruv.x;
            }
            let pos = ruv + Vec2::new(wave.spacing * fi + wave.origin_x, wave.origin_y);

            let sample = strand_field(
                pos,
                profile.phase_base + profile.phase_step * fi,
                time,
                bend_y,
            );

            let tint = DEPTH_TINT_FAR.lerp(DEPTH_TINT_NEAR, depth_seed(wave_index, base_uv, fi));
            color += scene.gradient.sample(t) * tint * sample.intensity() * profile.intensity_scale;
        }
    }

    color
}

/// Alpha for transparent compositing: the clamped peak channel, so the
/// surface is fully transparent wherever no strand contributed.
pub fn coverage(color: Vec3) -> f32 {
    color.max_element().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HelixConfig, WaveId};

    fn scene_with_waves(waves: Vec<WaveId>) -> SceneParams {
        let config = HelixConfig {
            waves,
            ..HelixConfig::default()
        };
        config.resolve()
    }

    fn rest_frame() -> FrameState {
        FrameState::at_rest(0.0, Vec2::new(640.0, 360.0))
    }

    #[test]
    fn no_enabled_waves_means_zero_intensity_everywhere() {
        let scene = scene_with_waves(Vec::new());
        let frame = rest_frame();
        for (x, y) in [(0.5, 0.5), (320.0, 180.0), (639.5, 359.5), (100.0, 42.0)] {
            let color = shade_pixel(&scene, &frame, Vec2::new(x, y));
            assert_eq!(color, Vec3::ZERO);
            assert_eq!(coverage(color), 0.0);
        }
    }

    #[test]
    fn lone_strand_shades_without_nan() {
        let config = HelixConfig {
            waves: vec![WaveId::Middle],
            strand_count: crate::PerWave::Uniform(1),
            ..HelixConfig::default()
        };
        let scene = config.resolve();
        let frame = rest_frame();
        let color = shade_pixel(&scene, &frame, Vec2::new(320.0, 180.0));
        assert!(color.is_finite());
    }

    #[test]
    fn backbones_start_as_mirror_twins() {
        // At time zero the second backbone is the exact negation of the
        // first about the strand baseline, wobble included.
        for offset in [-1.2_f32, -0.3, 0.0, 0.4, 2.0] {
            let sample = strand_field(Vec2::new(offset, 0.0), 2.0, 0.0, 0.0);
            assert!((sample.backbone_a + sample.backbone_b).abs() < 1e-6);
        }
    }

    #[test]
    fn centerlines_are_odd_about_the_progression_origin() {
        // Pick the x where progression = 0 for phase 2.0 at time 0.
        let x0 = -1.0_f32;
        for d in [0.05_f32, 0.2, 0.7] {
            let ahead = strand_field(Vec2::new(x0 + d, 0.0), 2.0, 0.0, 0.0);
            let behind = strand_field(Vec2::new(x0 - d, 0.0), 2.0, 0.0, 0.0);
            assert!((ahead.backbone_a + behind.backbone_a).abs() < 1e-6);
            assert!((ahead.backbone_b + behind.backbone_b).abs() < 1e-6);
        }
    }

    #[test]
    fn filament_field_is_point_symmetric_at_start() {
        // Reflecting through the progression origin maps each backbone onto
        // its twin, so the combined core/glow intensity is preserved. The
        // shimmer term is an odd high-frequency modulation, so the exact
        // identity holds where sin(18s) = 0; sample at those phases
        // (s = 2d = k*pi/18).
        let x0 = -1.0_f32;
        for (k, y) in [(2_i32, 0.05_f32), (5, -0.12), (9, 0.18)] {
            let d = k as f32 * PI / 36.0;
            let ahead = strand_field(Vec2::new(x0 + d, y), 2.0, 0.0, 0.0);
            let behind = strand_field(Vec2::new(x0 - d, -y), 2.0, 0.0, 0.0);
            assert!(
                (ahead.filaments - behind.filaments).abs() < 1e-3,
                "filaments diverge at d={d} y={y}: {} vs {}",
                ahead.filaments,
                behind.filaments
            );
        }
    }

    #[test]
    fn bend_deflection_decays_with_distance() {
        let pointer = Vec2::new(0.0, 0.5);
        let mut last = f32::INFINITY;
        for distance in [0.0_f32, 0.25, 0.5, 1.0, 2.0, 4.0] {
            let screen = Vec2::new(distance, 0.0);
            let deflection = bend_deflection(screen, pointer, 2.0, -0.5, 1.0).abs();
            assert!(deflection <= last + 1e-9);
            assert!(deflection >= 0.0);
            last = deflection;
        }
    }

    #[test]
    fn zero_influence_disables_bending() {
        let sample = bend_deflection(Vec2::ZERO, Vec2::new(0.1, 0.3), 2.0, -0.5, 0.0);
        assert_eq!(sample, 0.0);
    }

    #[test]
    fn bend_shifts_both_backbones_equally() {
        let flat = strand_field(Vec2::new(0.3, 0.0), 1.5, 0.0, 0.0);
        let bent = strand_field(Vec2::new(0.3, 0.0), 1.5, 0.0, 0.07);
        assert!((bent.backbone_a - flat.backbone_a - 0.07).abs() < 1e-6);
        assert!((bent.backbone_b - flat.backbone_b - 0.07).abs() < 1e-6);
    }

    #[test]
    fn disabled_bend_ignores_the_pointer() {
        let mut config = HelixConfig::default();
        config.bend.enabled = false;
        config.parallax.enabled = false;
        let scene = config.resolve();

        let mut near = rest_frame();
        near.pointer = Vec2::new(320.0, 180.0);
        near.bend_influence = 1.0;
        let far = rest_frame();

        let pixel = Vec2::new(300.0, 200.0);
        assert_eq!(
            shade_pixel(&scene, &near, pixel),
            shade_pixel(&scene, &far, pixel)
        );
    }

    #[test]
    fn parallax_offset_translates_the_pattern() {
        let mut config = HelixConfig::default();
        config.bend.enabled = false;
        let scene = config.resolve();

        let frame = rest_frame();
        let mut shifted = rest_frame();
        shifted.parallax_offset = Vec2::new(0.25, 0.0);

        // A quarter-unit shift in uv space is res.y/2 * 0.25 pixels; sampling
        // the unshifted frame that many pixels over must agree.
        let pixel = Vec2::new(300.0, 200.0);
        let compensated = pixel + Vec2::new(0.25 * 180.0, 0.0);
        let a = shade_pixel(&scene, &shifted, pixel);
        let b = shade_pixel(&scene, &frame, compensated);
        // Loose tolerance: float rounding differs between the two paths and
        // the core term has a steep slope near a centerline.
        assert!((a - b).length() < 0.05);
    }

    #[test]
    fn soft_step_matches_smoothstep_on_forward_edges() {
        assert_eq!(soft_step(0.0, 1.0, -1.0), 0.0);
        assert_eq!(soft_step(0.0, 1.0, 2.0), 1.0);
        assert!((soft_step(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn soft_step_reversed_edges_ramp_downhill() {
        assert_eq!(soft_step(1.0, 0.0, 2.0), 0.0);
        assert_eq!(soft_step(1.0, 0.0, -1.0), 1.0);
        assert!((soft_step(1.0, 0.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rungs_only_appear_between_the_backbones() {
        // Far above both centerlines the band mask must kill the rungs.
        let sample = strand_field(Vec2::new(0.0, 1.0), 2.0, 0.0, 0.0);
        assert!(sample.rungs.abs() < 1e-4);
    }
}
