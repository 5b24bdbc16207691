use glam::Vec2;

use crate::params::SceneParams;
use crate::shading::{coverage, shade_pixel};
use crate::tracker::FrameState;

/// Renders one full frame on the CPU into tightly packed RGBA8 rows,
/// top-left origin.
///
/// This drives exactly the same per-pixel function the GPU shader ports, so
/// it doubles as the still-export path and as the reference for comparing
/// the two implementations. A zero-sized surface renders to an empty buffer
/// instead of attempting a degenerate coordinate normalization.
pub fn render_rgba(scene: &SceneParams, frame: &FrameState, width: u32, height: u32) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let color = shade_pixel(scene, frame, centre);
            let alpha = coverage(color) * scene.opacity;

            pixels.push(channel_to_byte(color.x * scene.opacity));
            pixels.push(channel_to_byte(color.y * scene.opacity));
            pixels.push(channel_to_byte(color.z * scene.opacity));
            pixels.push(channel_to_byte(alpha));
        }
    }
    pixels
}

fn channel_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
