use bytemuck::{Pod, Zeroable};
use helix::{FrameState, SceneParams, WaveId, MAX_GRADIENT_STOPS};

/// CPU-side mirror of the helix uniform block.
///
/// The layout matches the `HelixParams` block in `compile.rs` and therefore
/// must observe std140 alignment rules: every member is a 16-byte vector so
/// the struct packs without hidden padding. The fourth component of
/// `resolution` doubles as spare storage for the time value, mirroring how
/// GLSL front-ends that collapse padding still see an animating scalar.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct HelixUniforms {
    pub resolution: [f32; 4],
    pub animation: [f32; 4],
    pub pointer: [f32; 4],
    pub parallax: [f32; 4],
    pub bend: [f32; 4],
    pub counts: [i32; 4],
    pub waves: [[f32; 4]; 3],
    pub gradient: [[f32; 4]; MAX_GRADIENT_STOPS],
}

unsafe impl Zeroable for HelixUniforms {}
unsafe impl Pod for HelixUniforms {}

impl HelixUniforms {
    /// Seeds a uniform block from the normalized scene and the initial
    /// surface size. The per-frame fields start at rest.
    pub fn new(scene: &SceneParams, width: u32, height: u32) -> Self {
        let mut counts = [0_i32; 4];
        let mut waves = [[0.0_f32; 4]; 3];
        for wave in WaveId::ALL {
            let params = scene.waves[wave.index()];
            counts[wave.index()] = params.count as i32;
            waves[wave.index()] = [
                params.spacing,
                params.origin_x,
                params.origin_y,
                params.rotation,
            ];
        }
        counts[3] = scene.gradient.len() as i32;

        let mut gradient = [[1.0_f32, 1.0, 1.0, 0.0]; MAX_GRADIENT_STOPS];
        for (slot, stop) in gradient.iter_mut().zip(scene.gradient.stops()) {
            *slot = [stop.x, stop.y, stop.z, 0.0];
        }

        let mut uniforms = Self {
            resolution: [width as f32, height as f32, 0.0, 0.0],
            animation: [0.0, scene.animation_speed, 0.0, scene.opacity],
            pointer: [-1000.0, -1000.0, 0.0, 0.0],
            parallax: [0.0, 0.0, bool_flag(scene.parallax.enabled), 0.0],
            bend: [
                scene.bend.radius,
                scene.bend.strength,
                bool_flag(scene.bend.enabled),
                0.0,
            ],
            counts,
            waves,
            gradient,
        };
        uniforms.set_resolution(width as f32, height as f32);
        uniforms
    }

    /// Writes the current surface dimensions into the resolution slot.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution[0] = width;
        self.resolution[1] = height;
    }

    /// Copies one frame's smoothed interaction state into the block.
    pub fn set_frame(&mut self, frame: &FrameState) {
        self.animation[0] = frame.time;
        self.animation[2] = frame.bend_influence;
        self.pointer[0] = frame.pointer.x;
        self.pointer[1] = frame.pointer.y;
        self.parallax[0] = frame.parallax_offset.x;
        self.parallax[1] = frame.parallax_offset.y;
        // Mirror time into the spare resolution slot.
        self.resolution[3] = frame.time;
    }
}

fn bool_flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use helix::HelixConfig;
    use std::mem::{align_of, size_of};

    /// Sanity-checks that the CPU mirror of the uniform block matches the
    /// layout baked into the GLSL source.
    #[test]
    fn helix_uniforms_follow_std140_layout() {
        let scene = HelixConfig::default().resolve();
        let uniforms = HelixUniforms::new(&scene, 1920, 1080);
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<HelixUniforms>(), 16);
        assert_eq!(size_of::<HelixUniforms>(), 272);
        assert_eq!((&uniforms.resolution as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.animation as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.pointer as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.parallax as *const _ as usize) - base, 48);
        assert_eq!((&uniforms.bend as *const _ as usize) - base, 64);
        assert_eq!((&uniforms.counts as *const _ as usize) - base, 80);
        assert_eq!((&uniforms.waves as *const _ as usize) - base, 96);
        assert_eq!((&uniforms.gradient as *const _ as usize) - base, 144);
    }

    #[test]
    fn scene_counts_and_gradient_are_packed() {
        let scene = HelixConfig::default().resolve();
        let uniforms = HelixUniforms::new(&scene, 640, 360);

        // Default scene: a single middle wave of eight strands, five stops.
        assert_eq!(uniforms.counts, [0, 8, 0, 5]);
        assert_eq!(uniforms.waves[1][0], 0.3);
        assert_eq!(uniforms.waves[1][1], 5.0);
        assert!(uniforms.gradient[0][0] > 0.0);
    }

    #[test]
    fn frame_updates_only_touch_dynamic_slots() {
        let scene = HelixConfig::default().resolve();
        let mut uniforms = HelixUniforms::new(&scene, 640, 360);
        let before_counts = uniforms.counts;

        let mut frame = FrameState::at_rest(3.5, Vec2::new(640.0, 360.0));
        frame.bend_influence = 0.7;
        uniforms.set_frame(&frame);

        assert_eq!(uniforms.animation[0], 3.5);
        assert_eq!(uniforms.animation[2], 0.7);
        assert_eq!(uniforms.resolution[3], 3.5);
        assert_eq!(uniforms.counts, before_counts);
    }
}
