use glam::Vec3;

use crate::config::{
    parse_color, BendSettings, BlendMode, HelixConfig, ParallaxSettings, WaveId, WavePosition,
    FALLBACK_COLOR,
};

/// Gradient stops the shading stage can address.
pub const MAX_GRADIENT_STOPS: usize = 8;

/// Values taken when a per-wave list is shorter than the enabled-wave list.
const FALLBACK_STRAND_COUNT: u32 = 6;
const FALLBACK_STRAND_SPACING: f32 = 0.1;

/// Built-in anchor for each wave slot when the scene supplies no override.
fn default_position(wave: WaveId) -> WavePosition {
    match wave {
        WaveId::Top => WavePosition {
            x: 10.0,
            y: 0.5,
            rotation: -0.4,
        },
        WaveId::Middle => WavePosition {
            x: 5.0,
            y: 0.0,
            rotation: 0.2,
        },
        WaveId::Bottom => WavePosition {
            x: 2.0,
            y: -0.7,
            rotation: 0.4,
        },
    }
}

/// One wave slot after normalization; disabled slots carry `count == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub enabled: bool,
    pub count: u32,
    pub spacing: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub rotation: f32,
}

/// Fixed-capacity color ramp sampled by strand index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    stops: [Vec3; MAX_GRADIENT_STOPS],
    len: usize,
}

impl Gradient {
    /// Builds a gradient from at most [`MAX_GRADIENT_STOPS`] colors; extra
    /// entries are dropped.
    pub fn from_stops(colors: &[Vec3]) -> Self {
        let mut stops = [FALLBACK_COLOR; MAX_GRADIENT_STOPS];
        let len = colors.len().min(MAX_GRADIENT_STOPS);
        stops[..len].copy_from_slice(&colors[..len]);
        Self { stops, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stops as stored, including the unused tail slots.
    pub fn stops(&self) -> &[Vec3; MAX_GRADIENT_STOPS] {
        &self.stops
    }

    /// Piecewise-linear lookup at `t` in [0,1]. An empty gradient yields the
    /// uniform fallback color; a single stop is constant.
    pub fn sample(&self, t: f32) -> Vec3 {
        if self.len == 0 {
            return FALLBACK_COLOR;
        }
        if self.len == 1 {
            return self.stops[0];
        }

        let clamped = t.clamp(0.0, 0.9999);
        let scaled = clamped * (self.len - 1) as f32;
        let index = scaled.floor() as usize;
        let next = (index + 1).min(self.len - 1);
        self.stops[index].lerp(self.stops[next], scaled.fract())
    }
}

/// Normalized gradient position for strand `index` of `count`.
///
/// A lone strand evaluates to 0 instead of dividing by zero.
pub fn strand_t(index: u32, count: u32) -> f32 {
    index as f32 / count.saturating_sub(1).max(1) as f32
}

/// The scene after normalization: every wave slot reduced to plain numbers,
/// every scalar validated. This is the only shape the shading stage and the
/// renderer ever see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    /// Fixed top/middle/bottom order regardless of the caller's order.
    pub waves: [WaveParams; 3],
    pub gradient: Gradient,
    pub animation_speed: f32,
    pub smoothing: f32,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub bend: BendSettings,
    pub parallax: ParallaxSettings,
}

impl HelixConfig {
    /// Normalizes the flexible scene description into [`SceneParams`].
    ///
    /// Pure: the same configuration always resolves to bit-identical
    /// parameters. Runs once at mount, never per frame.
    pub fn resolve(&self) -> SceneParams {
        let waves = WaveId::ALL.map(|wave| {
            let enabled = self.waves.contains(&wave);
            let position = self
                .positions
                .get(wave)
                .unwrap_or_else(|| default_position(wave));
            let count = if enabled {
                self.strand_count
                    .resolve(wave, &self.waves, FALLBACK_STRAND_COUNT)
            } else {
                0
            };
            let spacing = self
                .strand_spacing
                .resolve(wave, &self.waves, FALLBACK_STRAND_SPACING);

            WaveParams {
                enabled,
                count,
                spacing,
                origin_x: position.x,
                origin_y: position.y,
                rotation: position.rotation,
            }
        });

        let colors: Vec<Vec3> = self.gradient.iter().map(|stop| parse_color(stop)).collect();

        SceneParams {
            waves,
            gradient: Gradient::from_stops(&colors),
            animation_speed: self.animation_speed,
            smoothing: self.smoothing.clamp(1e-4, 1.0),
            opacity: self.opacity.clamp(0.0, 1.0),
            blend_mode: self.blend_mode,
            bend: self.bend,
            parallax: self.parallax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerWave;

    #[test]
    fn strand_t_is_zero_for_a_lone_strand() {
        assert_eq!(strand_t(0, 1), 0.0);
        assert_eq!(strand_t(0, 0), 0.0);
    }

    #[test]
    fn strand_t_spans_unit_interval_evenly() {
        let count = 5;
        let values: Vec<f32> = (0..count).map(|i| strand_t(i, count)).collect();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[4], 1.0);
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_gradient_samples_fallback() {
        let gradient = Gradient::from_stops(&[]);
        assert!(gradient.is_empty());
        assert_eq!(gradient.sample(0.0), FALLBACK_COLOR);
        assert_eq!(gradient.sample(1.0), FALLBACK_COLOR);
    }

    #[test]
    fn single_stop_gradient_is_constant() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let gradient = Gradient::from_stops(&[red]);
        assert_eq!(gradient.sample(0.0), red);
        assert_eq!(gradient.sample(0.5), red);
        assert_eq!(gradient.sample(1.0), red);
    }

    #[test]
    fn gradient_interpolates_between_neighbours() {
        let gradient = Gradient::from_stops(&[Vec3::ZERO, Vec3::ONE]);
        let mid = gradient.sample(0.5);
        assert!((mid.x - 0.5).abs() < 1e-4);

        // t beyond the valid range clamps instead of indexing out of bounds.
        let end = gradient.sample(2.0);
        assert!(end.x > 0.999);
    }

    #[test]
    fn gradient_drops_stops_beyond_capacity() {
        let colors = vec![Vec3::ONE; 12];
        let gradient = Gradient::from_stops(&colors);
        assert_eq!(gradient.len(), MAX_GRADIENT_STOPS);
    }

    #[test]
    fn resolve_is_idempotent() {
        let config = HelixConfig {
            waves: vec![WaveId::Top, WaveId::Bottom],
            strand_count: PerWave::PerWave(vec![3]),
            ..HelixConfig::default()
        };
        assert_eq!(config.resolve(), config.resolve());
    }

    #[test]
    fn disabled_waves_resolve_to_zero_strands() {
        let config = HelixConfig {
            waves: vec![WaveId::Middle],
            strand_count: PerWave::Uniform(7),
            ..HelixConfig::default()
        };
        let params = config.resolve();
        assert!(!params.waves[WaveId::Top.index()].enabled);
        assert_eq!(params.waves[WaveId::Top.index()].count, 0);
        assert_eq!(params.waves[WaveId::Middle.index()].count, 7);
        assert_eq!(params.waves[WaveId::Bottom.index()].count, 0);
    }

    #[test]
    fn scalar_knobs_apply_to_every_enabled_wave() {
        let config = HelixConfig {
            waves: vec![WaveId::Top, WaveId::Middle, WaveId::Bottom],
            strand_count: PerWave::Uniform(4),
            strand_spacing: PerWave::Uniform(0.5),
            ..HelixConfig::default()
        };
        let params = config.resolve();
        for wave in params.waves {
            assert_eq!(wave.count, 4);
            assert_eq!(wave.spacing, 0.5);
        }
    }

    #[test]
    fn short_lists_take_documented_fallbacks() {
        let config = HelixConfig {
            waves: vec![WaveId::Top, WaveId::Bottom],
            strand_count: PerWave::PerWave(vec![2]),
            strand_spacing: PerWave::PerWave(vec![0.4]),
            ..HelixConfig::default()
        };
        let params = config.resolve();
        assert_eq!(params.waves[WaveId::Top.index()].count, 2);
        assert_eq!(params.waves[WaveId::Bottom.index()].count, FALLBACK_STRAND_COUNT);
        assert_eq!(
            params.waves[WaveId::Bottom.index()].spacing,
            FALLBACK_STRAND_SPACING
        );
    }

    #[test]
    fn default_positions_match_the_stock_layout() {
        let params = HelixConfig::default().resolve();
        let top = params.waves[WaveId::Top.index()];
        assert_eq!((top.origin_x, top.origin_y, top.rotation), (10.0, 0.5, -0.4));
        let bottom = params.waves[WaveId::Bottom.index()];
        assert_eq!(
            (bottom.origin_x, bottom.origin_y, bottom.rotation),
            (2.0, -0.7, 0.4)
        );
    }

    #[test]
    fn out_of_range_scalars_are_clamped() {
        let config = HelixConfig {
            smoothing: 7.5,
            opacity: -2.0,
            ..HelixConfig::default()
        };
        let params = config.resolve();
        assert_eq!(params.smoothing, 1.0);
        assert_eq!(params.opacity, 0.0);
    }
}
