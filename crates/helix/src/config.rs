use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse scene configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Color substituted for gradient stops that fail to parse.
pub(crate) const FALLBACK_COLOR: Vec3 = Vec3::ONE;

/// The three wave slots, in their fixed declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveId {
    Top,
    Middle,
    Bottom,
}

impl WaveId {
    pub const ALL: [WaveId; 3] = [WaveId::Top, WaveId::Middle, WaveId::Bottom];

    /// Index of this slot within the fixed order.
    pub fn index(self) -> usize {
        match self {
            WaveId::Top => 0,
            WaveId::Middle => 1,
            WaveId::Bottom => 2,
        }
    }
}

/// A knob that is either one value shared by every enabled wave or a list
/// indexed by each wave's position within the enabled list.
///
/// Deserialises untagged, so `strand_count = 8` and `strand_count = [8, 4]`
/// are both accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PerWave<T> {
    Uniform(T),
    PerWave(Vec<T>),
}

impl<T: Copy> PerWave<T> {
    /// Resolves the value for `wave`. List entries are looked up by the
    /// wave's position among the enabled waves; missing entries take
    /// `fallback`.
    pub(crate) fn resolve(&self, wave: WaveId, enabled: &[WaveId], fallback: T) -> T {
        match self {
            PerWave::Uniform(value) => *value,
            PerWave::PerWave(values) => enabled
                .iter()
                .position(|candidate| *candidate == wave)
                .and_then(|index| values.get(index).copied())
                .unwrap_or(fallback),
        }
    }
}

/// Anchor and tilt for one wave slot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WavePosition {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
}

/// Optional per-slot overrides; unset slots keep their built-in anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WavePositions {
    pub top: Option<WavePosition>,
    pub middle: Option<WavePosition>,
    pub bottom: Option<WavePosition>,
}

impl WavePositions {
    pub(crate) fn get(&self, wave: WaveId) -> Option<WavePosition> {
        match wave {
            WaveId::Top => self.top,
            WaveId::Middle => self.middle,
            WaveId::Bottom => self.bottom,
        }
    }
}

/// Local deformation of the strands around the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BendSettings {
    pub enabled: bool,
    /// Exponential falloff rate; larger values shrink the affected area.
    pub radius: f32,
    /// Signed deflection scale; negative pushes strands away from the pointer.
    pub strength: f32,
}

impl Default for BendSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 2.0,
            strength: -0.5,
        }
    }
}

/// Whole-pattern shift following the pointer's offset from the surface center.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParallaxSettings {
    pub enabled: bool,
    pub strength: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.2,
        }
    }
}

/// How the rendered surface combines with whatever sits behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Additive compositing; dark pixels vanish over the backdrop.
    #[default]
    Screen,
    /// Premultiplied alpha compositing.
    Alpha,
}

/// Caller-supplied scene description, immutable for the lifetime of a mount.
///
/// The serde defaults reproduce the stock look: a single middle wave of
/// eight strands in a purple gradient, interactive bend and parallax on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HelixConfig {
    /// Up to eight `#rgb`/`#rrggbb` stops, interpolated along the strand
    /// index. Unparseable stops fall back to opaque white.
    pub gradient: Vec<String>,
    /// Which wave slots are active, in caller order.
    pub waves: Vec<WaveId>,
    pub strand_count: PerWave<u32>,
    pub strand_spacing: PerWave<f32>,
    pub positions: WavePositions,
    pub animation_speed: f32,
    /// Fraction of the remaining distance the tracked pointer state covers
    /// per tick, in (0, 1].
    pub smoothing: f32,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub bend: BendSettings,
    pub parallax: ParallaxSettings,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            gradient: vec![
                "#7a4d8f".to_string(),
                "#9b6fb5".to_string(),
                "#b893d1".to_string(),
                "#c5a8dc".to_string(),
                "#d4bfe8".to_string(),
            ],
            waves: vec![WaveId::Middle],
            strand_count: PerWave::PerWave(vec![8]),
            strand_spacing: PerWave::PerWave(vec![0.3]),
            positions: WavePositions::default(),
            animation_speed: 1.0,
            smoothing: 0.1,
            opacity: 1.0,
            blend_mode: BlendMode::default(),
            bend: BendSettings::default(),
            parallax: ParallaxSettings::default(),
        }
    }
}

impl HelixConfig {
    /// Parses a scene description from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

/// Parses a `#rgb` or `#rrggbb` color into linear-ish [0,1] RGB.
///
/// Anything that is not valid hex of the right length substitutes
/// [`FALLBACK_COLOR`] rather than failing the whole configuration.
pub(crate) fn parse_color(value: &str) -> Vec3 {
    let digits = value.trim().trim_start_matches('#');

    let expanded: String;
    let digits = match digits.len() {
        3 => {
            expanded = digits
                .chars()
                .flat_map(|ch| [ch, ch])
                .collect();
            expanded.as_str()
        }
        6 => digits,
        _ => return FALLBACK_COLOR,
    };

    let mut channels = [0.0_f32; 3];
    for (slot, chunk) in channels.iter_mut().zip(digits.as_bytes().chunks(2)) {
        let Ok(text) = std::str::from_utf8(chunk) else {
            return FALLBACK_COLOR;
        };
        let Ok(byte) = u8::from_str_radix(text, 16) else {
            return FALLBACK_COLOR;
        };
        *slot = byte as f32 / 255.0;
    }

    Vec3::from_array(channels)
}
