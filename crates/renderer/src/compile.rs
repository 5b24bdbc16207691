use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the helix fragment shader through naga's GLSL frontend.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("helix fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(HELIX_FRAGMENT_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// GLSL port of `helix::shading`.
///
/// The uniform block layout must match `HelixUniforms` in `gpu/uniforms.rs`
/// (std140). Every constant and every clamp below mirrors the CPU model;
/// `softStep` replaces `smoothstep` so the reversed-edge rung mask is
/// well-defined on both sides.
const HELIX_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform HelixParams {
    vec4 resolution;   // xy surface size in px, w mirrors time
    vec4 animation;    // x time, y speed, z bend influence, w opacity
    vec4 pointer;      // xy smoothed pointer in px, bottom-left origin
    vec4 parallax;     // xy smoothed offset, z enabled
    vec4 bend;         // x radius, y strength, z enabled
    ivec4 counts;      // x top, y middle, z bottom, w gradient stops
    vec4 waves[3];     // x spacing, y origin x, z origin y, w rotation
    vec4 gradient[8];
} ubo;

const float PI = 3.14159265359;

mat2 rotate(float r) {
    return mat2(cos(r), sin(r), -sin(r), cos(r));
}

float softStep(float edge0, float edge1, float x) {
    float t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

vec3 gradientColor(float t) {
    int count = ubo.counts.w;
    if (count <= 0) {
        return vec3(1.0);
    }
    if (count == 1) {
        return ubo.gradient[0].rgb;
    }
    float clamped = clamp(t, 0.0, 0.9999);
    float scaled = clamped * float(count - 1);
    int index = int(floor(scaled));
    int next = min(index + 1, count - 1);
    return mix(ubo.gradient[index].rgb, ubo.gradient[next].rgb, fract(scaled));
}

float strandT(int index, int count) {
    return float(index) / max(float(count - 1), 1.0);
}

float depthSeed(int wave, vec2 baseUv, float strand) {
    if (wave == 0) {
        return (sin(baseUv.x * 1.3 + strand * 0.6) + 1.0) * 0.5;
    }
    if (wave == 1) {
        return (cos(baseUv.y + strand * 0.7) + 1.0) * 0.5;
    }
    return (sin(baseUv.x + strand * 0.5) + 1.0) * 0.5;
}

float strandField(vec2 pos, float phase, float time, float bendY) {
    float s = pos.x * 2.0 + time + phase;

    float y1 = sin(s) * 0.18 + sin(s * 3.7) * 0.006 + bendY;
    float y2 = sin(s + PI) * 0.18 + sin(s * 3.7 + PI) * 0.006 + bendY;

    float z1 = cos(s);
    float depth1 = (z1 + 1.0) * 0.5;
    float depth2 = (cos(s + PI) + 1.0) * 0.5;

    float size1 = mix(0.5, 1.4, depth1);
    float size2 = mix(0.5, 1.4, depth2);
    float brightness1 = mix(0.3, 0.9, depth1);
    float brightness2 = mix(0.3, 0.9, depth2);

    float d1 = abs(pos.y - y1);
    float d2 = abs(pos.y - y2);

    // Thin core plus two glow sheaths; denominators clamp so the intensity
    // stays bounded at the centerline.
    float strand1 = (0.002 * size1 / max(d1, 0.001) * 1.5
        + 0.022 * 0.6 * size1 / max(d1, 0.005) * 0.4
        + 0.022 * 1.5 * size1 / max(d1, 0.015) * 0.15) * brightness1;
    float strand2 = (0.002 * size2 / max(d2, 0.001) * 1.5
        + 0.022 * 0.6 * size2 / max(d2, 0.005) * 0.4
        + 0.022 * 1.5 * size2 / max(d2, 0.015) * 0.15) * brightness2;

    strand1 *= sin(s * 18.0 + time * 1.5) * 0.012 + 0.988;
    strand2 *= sin(s * 18.0 + time * 1.5 + PI) * 0.012 + 0.988;

    // Base-pair rungs masked to the band between the two centerlines.
    float stripes = softStep(0.99, 1.0, sin(s * 6.0));
    stripes *= sin(s * 24.0) * 0.04 + 0.96;

    float yMin = min(y1, y2);
    float yMax = max(y1, y2);
    float inside = softStep(yMin - 0.005, yMin, pos.y)
        * softStep(yMax + 0.005, yMax, pos.y);

    float visibility = softStep(-0.4, 0.8, abs(z1));
    float rungSize = mix(0.5, 1.4, (depth1 + depth2) * 0.5);
    float rungCore = inside * stripes * visibility * rungSize;
    float rungs = (rungCore * 0.7 + rungCore * 1.8 * 0.25) * 0.6;

    return strand1 + strand2 + rungs;
}

void main() {
    vec2 fragCoord = gl_FragCoord.xy;
    vec2 baseUv = (2.0 * fragCoord - ubo.resolution.xy) / ubo.resolution.y;
    if (ubo.parallax.z > 0.5) {
        baseUv += ubo.parallax.xy;
    }

    float bendY = 0.0;
    if (ubo.bend.z > 0.5) {
        vec2 pointerUv = (2.0 * ubo.pointer.xy - ubo.resolution.xy) / ubo.resolution.y;
        pointerUv.y = -pointerUv.y;
        vec2 d = baseUv - pointerUv;
        bendY = (pointerUv.y - baseUv.y) * exp(-dot(d, d) * ubo.bend.x)
            * ubo.bend.y * ubo.animation.z;
    }

    float time = ubo.animation.x * ubo.animation.y;
    vec3 col = vec3(0.0);

    for (int wave = 0; wave < 3; ++wave) {
        int count = wave == 0 ? ubo.counts.x : (wave == 1 ? ubo.counts.y : ubo.counts.z);
        if (count <= 0) {
            continue;
        }

        vec4 params = ubo.waves[wave];
        float phaseBase = wave == 0 ? 1.0 : (wave == 1 ? 2.0 : 1.5);
        float phaseStep = wave == 1 ? 0.15 : 0.2;
        float scale = wave == 0 ? 0.8 : 1.0;

        for (int i = 0; i < count; ++i) {
            float fi = float(i);
            vec2 ruv = baseUv * rotate(params.w * 0.5);
            if (wave == 0) {
                ruv.x = -ruv.x;
            }
            vec2 pos = ruv + vec2(params.x * fi + params.y, params.z);

            float intensity = strandField(pos, phaseBase + phaseStep * fi, time, bendY);
            vec3 tint = mix(vec3(0.4, 0.2, 0.7), vec3(0.6, 0.4, 0.85),
                depthSeed(wave, baseUv, fi));
            col += gradientColor(strandT(i, count)) * tint * intensity * scale;
        }
    }

    float opacity = ubo.animation.w;
    float alpha = clamp(max(col.r, max(col.g, col.b)), 0.0, 1.0);
    outColor = vec4(col * opacity, alpha * opacity);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_declares_the_uniform_block_fields() {
        for field in [
            "vec4 resolution",
            "vec4 animation",
            "vec4 pointer",
            "vec4 parallax",
            "vec4 bend",
            "ivec4 counts",
            "vec4 waves[3]",
            "vec4 gradient[8]",
        ] {
            assert!(
                HELIX_FRAGMENT_GLSL.contains(field),
                "missing uniform field: {field}"
            );
        }
    }

    #[test]
    fn fragment_avoids_builtin_smoothstep() {
        // The reversed-edge rung mask is undefined under `smoothstep`; the
        // port must only use the explicit ramp.
        assert!(!HELIX_FRAGMENT_GLSL.contains("smoothstep"));
        assert!(HELIX_FRAGMENT_GLSL.contains("softStep"));
    }
}
