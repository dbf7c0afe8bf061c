//! WGSL sources for the `wgpu` backend.

/// Full per-pixel grade: placement, detail, tone, bands, LUT, vignette.
///
/// Mirrors `gridtone_ops::Pipeline::shade` stage for stage. The source is
/// RGBA `f32`, the LUT is RGB triplets stored red-fastest.
pub const GRADE: &str = r#"
struct Params {
    dims: vec4<u32>,        // out_w, out_h, tex_w, tex_h
    quad: vec4<f32>,        // origin.xy, size.xy
    tone: vec4<f32>,        // brightness, contrast, saturation, has_hue
    amounts: vec4<f32>,     // sharpness, structure, vignette_size, vignette_sharpness
    sigmas: vec4<f32>,      // sharp spatial/range, structure spatial/range
    midtone: vec4<f32>,     // center, width, threshold, lut_size
    hue0: vec4<f32>,
    hue1: vec4<f32>,
    hue2: vec4<f32>,
    lut_min: vec4<f32>,
    lut_max: vec4<f32>,
    bands: array<vec4<f32>, 6>, // hue, saturation, lightness, center
}

@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> p: Params;
@group(0) @binding(3) var<storage, read> lut: array<f32>;

const TAU: f32 = 6.28318530718;
const LUMA: vec3<f32> = vec3<f32>(0.299, 0.587, 0.114);
const BAND_SIGMA: f32 = 0.261799387799;

fn texel(x: u32, y: u32) -> vec3<f32> {
    let i = (y * p.dims.z + x) * 4u;
    return vec3<f32>(src[i], src[i + 1u], src[i + 2u]);
}

// Pixel-centered bilinear sample, clamped to the edge.
fn sample_at(x: f32, y: f32) -> vec3<f32> {
    let max_x = f32(p.dims.z - 1u);
    let max_y = f32(p.dims.w - 1u);
    let fx = clamp(x - 0.5, 0.0, max_x);
    let fy = clamp(y - 0.5, 0.0, max_y);
    let x0 = u32(floor(fx));
    let y0 = u32(floor(fy));
    let x1 = min(x0 + 1u, p.dims.z - 1u);
    let y1 = min(y0 + 1u, p.dims.w - 1u);
    let tx = fx - f32(x0);
    let ty = fy - f32(y0);
    let top = mix(texel(x0, y0), texel(x1, y0), tx);
    let bottom = mix(texel(x0, y1), texel(x1, y1), tx);
    return mix(top, bottom, ty);
}

fn bilateral13(x: f32, y: f32, ss: f32, sr: f32) -> vec3<f32> {
    var taps = array<vec2<f32>, 13>(
        vec2<f32>(0.0, 0.0), vec2<f32>(1.0, 0.0), vec2<f32>(-1.0, 0.0),
        vec2<f32>(0.0, 1.0), vec2<f32>(0.0, -1.0), vec2<f32>(2.0, 0.0),
        vec2<f32>(-2.0, 0.0), vec2<f32>(0.0, 2.0), vec2<f32>(0.0, -2.0),
        vec2<f32>(1.0, 1.0), vec2<f32>(-1.0, 1.0), vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, -1.0),
    );
    let center = sample_at(x, y);
    let center_y = dot(center, LUMA);
    let two_s2 = 2.0 * ss * ss;
    let two_r2 = 2.0 * sr * sr;
    var acc = vec3<f32>(0.0);
    var wsum = 0.0;
    for (var i = 0u; i < 13u; i = i + 1u) {
        let o = taps[i];
        let s = sample_at(x + o.x * ss, y + o.y * ss);
        let dy = dot(s, LUMA) - center_y;
        let w = exp(-dot(o, o) / two_s2) * exp(-(dy * dy) / two_r2);
        acc = acc + w * (s - center);
        wsum = wsum + w;
    }
    return center + acc / max(wsum, 1e-6);
}

fn soft_threshold(v: f32, t: f32) -> f32 {
    let a = abs(v);
    if a <= t { return 0.0; }
    return (a - t) * sign(v);
}

fn rgb_to_hsl(c: vec3<f32>) -> vec3<f32> {
    let mx = max(max(c.r, c.g), c.b);
    let mn = min(min(c.r, c.g), c.b);
    let l = (mx + mn) * 0.5;
    let d = mx - mn;
    if d < 1e-6 { return vec3<f32>(0.0, 0.0, l); }
    var s: f32;
    if l > 0.5 { s = d / (2.0 - mx - mn); } else { s = d / (mx + mn); }
    var h: f32;
    if mx == c.r {
        h = (c.g - c.b) / d + select(0.0, 6.0, c.g < c.b);
    } else if mx == c.g {
        h = (c.b - c.r) / d + 2.0;
    } else {
        h = (c.r - c.g) / d + 4.0;
    }
    return vec3<f32>(h / 6.0 * TAU, s, l);
}

fn hue_to_rgb(pp: f32, q: f32, t_in: f32) -> f32 {
    var t = t_in;
    if t < 0.0 { t = t + 1.0; }
    if t > 1.0 { t = t - 1.0; }
    if t < 1.0 / 6.0 { return pp + (q - pp) * 6.0 * t; }
    if t < 0.5 { return q; }
    if t < 2.0 / 3.0 { return pp + (q - pp) * (2.0 / 3.0 - t) * 6.0; }
    return pp;
}

fn hsl_to_rgb(hsl: vec3<f32>) -> vec3<f32> {
    let h = hsl.x / TAU;
    let s = clamp(hsl.y, 0.0, 1.0);
    let l = clamp(hsl.z, 0.0, 1.0);
    if s == 0.0 { return vec3<f32>(l); }
    var q: f32;
    if l < 0.5 { q = l * (1.0 + s); } else { q = l + s - l * s; }
    let pp = 2.0 * l - q;
    return vec3<f32>(
        hue_to_rgb(pp, q, h + 1.0 / 3.0),
        hue_to_rgb(pp, q, h),
        hue_to_rgb(pp, q, h - 1.0 / 3.0),
    );
}

fn apply_bands(c: vec3<f32>) -> vec3<f32> {
    var hsl = rgb_to_hsl(c);
    for (var i = 0u; i < 6u; i = i + 1u) {
        let b = p.bands[i];
        let d0 = abs(hsl.x - b.w);
        let z = min(d0, TAU - d0) / BAND_SIGMA;
        let w = exp(-0.5 * z * z);
        hsl = hsl + b.xyz * w;
    }
    if hsl.x < 0.0 { hsl.x = hsl.x + TAU; }
    if hsl.x >= TAU { hsl.x = hsl.x - TAU; }
    return hsl_to_rgb(vec3<f32>(hsl.x, clamp(hsl.y, 0.0, 1.0), clamp(hsl.z, 0.0, 1.0)));
}

fn lut_at(r: u32, g: u32, b: u32) -> vec3<f32> {
    let n = u32(p.midtone.w);
    let i = (r + g * n + b * n * n) * 3u;
    return vec3<f32>(lut[i], lut[i + 1u], lut[i + 2u]);
}

fn apply_lut(c: vec3<f32>) -> vec3<f32> {
    let n = u32(p.midtone.w);
    let span = p.lut_max.xyz - p.lut_min.xyz;
    let safe = select(span, vec3<f32>(1.0), abs(span) <= vec3<f32>(1.1920929e-7));
    let norm = select((c - p.lut_min.xyz) / safe, vec3<f32>(0.0), abs(span) <= vec3<f32>(1.1920929e-7));
    let v = clamp(norm, vec3<f32>(0.0), vec3<f32>(1.0)) * f32(n - 1u);
    let i0 = min(vec3<u32>(floor(v)), vec3<u32>(n - 2u));
    let f = v - vec3<f32>(i0);
    let c00 = mix(lut_at(i0.x, i0.y, i0.z), lut_at(i0.x + 1u, i0.y, i0.z), f.x);
    let c01 = mix(lut_at(i0.x, i0.y, i0.z + 1u), lut_at(i0.x + 1u, i0.y, i0.z + 1u), f.x);
    let c10 = mix(lut_at(i0.x, i0.y + 1u, i0.z), lut_at(i0.x + 1u, i0.y + 1u, i0.z), f.x);
    let c11 = mix(lut_at(i0.x, i0.y + 1u, i0.z + 1u), lut_at(i0.x + 1u, i0.y + 1u, i0.z + 1u), f.x);
    return mix(mix(c00, c10, f.y), mix(c01, c11, f.y), f.z);
}

fn smoothstep_safe(e0: f32, e1: f32, x: f32) -> f32 {
    let span = e1 - e0;
    if span == 0.0 { return select(1.0, 0.0, x < e0); }
    let t = clamp((x - e0) / span, 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

@compute @workgroup_size(8, 8)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    if id.x >= p.dims.x || id.y >= p.dims.y { return; }
    let base = (id.y * p.dims.x + id.x) * 4u;

    let px = vec2<f32>(f32(id.x) + 0.5, f32(id.y) + 0.5);
    let uv = (px - p.quad.xy) / p.quad.zw;
    if uv.x < 0.0 || uv.x >= 1.0 || uv.y < 0.0 || uv.y >= 1.0 {
        dst[base] = 0.0;
        dst[base + 1u] = 0.0;
        dst[base + 2u] = 0.0;
        dst[base + 3u] = 0.0;
        return;
    }

    let sx = uv.x * f32(p.dims.z);
    let sy = uv.y * f32(p.dims.w);
    var c = sample_at(sx, sy);

    // Tone
    c = c * p.tone.x;
    c = (c - 0.5) * p.tone.y + 0.5;
    let y = dot(c, LUMA);
    c = mix(vec3<f32>(y), c, p.tone.z);
    if p.tone.w != 0.0 {
        c = vec3<f32>(dot(p.hue0.xyz, c), dot(p.hue1.xyz, c), dot(p.hue2.xyz, c));
    }
    c = apply_bands(c);

    // Detail
    let sharpness = p.amounts.x;
    let structure = p.amounts.y;
    if sharpness != 0.0 || structure != 0.0 {
        let src_y = dot(sample_at(sx, sy), LUMA);
        let fine_d = src_y - dot(bilateral13(sx, sy, p.sigmas.x, p.sigmas.y), LUMA);
        let mid_d = src_y - dot(bilateral13(sx, sy, p.sigmas.z, p.sigmas.w), LUMA);
        let fine = soft_threshold(fine_d, p.midtone.z);
        let zm = (src_y - p.midtone.x) / max(p.midtone.y, 1e-6);
        let mid = soft_threshold(mid_d, p.midtone.z) * exp(-0.5 * zm * zm);
        let y_out = y + sharpness * fine + structure * mid;
        var gain = 1.0;
        if y > 1e-6 { gain = y_out / y; }
        c = c * gain;
    }
    c = clamp(c, vec3<f32>(0.0), vec3<f32>(1.0));

    if p.midtone.w >= 2.0 {
        c = apply_lut(c);
    }

    let vs = p.amounts.z;
    let vh = p.amounts.w;
    if vs != 0.0 || vh != 0.0 {
        let screen = px / vec2<f32>(f32(p.dims.x), f32(p.dims.y));
        let dist = length(screen - vec2<f32>(0.5));
        c = c * smoothstep_safe(0.8, vh * 0.799, dist * (vs + vh));
    }

    dst[base] = c.r;
    dst[base + 1u] = c.g;
    dst[base + 2u] = c.b;
    dst[base + 3u] = 1.0;
}
"#;
