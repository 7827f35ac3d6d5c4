//! Native fragment routines backing [`crate::CpuHost`].
//!
//! Coordinates are in input texel space with pixel centers at `i + 0.5`. Colors are premultiplied
//! RGBA in `0..=1`.

use std::f32::consts::TAU;

use rayon::prelude::*;

use crate::{
    foundation::core::SurfaceId,
    foundation::error::{FxError, FxResult},
    foundation::math::{smoothstep, unit_to_u8},
    pass::uniforms::{UniformStore, UniformType},
    render::host::ProgramKind,
};

type Rgba = [f32; 4];

const TRANSPARENT: Rgba = [0.0; 4];

// Taps on each side of a tilt-shift sample line.
const TILT_SHIFT_TAPS: i32 = 30;
const MAX_GLOW_DISTANCE: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AddressMode {
    ClampToEdge,
    Transparent,
}

/// Read-only view of an RGBA8 premultiplied buffer.
#[derive(Clone, Copy)]
pub(crate) struct Texture<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> Texture<'a> {
    pub(crate) fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            data,
            width,
            height,
        }
    }

    fn texel(&self, x: i64, y: i64, mode: AddressMode) -> Rgba {
        if self.width == 0 || self.height == 0 {
            return TRANSPARENT;
        }
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        let (x, y) = match mode {
            AddressMode::ClampToEdge => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            AddressMode::Transparent => {
                if x < 0 || y < 0 || x >= w || y >= h {
                    return TRANSPARENT;
                }
                (x, y)
            }
        };
        let idx = ((y * w + x) as usize) * 4;
        let px = &self.data[idx..idx + 4];
        [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        ]
    }

    /// Bilinear sample at texel-space position `(x, y)`.
    pub(crate) fn sample(&self, x: f32, y: f32, mode: AddressMode) -> Rgba {
        // Anything beyond one texel outside the edge samples the same as the border.
        let fx = (x - 0.5).clamp(-2.0, self.width as f32 + 1.0);
        let fy = (y - 0.5).clamp(-2.0, self.height as f32 + 1.0);
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (xi, yi) = (x0 as i64, y0 as i64);

        let c00 = self.texel(xi, yi, mode);
        let c10 = self.texel(xi + 1, yi, mode);
        let c01 = self.texel(xi, yi + 1, mode);
        let c11 = self.texel(xi + 1, yi + 1, mode);

        let mut out = TRANSPARENT;
        for c in 0..4 {
            let top = c00[c] + (c10[c] - c00[c]) * tx;
            let bottom = c01[c] + (c11[c] - c01[c]) * tx;
            out[c] = top + (bottom - top) * ty;
        }
        out
    }

    fn alpha(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y, AddressMode::Transparent)[3]
    }
}

/// A program with its uniforms resolved for one draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Shader {
    Copy,
    Kawase {
        offset: [f32; 2],
        mode: AddressMode,
    },
    Extract {
        threshold: f32,
    },
    BloomCombine {
        map: SurfaceId,
        bloom_scale: f32,
        brightness: f32,
    },
    DropShadow {
        offset: [f32; 2],
        color: [f32; 3],
        alpha: f32,
    },
    TiltShift {
        blur: f32,
        gradient_blur: f32,
        start: [f32; 2],
        end: [f32; 2],
        delta: [f32; 2],
    },
    Outline {
        thickness: [f32; 2],
        color: [f32; 3],
        alpha: f32,
        angle_step: f32,
        knockout: bool,
    },
    Glow {
        distance: f32,
        inner: f32,
        outer: f32,
        color: [f32; 3],
        alpha: f32,
        angle_step: f32,
        knockout: bool,
    },
}

fn uniform<T: UniformType>(u: &UniformStore, kind: ProgramKind, name: &str) -> FxResult<T> {
    u.typed::<T>(name).ok_or_else(|| {
        FxError::host(format!(
            "program '{}' requires uniform `{name}`",
            kind.label()
        ))
    })
}

impl Shader {
    pub(crate) fn resolve(kind: ProgramKind, u: &UniformStore) -> FxResult<Self> {
        Ok(match kind {
            ProgramKind::Copy => Self::Copy,
            ProgramKind::KawaseBlur | ProgramKind::KawaseBlurClamp => Self::Kawase {
                offset: uniform(u, kind, "uOffset")?,
                mode: if kind == ProgramKind::KawaseBlurClamp {
                    AddressMode::ClampToEdge
                } else {
                    AddressMode::Transparent
                },
            },
            ProgramKind::BrightnessExtract => Self::Extract {
                threshold: uniform(u, kind, "uThreshold")?,
            },
            ProgramKind::BloomCombine => {
                let map: Option<SurfaceId> = uniform(u, kind, "uMapTexture")?;
                Self::BloomCombine {
                    map: map.ok_or_else(|| {
                        FxError::host("bloom-combine drawn without `uMapTexture` bound")
                    })?,
                    bloom_scale: uniform(u, kind, "uBloomScale")?,
                    brightness: uniform(u, kind, "uBrightness")?,
                }
            }
            ProgramKind::DropShadow => Self::DropShadow {
                offset: uniform(u, kind, "uOffset")?,
                color: uniform(u, kind, "uColor")?,
                alpha: uniform(u, kind, "uAlpha")?,
            },
            ProgramKind::TiltShiftAxis => {
                let [blur, gradient_blur]: [f32; 2] = uniform(u, kind, "uBlur")?;
                Self::TiltShift {
                    blur,
                    gradient_blur,
                    start: uniform(u, kind, "uStart")?,
                    end: uniform(u, kind, "uEnd")?,
                    delta: uniform(u, kind, "uDelta")?,
                }
            }
            ProgramKind::Outline => Self::Outline {
                thickness: uniform(u, kind, "uThickness")?,
                color: uniform(u, kind, "uColor")?,
                alpha: uniform(u, kind, "uAlpha")?,
                angle_step: uniform(u, kind, "uAngleStep")?,
                knockout: uniform::<f32>(u, kind, "uKnockout")? > 0.5,
            },
            ProgramKind::Glow => {
                let [inner, outer]: [f32; 2] = uniform(u, kind, "uStrength")?;
                Self::Glow {
                    distance: uniform(u, kind, "uDistance")?,
                    inner,
                    outer,
                    color: uniform(u, kind, "uColor")?,
                    alpha: uniform(u, kind, "uAlpha")?,
                    angle_step: uniform(u, kind, "uAngleStep")?,
                    knockout: uniform::<f32>(u, kind, "uKnockout")? > 0.5,
                }
            }
        })
    }

    /// Extra sampler the shader reads besides its primary input.
    pub(crate) fn map_texture(&self) -> Option<SurfaceId> {
        match self {
            Self::BloomCombine { map, .. } => Some(*map),
            _ => None,
        }
    }

    fn shade(&self, src: &Texture<'_>, map: Option<&Texture<'_>>, x: f32, y: f32) -> Rgba {
        match *self {
            Self::Copy => src.sample(x, y, AddressMode::ClampToEdge),
            Self::Kawase { offset, mode } => {
                let [ox, oy] = offset;
                let taps = [
                    src.sample(x - ox, y + oy, mode),
                    src.sample(x + ox, y + oy, mode),
                    src.sample(x + ox, y - oy, mode),
                    src.sample(x - ox, y - oy, mode),
                ];
                let mut out = TRANSPARENT;
                for t in taps {
                    for c in 0..4 {
                        out[c] += t[c] * 0.25;
                    }
                }
                out
            }
            Self::Extract { threshold } => {
                let c = src.sample(x, y, AddressMode::ClampToEdge);
                let max = c[0].max(c[1]).max(c[2]);
                let min = c[0].min(c[1]).min(c[2]);
                if (max + min) * 0.5 > threshold {
                    c
                } else {
                    TRANSPARENT
                }
            }
            Self::BloomCombine {
                bloom_scale,
                brightness,
                ..
            } => {
                let base = src.sample(x, y, AddressMode::ClampToEdge);
                let bloom = match map {
                    Some(m) => {
                        let sx = m.width as f32 / src.width.max(1) as f32;
                        let sy = m.height as f32 / src.height.max(1) as f32;
                        m.sample(x * sx, y * sy, AddressMode::ClampToEdge)
                    }
                    None => TRANSPARENT,
                };
                let mut out = [0.0, 0.0, 0.0, base[3]];
                for c in 0..3 {
                    let a = (base[c] * brightness).clamp(0.0, 1.0);
                    let b = (bloom[c] * bloom_scale).clamp(0.0, 1.0);
                    // Screen blend.
                    out[c] = a + b - a * b;
                    out[3] = out[3].max(out[c]);
                }
                out
            }
            Self::DropShadow {
                offset,
                color,
                alpha,
            } => {
                let a = src.alpha(x - offset[0], y - offset[1]) * alpha;
                [color[0] * a, color[1] * a, color[2] * a, a]
            }
            Self::TiltShift {
                blur,
                gradient_blur,
                start,
                end,
                delta,
            } => {
                let nx = start[1] - end[1];
                let ny = end[0] - start[0];
                let len = (nx * nx + ny * ny).sqrt();
                if !(len > 0.0) || !(blur > 0.0) {
                    return src.sample(x, y, AddressMode::ClampToEdge);
                }
                let (nx, ny) = (nx / len, ny / len);
                let dist = ((x - start[0]) * nx + (y - start[1]) * ny).abs();
                let ramp = if gradient_blur > 0.0 {
                    smoothstep(0.0, 1.0, dist / gradient_blur)
                } else {
                    1.0
                };
                let radius = ramp * blur;

                let mut acc = TRANSPARENT;
                let mut total = 0.0;
                for t in -TILT_SHIFT_TAPS..=TILT_SHIFT_TAPS {
                    let percent = t as f32 / TILT_SHIFT_TAPS as f32;
                    let weight = 1.0 - percent.abs();
                    let s = src.sample(
                        x + delta[0] * percent * radius,
                        y + delta[1] * percent * radius,
                        AddressMode::ClampToEdge,
                    );
                    for c in 0..4 {
                        acc[c] += s[c] * weight;
                    }
                    total += weight;
                }
                acc.map(|v| v / total)
            }
            Self::Outline {
                thickness,
                color,
                alpha,
                angle_step,
                knockout,
            } => {
                let content = src.sample(x, y, AddressMode::Transparent);
                let step = if angle_step > 0.0 { angle_step } else { TAU };
                let mut max_alpha: f32 = 0.0;
                let mut angle: f32 = 0.0;
                while angle <= TAU {
                    let a = src.alpha(
                        x + thickness[0] * angle.cos(),
                        y + thickness[1] * angle.sin(),
                    );
                    max_alpha = max_alpha.max(a);
                    angle += step;
                }
                let oa = max_alpha * alpha * (1.0 - content[3]);
                let outline = [color[0] * oa, color[1] * oa, color[2] * oa, oa];
                if knockout {
                    outline
                } else {
                    let mut out = content;
                    for c in 0..4 {
                        out[c] += outline[c];
                    }
                    out
                }
            }
            Self::Glow {
                distance,
                inner,
                outer,
                color,
                alpha,
                angle_step,
                knockout,
            } => {
                let own = src.sample(x, y, AddressMode::Transparent);
                let steps = (distance.round().max(0.0) as u32).min(MAX_GLOW_DISTANCE);
                let step = if angle_step > 0.0 { angle_step } else { TAU };
                let glow = [color[0] * alpha, color[1] * alpha, color[2] * alpha, alpha];

                let mut total_alpha = 0.0;
                let mut max_total_alpha: f32 = 0.0;
                let mut angle: f32 = 0.0;
                while angle <= TAU {
                    let (dx, dy) = (angle.cos(), angle.sin());
                    for d in 1..=steps {
                        let w = steps as f32 - d as f32;
                        total_alpha += w * src.alpha(x + dx * d as f32, y + dy * d as f32);
                        max_total_alpha += w;
                    }
                    angle += step;
                }
                let ratio = total_alpha / max_total_alpha.max(0.0001);

                let inner_strength = ((1.0 - ratio) * inner * own[3]).min(1.0);
                let mut inner_color = own;
                for c in 0..4 {
                    inner_color[c] = own[c] + (glow[c] - own[c]) * inner_strength;
                }
                let outer_strength = (ratio * outer * (1.0 - own[3])).min(1.0 - inner_color[3]);

                if knockout {
                    let a = (inner_strength + outer_strength).clamp(0.0, 1.0);
                    [glow[0] * a, glow[1] * a, glow[2] * a, a * alpha]
                } else {
                    [
                        inner_color[0] + glow[0] * outer_strength,
                        inner_color[1] + glow[1] * outer_strength,
                        inner_color[2] + glow[2] * outer_strength,
                        inner_color[3] + outer_strength * alpha,
                    ]
                }
            }
        }
    }
}

/// Shade every pixel of a `width * height` RGBA8 output, one row per rayon task.
pub(crate) fn shade_into(
    shader: &Shader,
    src: &Texture<'_>,
    map: Option<&Texture<'_>>,
    out: &mut [u8],
    width: u32,
    height: u32,
) {
    if width == 0 || height == 0 {
        return;
    }
    let sx = src.width as f32 / width as f32;
    let sy = src.height as f32 / height as f32;
    let row_bytes = (width as usize) * 4;

    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let py = (y as f32 + 0.5) * sy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let c = shader.shade(src, map, (x as f32 + 0.5) * sx, py);
                for (dst, v) in px.iter_mut().zip(c) {
                    *dst = unit_to_u8(v);
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/shade.rs"]
mod tests;
