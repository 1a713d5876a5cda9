use crate::foundation::error::{StudioError, StudioResult};
use crate::model::blend::BlendMode;

pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra opacity multiplier, in integer arithmetic.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composites `src` onto `dst` with a canvas blend mode.
///
/// Source-over stays on the integer path; every other mode is evaluated in
/// floating point with the W3C compositing formulas.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: BlendMode, opacity: f32) -> PremulRgba8 {
    if mode == BlendMode::SourceOver {
        return over(dst, src, opacity);
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let s = to_unit(src, opacity);
    let d = to_unit(dst, 1.0);
    let (sa, da) = (s[3], d[3]);

    let out = match mode {
        BlendMode::SourceOver => return over(dst, src, opacity),
        BlendMode::SourceAtop => {
            let mut o = [0.0; 4];
            for i in 0..3 {
                o[i] = s[i] * da + d[i] * (1.0 - sa);
            }
            o[3] = da;
            o
        }
        BlendMode::DestinationOut => {
            let mut o = [0.0; 4];
            for i in 0..4 {
                o[i] = d[i] * (1.0 - sa);
            }
            o
        }
        BlendMode::Lighter => {
            let mut o = [0.0; 4];
            for i in 0..4 {
                o[i] = (s[i] + d[i]).min(1.0);
            }
            o
        }
        BlendMode::Xor => {
            let mut o = [0.0; 4];
            for i in 0..3 {
                o[i] = s[i] * (1.0 - da) + d[i] * (1.0 - sa);
            }
            o[3] = sa * (1.0 - da) + da * (1.0 - sa);
            o
        }
        mode => {
            let cs = unpremul(s);
            let cb = unpremul(d);
            let mixed = mix(mode, cb, cs);
            let mut o = [0.0; 4];
            for i in 0..3 {
                o[i] = s[i] * (1.0 - da) + d[i] * (1.0 - sa) + sa * da * mixed[i];
            }
            o[3] = sa + da * (1.0 - sa);
            o
        }
    };
    from_unit(out)
}

/// Composites a whole premultiplied layer onto `dst`.
pub fn blend_in_place(
    dst: &mut [u8],
    src: &[u8],
    mode: BlendMode,
    opacity: f32,
) -> StudioResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StudioError::render(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Premultiplied to straight alpha.
pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), a]
}

fn to_unit(px: PremulRgba8, opacity: f32) -> [f32; 4] {
    [
        f32::from(px[0]) / 255.0 * opacity,
        f32::from(px[1]) / 255.0 * opacity,
        f32::from(px[2]) / 255.0 * opacity,
        f32::from(px[3]) / 255.0 * opacity,
    ]
}

fn from_unit(px: [f32; 4]) -> PremulRgba8 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let a = q(px[3]);
    // Premultiplied color never exceeds alpha.
    [q(px[0]).min(a), q(px[1]).min(a), q(px[2]).min(a), a]
}

fn unpremul(px: [f32; 4]) -> [f32; 3] {
    if px[3] <= 0.0 {
        return [0.0; 3];
    }
    [px[0] / px[3], px[1] / px[3], px[2] / px[3]]
}

/// Blend function `B(Cb, Cs)` on straight colors.
fn mix(mode: BlendMode, cb: [f32; 3], cs: [f32; 3]) -> [f32; 3] {
    let sep = |f: fn(f32, f32) -> f32| [f(cb[0], cs[0]), f(cb[1], cs[1]), f(cb[2], cs[2])];
    match mode {
        BlendMode::Multiply => sep(|b, s| b * s),
        BlendMode::Screen => sep(screen),
        BlendMode::Overlay => sep(|b, s| hard_light(s, b)),
        BlendMode::Darken => sep(f32::min),
        BlendMode::Lighten => sep(f32::max),
        BlendMode::ColorDodge => sep(|b, s| {
            if b == 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (b / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => sep(|b, s| {
            if b >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - b) / s).min(1.0)
            }
        }),
        BlendMode::HardLight => sep(hard_light),
        BlendMode::SoftLight => sep(|b, s| {
            if s <= 0.5 {
                b - (1.0 - 2.0 * s) * b * (1.0 - b)
            } else {
                let d = if b <= 0.25 {
                    ((16.0 * b - 12.0) * b + 4.0) * b
                } else {
                    b.sqrt()
                };
                b + (2.0 * s - 1.0) * (d - b)
            }
        }),
        BlendMode::Difference => sep(|b, s| (b - s).abs()),
        BlendMode::Exclusion => sep(|b, s| b + s - 2.0 * b * s),
        BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        BlendMode::Color => set_lum(cs, lum(cb)),
        BlendMode::Luminosity => set_lum(cb, lum(cs)),
        BlendMode::SourceOver
        | BlendMode::SourceAtop
        | BlendMode::DestinationOut
        | BlendMode::Lighter
        | BlendMode::Xor => cs,
    }
}

fn screen(b: f32, s: f32) -> f32 {
    b + s - b * s
}

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b * 2.0 * s
    } else {
        screen(b, 2.0 * s - 1.0)
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > f32::EPSILON {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 && x - l > f32::EPSILON {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    if max - min <= f32::EPSILON {
        return [0.0; 3];
    }
    let scale = |v: f32| (v - min) * s / (max - min);
    [scale(c[0]), scale(c[1]), scale(c[2])]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
