use serde::{Deserialize, Serialize};

use crate::foundation::error::{LeafletError, LeafletResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// How a layer's colors combine with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    Normal,
    /// Source-over with `B(s, d) = s * d`; darkens, never lightens.
    Multiply,
}

/// Composite premultiplied RGBA8 `src` over `dst` in place.
///
/// `opacity` is clamped to `[0, 1]`; at zero `dst` is left untouched.
pub(crate) fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    blend: BlendMode,
    opacity: f32,
) -> LeafletResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LeafletError::evaluation(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    let opacity = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };

    // One dispatch per layer, not per pixel.
    match blend {
        BlendMode::Normal => over_in_place(dst, src, opacity),
        BlendMode::Multiply => blend_in_place(dst, src, opacity, |s, d| s * d),
    }
    Ok(())
}

fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
}

// out_a = sa + da * (1 - sa)
// out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
#[inline(always)]
fn blend_in_place<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = f32::from(s[3]) / 255.0 * opacity;
        if sa <= 0.0 {
            continue;
        }
        let da = f32::from(d[3]) / 255.0;
        let inv_sa = 1.0 - sa;

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0 * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let sc = unpremul(sp, sa);
            let dc = unpremul(dp, da);
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
            d[c] = to_u8(out);
        }
        d[3] = to_u8((sa + da * inv_sa).clamp(0.0, 1.0));
    }
}

#[inline(always)]
fn unpremul(p: f32, a: f32) -> f32 {
    if a > 0.0 { (p / a).clamp(0.0, 1.0) } else { 0.0 }
}

#[inline(always)]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
