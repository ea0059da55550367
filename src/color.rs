/// Color math shared by the enhancement recipes and the custom filters
///
/// The enhancers follow the classic "degenerate image" model: every
/// adjustment interpolates (or extrapolates) between the source and a
/// degenerate version of it:
/// - brightness: a black image
/// - contrast: a flat gray at the mean luma
/// - color: the grayscale image
/// - sharpness: a 3x3 smoothed image
///
/// A factor of 1.0 always returns the source unchanged. Alpha is never touched.

use image::{DynamicImage, Rgba, RgbaImage};

/// Sepia end points (shadow and highlight colors)
pub const SEPIA_DARK: [u8; 3] = [0x70, 0x42, 0x14];
pub const SEPIA_LIGHT: [u8; 3] = [0xC8, 0xB9, 0x9C];

/// ITU-R 601-2 luma in 16.16 fixed point, rounded
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
    l.min(255) as u8
}

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Interpolate from `degenerate` towards `source` by `factor`
#[inline]
fn blend_channel(degenerate: f32, source: f32, factor: f32) -> u8 {
    clamp_u8(degenerate + factor * (source - degenerate))
}

/// Rebuild a DynamicImage with the same alpha-ness as `template`
pub fn rewrap(template: &DynamicImage, rgba: RgbaImage) -> DynamicImage {
    if template.color().has_alpha() {
        DynamicImage::ImageRgba8(rgba)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }
}

/// Apply `f` to the RGB channels of every pixel, keeping alpha
pub fn map_rgb<F>(img: &DynamicImage, mut f: F) -> DynamicImage
where
    F: FnMut([u8; 3]) -> [u8; 3],
{
    let mut rgba = img.to_rgba8();
    for px in rgba.pixels_mut() {
        let [r, g, b] = f([px[0], px[1], px[2]]);
        *px = Rgba([r, g, b, px[3]]);
    }
    rewrap(img, rgba)
}

/// Scale brightness; 0.0 gives black, 1.0 the original
pub fn brightness(img: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(img, |[r, g, b]| {
        [
            blend_channel(0.0, r as f32, factor),
            blend_channel(0.0, g as f32, factor),
            blend_channel(0.0, b as f32, factor),
        ]
    })
}

/// Mean luma of the image, rounded to an integer level
pub fn mean_luma(img: &DynamicImage) -> f32 {
    let rgba = img.to_rgba8();
    let count = rgba.pixels().len() as u64;
    if count == 0 {
        return 0.0;
    }
    let total: u64 = rgba.pixels().map(|p| luma(p[0], p[1], p[2]) as u64).sum();
    (total as f64 / count as f64 + 0.5).floor() as f32
}

/// Scale contrast around the mean luma; 0.0 gives flat gray
pub fn contrast(img: &DynamicImage, factor: f32) -> DynamicImage {
    let mean = mean_luma(img);
    map_rgb(img, |[r, g, b]| {
        [
            blend_channel(mean, r as f32, factor),
            blend_channel(mean, g as f32, factor),
            blend_channel(mean, b as f32, factor),
        ]
    })
}

/// Scale saturation; 0.0 gives grayscale
pub fn color(img: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(img, |[r, g, b]| {
        let gray = luma(r, g, b) as f32;
        [
            blend_channel(gray, r as f32, factor),
            blend_channel(gray, g as f32, factor),
            blend_channel(gray, b as f32, factor),
        ]
    })
}

/// 3x3 smoothing kernel (center weighted 5, total 13); border pixels are copied
fn smooth(src: &RgbaImage) -> RgbaImage {
    const KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
    const SUM: f32 = 13.0;

    let (w, h) = src.dimensions();
    let mut out = src.clone();
    if w < 3 || h < 3 {
        return out;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut acc = [0.0f32; 3];
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let p = src.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for c in 0..3 {
                        acc[c] += p[c] as f32 * weight;
                    }
                }
            }
            let alpha = src.get_pixel(x, y)[3];
            out.put_pixel(
                x,
                y,
                Rgba([
                    clamp_u8(acc[0] / SUM),
                    clamp_u8(acc[1] / SUM),
                    clamp_u8(acc[2] / SUM),
                    alpha,
                ]),
            );
        }
    }
    out
}

/// Sharpen (factor > 1) or soften (factor < 1)
pub fn sharpness(img: &DynamicImage, factor: f32) -> DynamicImage {
    let src = img.to_rgba8();
    let degenerate = smooth(&src);
    let mut out = src.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let d = degenerate.get_pixel(x, y);
        let s = src.get_pixel(x, y);
        *px = Rgba([
            blend_channel(d[0] as f32, s[0] as f32, factor),
            blend_channel(d[1] as f32, s[1] as f32, factor),
            blend_channel(d[2] as f32, s[2] as f32, factor),
            s[3],
        ]);
    }
    rewrap(img, out)
}

/// Grayscale, expanded back to three equal channels
pub fn grayscale(img: &DynamicImage) -> DynamicImage {
    map_rgb(img, |[r, g, b]| {
        let l = luma(r, g, b);
        [l, l, l]
    })
}

/// Map luma linearly between a dark and a light color
pub fn colorize(img: &DynamicImage, dark: [u8; 3], light: [u8; 3]) -> DynamicImage {
    map_rgb(img, |[r, g, b]| {
        let t = luma(r, g, b) as f32 / 255.0;
        let mut out = [0u8; 3];
        for c in 0..3 {
            out[c] = clamp_u8(dark[c] as f32 + (light[c] as f32 - dark[c] as f32) * t);
        }
        out
    })
}

/// RGB (0..1) to HSV (0..1), hue as a fraction of a turn
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return (0.0, 0.0, v);
    }
    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

/// HSV (0..1) back to RGB (0..1)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Rotate every pixel's hue by `degrees`
///
/// Channels are truncated (not rounded) back to 8 bits.
pub fn rotate_hue(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let shift = degrees / 360.0;
    map_rgb(img, |[r, g, b]| {
        let (h, s, v) = rgb_to_hsv(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let (r, g, b) = hsv_to_rgb((h + shift).rem_euclid(1.0), s, v);
        [
            (r * 255.0).clamp(0.0, 255.0) as u8,
            (g * 255.0).clamp(0.0, 255.0) as u8,
            (b * 255.0).clamp(0.0, 255.0) as u8,
        ]
    })
}
