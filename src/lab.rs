//! sRGB ↔ CIELAB conversion under a D65 reference white.
//!
//! Conversion math runs in f64 so that an 8-bit round trip through Lab stays
//! within ±1 per channel. Out-of-gamut Lab input is clamped on the way back
//! to sRGB rather than rejected.

use crate::color::{Color, ColorSpace};
use crate::error::Error;
use crate::image::Image;
use crate::palette::Palette;

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

// CIE constants: epsilon = (6/29)^3, kappa = (29/3)^3.
const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

/// Converts one sRGB color (channels in [0, 255]) to CIELAB.
pub fn srgb_to_lab(color: Color) -> Color {
    let r = srgb_to_linear(color.0[0] as f64 / 255.0);
    let g = srgb_to_linear(color.0[1] as f64 / 255.0);
    let b = srgb_to_linear(color.0[2] as f64 / 255.0);

    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Color::new(
        (116.0 * fy - 16.0) as f32,
        (500.0 * (fx - fy)) as f32,
        (200.0 * (fy - fz)) as f32,
    )
}

/// Converts one CIELAB color back to sRGB, clamping to the valid range.
pub fn lab_to_srgb(color: Color) -> Color {
    let l = color.0[0] as f64;
    let a = color.0[1] as f64;
    let b = color.0[2] as f64;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let xr = lab_f_inv(fx);
    let yr = if l > KAPPA * EPSILON {
        fy * fy * fy
    } else {
        l / KAPPA
    };
    let zr = lab_f_inv(fz);

    let x = xr * XN;
    let y = yr * YN;
    let z = zr * ZN;

    let lr = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let lg = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let lb = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    Color::new(
        (linear_to_srgb(lr) * 255.0) as f32,
        (linear_to_srgb(lg) * 255.0) as f32,
        (linear_to_srgb(lb) * 255.0) as f32,
    )
}

/// Converts a whole sRGB image to Lab space.
///
/// Returns [`Error::WrongColorSpace`] if the image is already in Lab.
pub fn image_to_lab(image: &Image) -> Result<Image, Error> {
    if image.space() != ColorSpace::Srgb {
        return Err(Error::WrongColorSpace {
            expected: ColorSpace::Srgb,
            found: image.space(),
        });
    }

    let data = image.pixels().iter().map(|&p| srgb_to_lab(p)).collect();
    Ok(Image::from_parts(
        image.width(),
        image.height(),
        ColorSpace::Lab,
        data,
    ))
}

/// Converts a Lab palette back to sRGB, preserving entry order.
///
/// Returns [`Error::WrongColorSpace`] if the palette is already in sRGB.
pub fn palette_to_srgb(palette: &Palette) -> Result<Palette, Error> {
    if palette.space() != ColorSpace::Lab {
        return Err(Error::WrongColorSpace {
            expected: ColorSpace::Lab,
            found: palette.space(),
        });
    }

    let entries = palette.entries().iter().map(|&c| lab_to_srgb(c)).collect();
    Palette::new(entries, ColorSpace::Srgb)
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(f: f64) -> f64 {
    let f3 = f * f * f;
    if f3 > EPSILON {
        f3
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}
