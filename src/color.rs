/// Color space of an [`Image`](crate::Image) or [`Palette`](crate::Palette).
///
/// Individual colors never carry a space tag; the space is a property of the
/// container, and mixing spaces is rejected at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Device-referred sRGB, channels in [0, 255].
    Srgb,
    /// CIELAB under D65, L* in [0, 100], a*/b* roughly in [-128, 127].
    Lab,
}

/// A three-component color. Components are sRGB intensities or (L*, a*, b*)
/// depending on the containing image or palette.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const fn new(c0: f32, c1: f32, c2: f32) -> Self {
        Self([c0, c1, c2])
    }

    /// Construct from 8-bit sRGB channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32, g as f32, b as f32])
    }

    /// Round and clamp to 8-bit sRGB channels.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            self.0[0].round().clamp(0.0, 255.0) as u8,
            self.0[1].round().clamp(0.0, 255.0) as u8,
            self.0[2].round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Squared Euclidean distance in the containing space.
    pub fn distance_sq(self, other: Self) -> f32 {
        let d0 = self.0[0] - other.0[0];
        let d1 = self.0[1] - other.0[1];
        let d2 = self.0[2] - other.0[2];
        d0 * d0 + d1 * d1 + d2 * d2
    }
}
