//! Color types and palettes.
//!
//! RGBA is the storage format for every mark. HSLA exists so discrete
//! palettes can be spaced evenly around the hue wheel.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Low end of the default continuous colour gradient.
    pub const GRADIENT_LOW: Self = Self::rgb(0x13, 0x2B, 0x43);
    /// High end of the default continuous colour gradient.
    pub const GRADIENT_HIGH: Self = Self::rgb(0x56, 0xB1, 0xF7);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Scale the alpha channel by an opacity in `[0, 1]`.
    #[must_use]
    pub fn fade(self, opacity: f32) -> Self {
        self.with_alpha((f32::from(self.a) * opacity.clamp(0.0, 1.0)) as u8)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;

        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// HSLA color with floating-point components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsla {
    /// Hue (0.0-360.0 degrees).
    pub h: f32,
    /// Saturation (0.0-1.0).
    pub s: f32,
    /// Lightness (0.0-1.0).
    pub l: f32,
    /// Alpha (0.0-1.0).
    pub a: f32,
}

impl Hsla {
    /// Create a new HSLA color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Create an opaque HSL color (alpha = 1.0).
    #[must_use]
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Convert to RGBA.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let (s, l) = (self.s.clamp(0.0, 1.0), self.l.clamp(0.0, 1.0));

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_channel(p, q, h + 1.0 / 3.0),
                hue_channel(p, q, h),
                hue_channel(p, q, h - 1.0 / 3.0),
            )
        };

        let to_byte = |v: f32| (v * 255.0).round() as u8;
        Rgba::new(to_byte(r), to_byte(g), to_byte(b), to_byte(self.a.clamp(0.0, 1.0)))
    }
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        hsla.to_rgba()
    }
}

/// `n` colours evenly spaced around the hue wheel, starting at 15 degrees.
///
/// Used for discrete colour mappings.
#[must_use]
pub fn hue_palette(n: usize) -> Vec<Rgba> {
    (0..n)
        .map(|i| Hsla::hsl(15.0 + 360.0 * i as f32 / n as f32, 0.65, 0.55).to_rgba())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::BLUE.b, 255);
    }

    #[test]
    fn test_rgba_lerp_endpoints_and_clamp() {
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 1.0), Rgba::WHITE);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -2.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 0.5).r, 128);
    }

    #[test]
    fn test_rgba_fade() {
        assert_eq!(Rgba::RED.fade(0.5).a, 127);
        assert_eq!(Rgba::RED.fade(2.0).a, 255);
    }

    #[test]
    fn test_hsla_primaries() {
        assert_eq!(Hsla::hsl(0.0, 1.0, 0.5).to_rgba(), Rgba::RED);
        assert_eq!(Hsla::hsl(120.0, 1.0, 0.5).to_rgba(), Rgba::GREEN);
        assert_eq!(Hsla::hsl(240.0, 1.0, 0.5).to_rgba(), Rgba::BLUE);
        assert_eq!(Hsla::hsl(360.0, 1.0, 0.5).to_rgba(), Rgba::RED);
    }

    #[test]
    fn test_hsla_grey() {
        let grey = Hsla::hsl(42.0, 0.0, 0.5).to_rgba();
        assert_eq!((grey.r, grey.g, grey.b), (128, 128, 128));
    }

    #[test]
    fn test_from_hsla() {
        let rgba: Rgba = Hsla::hsl(0.0, 1.0, 0.5).into();
        assert_eq!(rgba, Rgba::RED);
    }

    #[test]
    fn test_hue_palette_distinct() {
        let palette = hue_palette(4);
        assert_eq!(palette.len(), 4);
        for (i, a) in palette.iter().enumerate() {
            assert_eq!(a.a, 255);
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(hue_palette(0).is_empty());
    }
}
