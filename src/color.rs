use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::lerp;

/// Straight-alpha color with 8-bit channels and a unit-interval alpha, the
/// shape every accent/token color flows through before rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> CardResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> CardResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CardError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            6 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: 1.0,
            }),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: f32::from(hex_byte(&s[6..8])?) / 255.0,
            }),
            _ => Err(CardError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    /// Lenient parse for record-supplied colors; bad input degrades to the
    /// fallback instead of failing the render.
    pub fn from_hex_or(s: &str, fallback: Rgba) -> Self {
        Self::from_hex(s).unwrap_or(fallback)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn scale_alpha(self, f: f32) -> Self {
        self.with_alpha(self.a * f)
    }

    pub fn mix(self, other: Rgba, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| lerp(f64::from(a), f64::from(b), t).round() as u8;
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: lerp(f64::from(self.a), f64::from(other.a), t) as f32,
        }
    }

    pub fn to_premul(self) -> Rgba8Premul {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }

    pub(crate) fn to_peniko(self) -> vello_cpu::peniko::Color {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rgb_roundtrips_channels_and_alpha() {
        let c = Rgba::from_hex("#2dd4bf").unwrap().with_alpha(0.4);
        assert_eq!((c.r, c.g, c.b), (0x2d, 0xd4, 0xbf));
        assert!((c.a - 0.4).abs() < 1e-6);

        let c = Rgba::from_hex("0000ff80").unwrap();
        assert_eq!(c.b, 255);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_rejects_malformed_input() {
        assert!(Rgba::from_hex("#12345").is_err());
        assert!(Rgba::from_hex("#zzzzzz").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn from_hex_or_falls_back() {
        let fb = Rgba::rgb(1, 2, 3);
        assert_eq!(Rgba::from_hex_or("not-a-color", fb), fb);
        assert_ne!(Rgba::from_hex_or("#ffffff", fb), fb);
    }

    #[test]
    fn mix_endpoints() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(255, 255, 255);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5).r, 128);
    }

    #[test]
    fn premul_scales_by_alpha() {
        let p = Rgba::rgb(200, 100, 50).with_alpha(0.5).to_premul();
        assert_eq!(p.a, 128);
        assert!(p.r < 200 && p.g < 100 && p.b < 50);
    }
}
