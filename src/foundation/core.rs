pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: premul_channel(r, a),
            g: premul_channel(g, a),
            b: premul_channel(b, a),
            a,
        }
    }
}

pub(crate) fn premul_channel(c: u8, a: u8) -> u8 {
    let c = u16::from(c);
    let a = u16::from(a);
    (((c * a) + 127) / 255) as u8
}

/// Inverse of [`premul_channel`] with rounding; identity for a == 255.
pub(crate) fn unpremul_channel(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let c = u32::from(c);
    let a = u32::from(a);
    ((c * 255 + a / 2) / a).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premul_opaque_is_identity() {
        let c = Rgba8Premul::from_straight_rgba(10, 128, 255, 255);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 128, 255, 255));
    }

    #[test]
    fn unpremul_roundtrips_premul() {
        for a in [1u8, 17, 128, 200, 255] {
            for c in [0u8, 1, 63, 127, 254, 255] {
                let p = premul_channel(c, a);
                let back = unpremul_channel(p, a);
                // Premultiplication quantizes; the round trip stays within a step.
                let step = (255 / u16::from(a).max(1)) as i32 + 1;
                assert!((i32::from(back) - i32::from(c)).abs() <= step);
            }
        }
    }
}
