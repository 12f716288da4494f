use std::collections::HashMap;
use std::sync::Arc;

use vello_cpu::peniko::color::PremulRgba8;

use crate::color::Rgba;
use crate::foundation::math::{lerp, pixel_hash};

/// Synthesized paint images (gradients, glows, noise) with per-render caches.
/// The rasterizer consumes these as plain image paints.
#[derive(Default)]
pub(crate) struct PaintBank {
    glows: HashMap<GlowKey, vello_cpu::Image>,
    bases: HashMap<BaseKey, vello_cpu::Image>,
    ramps: HashMap<RampKey, vello_cpu::Image>,
    noise: HashMap<NoiseKey, vello_cpu::Image>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlowKey {
    rgb: [u8; 3],
    a0: u16,
    a1: u16,
    w: u16,
    h: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BaseKey {
    center: [u8; 3],
    edge: [u8; 3],
    w: u16,
    h: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RampKey {
    top: [u8; 4],
    bottom: [u8; 4],
    peak: u16,
    w: u16,
    h: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NoiseKey {
    seed: u64,
    w: u16,
    h: u16,
}

impl PaintBank {
    /// Elliptical 3-stop glow: `a0` at the center, `a1` halfway out, fully
    /// transparent at the edge.
    pub(crate) fn radial_glow(
        &mut self,
        color: Rgba,
        w: f64,
        h: f64,
        a0: f32,
        a1: f32,
    ) -> vello_cpu::Image {
        let (w, h) = clamp_dims(w, h);
        let key = GlowKey {
            rgb: [color.r, color.g, color.b],
            a0: quant(a0 * color.a),
            a1: quant(a1 * color.a),
            w,
            h,
        };
        if let Some(img) = self.glows.get(&key) {
            return img.clone();
        }

        let (cx, cy) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let img = synthesize(w, h, |x, y| {
            let dx = (f64::from(x) + 0.5 - cx) / cx.max(1.0);
            let dy = (f64::from(y) + 0.5 - cy) / cy.max(1.0);
            let t = (dx * dx + dy * dy).sqrt().min(1.0);
            let alpha = if t < 0.5 {
                lerp(f64::from(a0), f64::from(a1), t * 2.0)
            } else {
                lerp(f64::from(a1), 0.0, (t - 0.5) * 2.0)
            };
            premul_px(color, alpha as f32)
        });
        self.glows.insert(key, img.clone());
        img
    }

    /// Opaque radial base: `center` color in the middle falling off to `edge`
    /// at the farthest corner.
    pub(crate) fn radial_base(
        &mut self,
        center: Rgba,
        edge: Rgba,
        w: f64,
        h: f64,
    ) -> vello_cpu::Image {
        let (w, h) = clamp_dims(w, h);
        let key = BaseKey {
            center: [center.r, center.g, center.b],
            edge: [edge.r, edge.g, edge.b],
            w,
            h,
        };
        if let Some(img) = self.bases.get(&key) {
            return img.clone();
        }

        let (cx, cy) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let corner = (cx * cx + cy * cy).sqrt().max(1.0);
        let img = synthesize(w, h, |x, y| {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let t = ((dx * dx + dy * dy).sqrt() / corner).min(1.0);
            let c = center.mix(edge, t);
            premul_px(c, 1.0)
        });
        self.bases.insert(key, img.clone());
        img
    }

    /// Vertical two-color ramp, `top` at y=0 to `bottom` at y=h.
    pub(crate) fn ramp2(&mut self, top: Rgba, bottom: Rgba, w: f64, h: f64) -> vello_cpu::Image {
        let (w, h) = clamp_dims(w, h);
        let key = RampKey {
            top: [top.r, top.g, top.b, (quant(top.a) >> 2) as u8],
            bottom: [bottom.r, bottom.g, bottom.b, (quant(bottom.a) >> 2) as u8],
            peak: u16::MAX,
            w,
            h,
        };
        if let Some(img) = self.ramps.get(&key) {
            return img.clone();
        }

        let h1 = f64::from(h.max(2) - 1);
        let img = synthesize(w, h, |_, y| {
            let t = f64::from(y) / h1;
            let c = top.mix(bottom, t);
            premul_px(c, 1.0)
        });
        self.ramps.insert(key, img.clone());
        img
    }

    /// Vertical 3-stop band: transparent at both ends, `peak` alpha midway.
    /// Light beams and horizon glows are this image under a rotation.
    pub(crate) fn band(&mut self, color: Rgba, peak: f32, w: f64, h: f64) -> vello_cpu::Image {
        let (w, h) = clamp_dims(w, h);
        let key = RampKey {
            top: [color.r, color.g, color.b, 0],
            bottom: [color.r, color.g, color.b, 0],
            peak: quant(peak * color.a),
            w,
            h,
        };
        if let Some(img) = self.ramps.get(&key) {
            return img.clone();
        }

        let h1 = f64::from(h.max(2) - 1);
        let img = synthesize(w, h, |_, y| {
            let t = f64::from(y) / h1;
            let alpha = if t < 0.5 {
                lerp(0.0, f64::from(peak), t * 2.0)
            } else {
                lerp(f64::from(peak), 0.0, (t - 0.5) * 2.0)
            };
            premul_px(color, alpha as f32)
        });
        self.ramps.insert(key, img.clone());
        img
    }

    /// Opaque gray hash noise, stable per seed.
    pub(crate) fn noise(&mut self, seed: u64, w: f64, h: f64) -> vello_cpu::Image {
        let (w, h) = clamp_dims(w, h);
        let key = NoiseKey { seed, w, h };
        if let Some(img) = self.noise.get(&key) {
            return img.clone();
        }

        let img = synthesize(w, h, |x, y| {
            let v = pixel_hash(seed, u32::from(x), u32::from(y)) as u8;
            PremulRgba8 {
                r: v,
                g: v,
                b: v,
                a: 255,
            }
        });
        self.noise.insert(key, img.clone());
        img
    }
}

fn clamp_dims(w: f64, h: f64) -> (u16, u16) {
    let clamp = |v: f64| (v.round().max(1.0) as u32).min(u32::from(u16::MAX)) as u16;
    (clamp(w), clamp(h))
}

fn quant(a: f32) -> u16 {
    (a.clamp(0.0, 1.0) * 1000.0).round() as u16
}

fn premul_px(color: Rgba, alpha: f32) -> PremulRgba8 {
    let a = (color.a * alpha).clamp(0.0, 1.0);
    let ch = |c: u8| (f32::from(c) * a).round() as u8;
    PremulRgba8 {
        r: ch(color.r),
        g: ch(color.g),
        b: ch(color.b),
        a: (a * 255.0).round() as u8,
    }
}

fn synthesize(w: u16, h: u16, px: impl Fn(u16, u16) -> PremulRgba8) -> vello_cpu::Image {
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    let mut may_have_opacities = false;
    for y in 0..h {
        for x in 0..w {
            let p = px(x, y);
            may_have_opacities |= p.a != 255;
            pixels.push(p);
        }
    }
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(
            vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities),
        )),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixmap_bytes(img: &vello_cpu::Image) -> Vec<u8> {
        match &img.image {
            vello_cpu::ImageSource::Pixmap(p) => p.data_as_u8_slice().to_vec(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn glow_center_is_brightest_and_edge_transparent() {
        let mut bank = PaintBank::default();
        let img = bank.radial_glow(Rgba::rgb(45, 212, 191), 64.0, 64.0, 0.5, 0.2);
        let bytes = pixmap_bytes(&img);
        let px = |x: usize, y: usize| bytes[(y * 64 + x) * 4 + 3];
        assert!(px(32, 32) > px(48, 32));
        assert_eq!(px(0, 0), 0);
    }

    #[test]
    fn band_peaks_in_the_middle() {
        let mut bank = PaintBank::default();
        let img = bank.band(Rgba::rgb(255, 255, 255), 0.8, 8.0, 33.0);
        let bytes = pixmap_bytes(&img);
        let alpha_at = |y: usize| bytes[(y * 8) * 4 + 3];
        assert_eq!(alpha_at(0), 0);
        assert!(alpha_at(16) > alpha_at(4));
        assert!(alpha_at(16) > alpha_at(30));
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let mut bank = PaintBank::default();
        let a = pixmap_bytes(&bank.noise(7, 16.0, 16.0));
        let mut bank2 = PaintBank::default();
        let b = pixmap_bytes(&bank2.noise(7, 16.0, 16.0));
        let c = pixmap_bytes(&bank2.noise(8, 16.0, 16.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cache_returns_same_image_for_same_key() {
        let mut bank = PaintBank::default();
        let _ = bank.radial_base(Rgba::rgb(19, 26, 42), Rgba::rgb(5, 7, 13), 32.0, 32.0);
        let _ = bank.radial_base(Rgba::rgb(19, 26, 42), Rgba::rgb(5, 7, 13), 32.0, 32.0);
        assert_eq!(bank.bases.len(), 1);
    }
}
