use crate::color::Rgba;
use crate::foundation::core::{Point, Rect};
use crate::model::TokenInfo;
use crate::render::painter::{Painter, circle_path, polygon_path};
use crate::render::text::FontFamily;

const BADGE_DISC: Rgba = Rgba::rgb(0x0d, 0x11, 0x17);

/// Face shades for the prism; near-black, each one distinct.
const FACE_SHADES: [Rgba; 6] = [
    Rgba::rgb(0x0a, 0x0d, 0x15),
    Rgba::rgb(0x0c, 0x10, 0x19),
    Rgba::rgb(0x0e, 0x12, 0x1d),
    Rgba::rgb(0x10, 0x15, 0x21),
    Rgba::rgb(0x12, 0x17, 0x26),
    Rgba::rgb(0x15, 0x1b, 0x2c),
];
const TOP_SHADE: Rgba = Rgba::rgb(0x19, 0x20, 0x33);

impl Painter {
    /// Isometric hexagonal platform. `fw` is the footprint width; every other
    /// offset (depth, face heights, glow sizes) derives from it, so changing
    /// canvas size rescales the platform uniformly.
    pub(crate) fn draw_platform(&mut self, cx: f64, cy: f64, fw: f64) {
        let accent = self.accent;
        let rx = fw / 2.0;
        let ry = fw / 4.0;
        let depth = fw * 0.14;

        // Pointy-top hexagon: vertices at 30 + k*60 degrees, y squashed.
        let vertex = |deg: f64| {
            let a = deg.to_radians();
            (cx + rx * a.cos(), cy + ry * a.sin())
        };
        let v30 = vertex(30.0);
        let v90 = vertex(90.0);
        let v150 = vertex(150.0);
        let v210 = vertex(210.0);
        let v270 = vertex(270.0);
        let v330 = vertex(330.0);

        // Light and shadow land before any geometry.
        self.glow_at(Rgba::rgb(0, 0, 0), cx, cy + depth * 2.2, fw * 1.15, fw * 0.35, 0.55, 0.20);
        self.glow_at(accent, cx, cy + depth * 0.5, fw * 1.6, fw * 0.6, 0.28, 0.10);

        // Side and front faces, back to front, each edge extruded down by
        // `depth`. The two front faces (30-90, 90-150) land last.
        let edges = [
            (v210, v270),
            (v270, v330),
            (v150, v210),
            (v330, v30),
            (v90, v150),
            (v30, v90),
        ];
        for (i, &((x0, y0), (x1, y1))) in edges.iter().enumerate() {
            let face = polygon_path(&[
                (x0, y0),
                (x1, y1),
                (x1, y1 + depth),
                (x0, y0 + depth),
            ]);
            self.fill_path(&face, FACE_SHADES[i]);
            self.stroke_path(&face, accent.with_alpha(0.30), 1.0);
        }

        let top = polygon_path(&[v30, v90, v150, v210, v270, v330]);
        self.fill_path(&top, TOP_SHADE);
        self.stroke_path(&top, accent.with_alpha(0.45), 1.5);

        // Lens flare and accent line at the front-bottom edge.
        let front_edge = polygon_line(&[
            (v150.0, v150.1 + depth),
            (v90.0, v90.1 + depth),
            (v30.0, v30.1 + depth),
        ]);
        self.stroke_path(&front_edge, accent.with_alpha(0.8), 2.0);
        self.glow_at(
            accent.mix(Rgba::rgb(255, 255, 255), 0.5),
            v90.0,
            v90.1 + depth,
            fw * 0.30,
            fw * 0.12,
            0.75,
            0.25,
        );
    }

    /// Circular token badge: glow ring, rim, dark disc, then a clipped logo
    /// bitmap or the color/initial fallback.
    pub(crate) fn draw_token_badge(&mut self, cx: f64, cy: f64, r: f64, token: &TokenInfo) {
        let accent = self.accent;
        let token_color = Rgba::from_hex_or(&token.color, accent);

        self.glow_at(token_color, cx, cy, r * 3.2, r * 3.2, 0.45, 0.15);
        self.stroke_path(&circle_path(cx, cy, r), token_color.with_alpha(0.9), r * 0.07);
        self.fill_path(&circle_path(cx, cy, r * 0.96), BADGE_DISC);

        let inner = r * 0.84;
        let drew_logo = match token.resolved_logo_url() {
            Some(url) => {
                let clip = circle_path(cx, cy, inner);
                self.push_clip(&clip);
                let drew = self.draw_image_in_rect(
                    &url,
                    Rect::new(cx - inner, cy - inner, cx + inner, cy + inner),
                );
                self.pop_layer();
                drew
            }
            None => false,
        };

        if !drew_logo {
            let secondary = token
                .color_secondary
                .as_deref()
                .map(|hex| Rgba::from_hex_or(hex, token_color))
                .unwrap_or_else(|| token_color.mix(Rgba::rgb(0, 0, 0), 0.45));
            let fill = self
                .paints
                .ramp2(token_color, secondary, inner * 2.0, inner * 2.0);
            let disc = circle_path(cx, cy, inner);
            self.fill_path_with(
                &disc,
                fill,
                crate::foundation::core::Affine::translate((cx - inner, cy - inner)),
            );

            let initial = token.initial();
            if let Some(shaped) = self.text.shape_char(initial, FontFamily::Mono, r as f32) {
                let x = cx - f64::from(shaped.width) / 2.0;
                let y = cy - f64::from(shaped.height) / 2.0;
                self.draw_shaped(&shaped, x, y, Rgba::rgb(255, 255, 255));
            }
        }
    }

    /// Five linked isometric blocks; only the announcement template uses it.
    pub(crate) fn draw_chain(&mut self, cx: f64, cy: f64, span: f64) {
        let accent = self.accent;
        let scales = [0.7, 0.85, 1.0, 0.85, 0.7];
        let opacities = [0.45f32, 0.7, 1.0, 0.7, 0.45];
        let base = span * 0.11;
        let step = span / 4.0;

        for i in 0..4 {
            let x0 = cx + (i as f64 - 2.0) * step;
            let x1 = x0 + step;
            self.line(
                Point::new(x0, cy),
                Point::new(x1, cy),
                accent.with_alpha(0.4),
                2.0,
            );
        }

        for i in 0..5 {
            let x = cx + (i as f64 - 2.0) * step;
            self.draw_iso_block(x, cy, base * scales[i], opacities[i]);
        }
    }

    fn draw_iso_block(&mut self, cx: f64, cy: f64, s: f64, opacity: f32) {
        let accent = self.accent;
        let hw = s * 0.7;
        let top_n = (cx, cy - s * 0.85);
        let top_e = (cx + hw, cy - s * 0.5);
        let top_s = (cx, cy - s * 0.15);
        let top_w = (cx - hw, cy - s * 0.5);
        let drop = s * 0.7;

        self.push_opacity(opacity);

        let left = polygon_path(&[
            top_w,
            top_s,
            (top_s.0, top_s.1 + drop),
            (top_w.0, top_w.1 + drop),
        ]);
        self.fill_path(&left, FACE_SHADES[1]);
        self.stroke_path(&left, accent.with_alpha(0.5), 1.0);

        let right = polygon_path(&[
            top_s,
            top_e,
            (top_e.0, top_e.1 + drop),
            (top_s.0, top_s.1 + drop),
        ]);
        self.fill_path(&right, FACE_SHADES[3]);
        self.stroke_path(&right, accent.with_alpha(0.5), 1.0);

        let top = polygon_path(&[top_n, top_e, top_s, top_w]);
        self.fill_path(&top, TOP_SHADE);
        self.stroke_path(&top, accent.with_alpha(0.6), 1.0);

        if let Some(shaped) = self.text.shape_char('#', FontFamily::Mono, (s * 0.55) as f32) {
            let x = cx - f64::from(shaped.width) / 2.0;
            let y = cy - s * 0.5 - f64::from(shaped.height) / 2.0;
            self.draw_shaped(&shaped, x, y, accent.with_alpha(0.9));
        }

        self.pop_layer();
    }
}

fn polygon_line(points: &[(f64, f64)]) -> crate::foundation::core::BezPath {
    let mut path = crate::foundation::core::BezPath::new();
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        path.move_to((x, y));
        for &(x, y) in iter {
            path.line_to((x, y));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_shades_are_distinct() {
        for i in 0..FACE_SHADES.len() {
            for j in (i + 1)..FACE_SHADES.len() {
                assert_ne!(FACE_SHADES[i], FACE_SHADES[j]);
            }
            assert_ne!(FACE_SHADES[i], TOP_SHADE);
        }
    }

    #[test]
    fn polyline_does_not_close() {
        let p = polygon_line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        assert_eq!(p.elements().len(), 3);
    }
}
