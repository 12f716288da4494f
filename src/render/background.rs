use crate::color::Rgba;
use crate::foundation::core::{Affine, Rect};
use crate::model::GridConfig;
use crate::render::grid;
use crate::render::painter::{Painter, polygon_path};

const BASE_CENTER: Rgba = Rgba::rgb(0x13, 0x1a, 0x2a);
const BASE_EDGE: Rgba = Rgba::rgb(0x05, 0x07, 0x0d);

/// Fixed-hue indigo for the bottom-left ambient glow; the top-right glow is
/// accent-tinted.
const AMBIENT_INDIGO: Rgba = Rgba::rgb(0x63, 0x66, 0xf1);

/// Opacity of the grain plane drawn over the finished backdrop.
const NOISE_OPACITY: f32 = 0.045;

impl Painter {
    /// Full backdrop: base gradient, ambient glows, grid band, light beams,
    /// noise. Later layers assume a fully painted canvas beneath them, so the
    /// order here is fixed.
    pub(crate) fn draw_background(&mut self, grid_cfg: &GridConfig) {
        let canvas = self.canvas_rect();
        let base = self.paints.radial_base(BASE_CENTER, BASE_EDGE, self.w, self.h);
        self.fill_rect_with(canvas, base);

        let accent = self.accent;
        self.glow_at(accent, self.w * 0.82, self.h * 0.12, self.w * 1.1, self.w * 1.1, 0.20, 0.07);
        self.glow_at(
            AMBIENT_INDIGO,
            self.w * 0.10,
            self.h * 0.90,
            self.w * 1.2,
            self.w * 1.2,
            0.15,
            0.06,
        );

        grid::draw(self, grid_cfg);

        self.draw_beam(self.w * 0.62, self.h * 0.40, -0.42, self.w * 0.20, self.h * 1.7, 0.05);
        self.draw_beam(self.w * 0.18, self.h * 0.55, -0.42, self.w * 0.10, self.h * 1.7, 0.04);

        let noise = self.paints.noise(self.seed, self.w, self.h);
        self.push_opacity(NOISE_OPACITY);
        self.fill_rect_with(canvas, noise);
        self.pop_layer();
    }

    /// Centered elliptical glow; the workhorse behind ambient color washes,
    /// hero-number halos and platform light.
    pub(crate) fn glow_at(
        &mut self,
        color: Rgba,
        cx: f64,
        cy: f64,
        w: f64,
        h: f64,
        a0: f32,
        a1: f32,
    ) {
        let img = self.paints.radial_glow(color, w, h, a0, a1);
        self.fill_rect_with(
            Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0),
            img,
        );
    }

    /// One diagonal light beam: a rotated band polygon filled with a
    /// transparent-peak-transparent ramp along its length.
    fn draw_beam(&mut self, cx: f64, cy: f64, angle: f64, width: f64, length: f64, peak: f32) {
        let accent = self.accent;
        let img = self.paints.band(accent, peak, width, length);

        let place = Affine::translate((cx, cy)) * Affine::rotate(angle);
        let corners: Vec<(f64, f64)> = [
            (-width / 2.0, -length / 2.0),
            (width / 2.0, -length / 2.0),
            (width / 2.0, length / 2.0),
            (-width / 2.0, length / 2.0),
        ]
        .iter()
        .map(|&(x, y)| {
            let p = place * kurbo::Point::new(x, y);
            (p.x, p.y)
        })
        .collect();

        let path = polygon_path(&corners);
        let paint_to_canvas = place * Affine::translate((-width / 2.0, -length / 2.0));
        self.fill_path_with(&path, img, paint_to_canvas);
    }
}
