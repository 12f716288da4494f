use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::ResolvedImages;
use crate::color::Rgba;
use crate::foundation::core::{Affine, BezPath, Circle, Point, Rect, Shape};
use crate::foundation::error::{CardError, CardResult};
use crate::render::paint::PaintBank;
use crate::render::text::{ShapedText, TextEngine};

/// Drawing handle for one render call: the raster context plus everything the
/// layer modules need (paint bank, text engine, resolved images, accent).
pub(crate) struct Painter {
    pub(crate) w: f64,
    pub(crate) h: f64,
    width_px: u16,
    height_px: u16,
    ctx: vello_cpu::RenderContext,
    pub(crate) paints: PaintBank,
    pub(crate) text: TextEngine,
    pub(crate) images: ResolvedImages,
    pub(crate) accent: Rgba,
    pub(crate) seed: u64,
    image_paints: HashMap<String, (vello_cpu::Image, u32, u32)>,
}

impl Painter {
    pub(crate) fn new(
        width: u32,
        height: u32,
        accent: Rgba,
        seed: u64,
        text: TextEngine,
        images: ResolvedImages,
    ) -> CardResult<Self> {
        let width_px: u16 = width
            .try_into()
            .map_err(|_| CardError::render("surface width exceeds u16"))?;
        let height_px: u16 = height
            .try_into()
            .map_err(|_| CardError::render("surface height exceeds u16"))?;

        Ok(Self {
            w: f64::from(width),
            h: f64::from(height),
            width_px,
            height_px,
            ctx: vello_cpu::RenderContext::new(width_px, height_px),
            paints: PaintBank::default(),
            text,
            images,
            accent,
            seed,
            image_paints: HashMap::new(),
        })
    }

    pub(crate) fn finish(mut self) -> vello_cpu::Pixmap {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width_px, self.height_px);
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap
    }

    pub(crate) fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w, self.h)
    }

    fn reset_transforms(&mut self) {
        self.ctx.set_transform(cpu_affine(Affine::IDENTITY));
        self.ctx.set_paint_transform(cpu_affine(Affine::IDENTITY));
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Rgba) {
        self.reset_transforms();
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_path(&cpu_path(path));
    }

    pub(crate) fn stroke_path(&mut self, path: &BezPath, color: Rgba, width: f64) {
        self.reset_transforms();
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.set_paint(color.to_peniko());
        self.ctx.stroke_path(&cpu_path(path));
    }

    pub(crate) fn line(&mut self, p0: Point, p1: Point, color: Rgba, width: f64) {
        let mut path = BezPath::new();
        path.move_to(p0);
        path.line_to(p1);
        self.stroke_path(&path, color, width);
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.reset_transforms();
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_rect(&cpu_rect(rect));
    }

    /// Fill `rect` with a synthesized paint image of exactly `rect`'s size.
    pub(crate) fn fill_rect_with(&mut self, rect: Rect, img: vello_cpu::Image) {
        self.reset_transforms();
        self.ctx
            .set_transform(cpu_affine(Affine::translate((rect.x0, rect.y0))));
        self.ctx.set_paint(img);
        self.ctx
            .fill_rect(&cpu_rect(Rect::new(0.0, 0.0, rect.width(), rect.height())));
    }

    /// Fill an arbitrary path with a paint image positioned by `paint_to_canvas`.
    pub(crate) fn fill_path_with(
        &mut self,
        path: &BezPath,
        img: vello_cpu::Image,
        paint_to_canvas: Affine,
    ) {
        self.reset_transforms();
        self.ctx.set_paint_transform(cpu_affine(paint_to_canvas));
        self.ctx.set_paint(img);
        self.ctx.fill_path(&cpu_path(path));
    }

    pub(crate) fn push_opacity(&mut self, opacity: f32) {
        self.ctx.push_opacity_layer(opacity);
    }

    pub(crate) fn push_clip(&mut self, path: &BezPath) {
        self.ctx.push_clip_layer(&cpu_path(path));
    }

    pub(crate) fn pop_layer(&mut self) {
        self.ctx.pop_layer();
    }

    /// Paint for a resolved bitmap, converted once per render and keyed by URL.
    pub(crate) fn image_paint(&mut self, url: &str) -> Option<(vello_cpu::Image, u32, u32)> {
        if let Some(hit) = self.image_paints.get(url) {
            return Some(hit.clone());
        }
        let prepared = self.images.get(url)?.clone();
        let img = image_from_premul(&prepared.rgba8_premul, prepared.width, prepared.height).ok()?;
        let entry = (img, prepared.width, prepared.height);
        self.image_paints.insert(url.to_string(), entry.clone());
        Some(entry)
    }

    /// Draw a resolved bitmap scaled into `rect`; reports whether it drew.
    pub(crate) fn draw_image_in_rect(&mut self, url: &str, rect: Rect) -> bool {
        let Some((img, w, h)) = self.image_paint(url) else {
            return false;
        };
        if w == 0 || h == 0 {
            return false;
        }
        self.reset_transforms();
        let scale = Affine::translate((rect.x0, rect.y0)).pre_scale_non_uniform(
            rect.width() / f64::from(w),
            rect.height() / f64::from(h),
        );
        self.ctx.set_transform(cpu_affine(scale));
        self.ctx.set_paint(img);
        self.ctx
            .fill_rect(&cpu_rect(Rect::new(0.0, 0.0, f64::from(w), f64::from(h))));
        true
    }

    /// Draw one shaped run with its layout origin at `(x, y)`.
    pub(crate) fn draw_shaped(&mut self, shaped: &ShapedText, x: f64, y: f64, color: Rgba) {
        self.reset_transforms();
        self.ctx
            .set_transform(cpu_affine(Affine::translate((x, y))));
        self.ctx.set_paint(color.to_peniko());
        for run in &shaped.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            self.ctx
                .glyph_run(&run.font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        }
    }
}

pub(crate) fn circle_path(cx: f64, cy: f64, r: f64) -> BezPath {
    Circle::new((cx, cy), r).to_path(0.1)
}

pub(crate) fn polygon_path(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        path.move_to((x, y));
        for &(x, y) in iter {
            path.line_to((x, y));
        }
        path.close_path();
    }
    path
}

pub(crate) fn image_from_premul(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(
            vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities),
        )),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn cpu_affine(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn cpu_rect(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn cpu_path(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu_point(p1), cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(cpu_point(p1), cpu_point(p2), cpu_point(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
