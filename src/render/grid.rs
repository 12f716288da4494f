use std::f64::consts::TAU;

use crate::foundation::core::{Point, Rect};
use crate::foundation::math::{ease_in, lerp};
use crate::model::{GridConfig, GridStyle};
use crate::render::painter::{Painter, circle_path, polygon_path};

/// Grid alpha floors at 0.1 so a nonzero grid never disappears entirely.
pub(crate) fn grid_alpha(opacity: u8) -> f32 {
    (f32::from(opacity.min(100)) / 100.0).max(0.1)
}

/// Density 1|2|3 maps to low|medium|high; anything else clamps to the
/// nearest defined tier.
pub(crate) fn density_tier(density: u8) -> usize {
    usize::from(density.clamp(1, 3) - 1)
}

pub(crate) fn draw(p: &mut Painter, cfg: &GridConfig) {
    if cfg.style == GridStyle::None {
        return;
    }
    let alpha = grid_alpha(cfg.opacity);
    let tier = density_tier(cfg.density);
    match cfg.style {
        GridStyle::None => {}
        GridStyle::Perspective => perspective(p, tier, alpha),
        GridStyle::Isometric => isometric(p, tier, alpha),
        GridStyle::Horizontal => horizontal(p, tier, alpha),
        GridStyle::Radial => radial(p, tier, alpha),
        GridStyle::Hex => hex(p, tier, alpha),
    }
}

const HORIZON_FRAC: f64 = 0.45;

fn perspective(p: &mut Painter, tier: usize, alpha: f32) {
    let (w, h) = (p.w, p.h);
    let horizon = h * HORIZON_FRAC;
    let accent = p.accent;

    // Floor lines bunch toward the horizon along an ease-in curve.
    let floor_lines = [6, 9, 14][tier];
    for i in 1..=floor_lines {
        let t = ease_in(f64::from(i) / f64::from(floor_lines), 2.2);
        let y = horizon + t * (h - horizon);
        p.line(
            Point::new(0.0, y),
            Point::new(w, y),
            accent.with_alpha(alpha * 0.55),
            1.0,
        );
    }

    // Rays from the vanishing point down through the floor.
    let rays = [7, 11, 15][tier];
    let vp = Point::new(w / 2.0, horizon);
    for j in 0..rays {
        let t = f64::from(j) / f64::from(rays - 1);
        let x = lerp(-0.7 * w, 1.7 * w, t);
        p.line(
            vp,
            Point::new(x, h),
            accent.with_alpha(alpha * 0.35),
            1.0,
        );
    }

    let band_h = h * 0.08;
    let glow = p.paints.band(accent, alpha * 0.5, w, band_h);
    p.fill_rect_with(
        Rect::new(0.0, horizon - band_h / 2.0, w, horizon + band_h / 2.0),
        glow,
    );
}

fn isometric(p: &mut Painter, tier: usize, alpha: f32) {
    let (w, h) = (p.w, p.h);
    let accent = p.accent;
    let half = [8, 12, 18][tier] as i32;
    let spacing = w / f64::from(half);
    let reach = (w * w + h * h).sqrt();

    for angle in [30f64.to_radians(), -30f64.to_radians()] {
        let (dir_x, dir_y) = (angle.cos(), angle.sin());
        let (nx, ny) = (-dir_y, dir_x);
        for k in -half..=half {
            let fade = 1.0 - (f64::from(k.abs()) / f64::from(half)) * 0.85;
            let cx = w / 2.0 + nx * f64::from(k) * spacing;
            let cy = h / 2.0 + ny * f64::from(k) * spacing;
            p.line(
                Point::new(cx - dir_x * reach, cy - dir_y * reach),
                Point::new(cx + dir_x * reach, cy + dir_y * reach),
                accent.with_alpha(alpha * 0.5 * fade as f32),
                1.0,
            );
        }
    }

    p.glow_at(accent, w / 2.0, h / 2.0, w * 0.7, w * 0.7, alpha * 0.45, alpha * 0.12);
}

fn horizontal(p: &mut Painter, tier: usize, alpha: f32) {
    let (w, h) = (p.w, p.h);
    let accent = p.accent;
    let side_lines = [5, 8, 12][tier];
    let spacing = h * 0.42 / f64::from(side_lines);
    let center_y = h / 2.0;

    p.line(
        Point::new(0.0, center_y),
        Point::new(w, center_y),
        accent.with_alpha(alpha),
        2.5,
    );
    for i in 1..=side_lines {
        let fade = 1.0 - f64::from(i) / f64::from(side_lines + 1);
        let color = accent.with_alpha(alpha * 0.6 * fade as f32);
        let dy = f64::from(i) * spacing;
        p.line(Point::new(0.0, center_y - dy), Point::new(w, center_y - dy), color, 1.0);
        p.line(Point::new(0.0, center_y + dy), Point::new(w, center_y + dy), color, 1.0);
    }

    let band_h = h * 0.05;
    let glow = p.paints.band(accent, alpha * 0.6, w, band_h);
    p.fill_rect_with(
        Rect::new(0.0, center_y - band_h / 2.0, w, center_y + band_h / 2.0),
        glow,
    );
}

fn radial(p: &mut Painter, tier: usize, alpha: f32) {
    let (w, h) = (p.w, p.h);
    let accent = p.accent;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let max_r = 0.48 * w.min(h);

    // Rings grow bolder outward.
    let rings = [4, 6, 9][tier];
    for i in 1..=rings {
        let t = f64::from(i) / f64::from(rings);
        let ring = circle_path(cx, cy, max_r * t);
        p.stroke_path(&ring, accent.with_alpha(alpha * (0.25 + 0.75 * t) as f32), 1.0);
    }

    let rays = [8, 12, 16][tier];
    for j in 0..rays {
        let angle = TAU * f64::from(j) / f64::from(rays);
        p.line(
            Point::new(cx, cy),
            Point::new(cx + angle.cos() * max_r * 1.15, cy + angle.sin() * max_r * 1.15),
            accent.with_alpha(alpha * 0.4),
            1.0,
        );
    }

    p.glow_at(accent, cx, cy, max_r, max_r, alpha * 0.5, alpha * 0.15);
}

fn hex(p: &mut Painter, tier: usize, alpha: f32) {
    let (w, h) = (p.w, p.h);
    let accent = p.accent;
    let (cx0, cy0) = (w / 2.0, h / 2.0);
    let r = w / [9.0, 13.0, 19.0][tier];
    let cutoff = 0.58 * w.max(h);

    let col_step = 1.5 * r;
    let row_step = 3f64.sqrt() * r;
    let cols = (w / col_step / 2.0).ceil() as i32 + 1;
    let rows = (h / row_step / 2.0).ceil() as i32 + 1;

    for q in -cols..=cols {
        for row in -rows..=rows {
            let x = cx0 + f64::from(q) * col_step;
            let stagger = if q.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
            let y = cy0 + (f64::from(row) + stagger) * row_step;
            let dist = ((x - cx0).powi(2) + (y - cy0).powi(2)).sqrt();
            if dist > cutoff {
                continue;
            }
            let fade = 0.2 + 0.8 * (1.0 - dist / cutoff);
            let cell = hexagon(x, y, r * 0.92);
            p.stroke_path(&cell, accent.with_alpha(alpha * 0.55 * fade as f32), 1.0);
        }
    }
}

fn hexagon(cx: f64, cy: f64, r: f64) -> crate::foundation::core::BezPath {
    let pts: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let angle = TAU * f64::from(i) / 6.0;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    polygon_path(&pts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_floors_at_one_tenth() {
        assert_eq!(grid_alpha(0), 0.1);
        assert_eq!(grid_alpha(5), 0.1);
        assert!((grid_alpha(55) - 0.55).abs() < 1e-6);
        assert_eq!(grid_alpha(100), 1.0);
        // Out-of-range opacity clamps before mapping.
        assert_eq!(grid_alpha(200), 1.0);
    }

    #[test]
    fn density_clamps_to_defined_tiers() {
        assert_eq!(density_tier(0), 0);
        assert_eq!(density_tier(1), 0);
        assert_eq!(density_tier(2), 1);
        assert_eq!(density_tier(3), 2);
        assert_eq!(density_tier(9), 2);
    }

    #[test]
    fn hexagon_closes_with_six_sides() {
        let path = hexagon(0.0, 0.0, 10.0);
        assert_eq!(path.elements().len(), 7);
    }
}
