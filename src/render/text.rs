use std::borrow::Cow;
use std::collections::HashMap;

use smallvec::SmallVec;

use crate::color::Rgba;
use crate::foundation::core::Rect;
use crate::foundation::error::{CardError, CardResult};
use crate::render::painter::Painter;

/// Fixed family split: display for prose, monospace for kickers, CTA lines,
/// badge glyphs and the footer. Not configurable per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FontFamily {
    Display,
    Mono,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// Fill for tracked text. A gradient spans the full tracked width and is
/// sampled once per character.
#[derive(Clone, Copy, Debug)]
pub(crate) enum TextFill {
    Solid(Rgba),
    Gradient(Rgba, Rgba),
}

impl TextFill {
    pub(crate) fn sample(&self, t: f64) -> Rgba {
        match *self {
            Self::Solid(c) => c,
            Self::Gradient(a, b) => a.mix(b, t),
        }
    }
}

/// Brush placeholder for Parley layouts; paint is applied per character at
/// draw time, not through the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GlyphBrush;

#[derive(Clone)]
pub(crate) struct ShapedRun {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

#[derive(Clone)]
pub(crate) struct ShapedText {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) runs: Vec<ShapedRun>,
}

#[derive(Clone)]
struct LoadedFont {
    family: String,
    font: vello_cpu::peniko::FontData,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct AdvanceKey {
    ch: char,
    family: FontFamily,
    size_q: u32,
}

/// Parley-backed shaping and measurement. Fonts arrive through the asset
/// provider; a family that never resolves makes its primitives draw nothing.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    display: Option<LoadedFont>,
    mono: Option<LoadedFont>,
    advance_cache: HashMap<AdvanceKey, f32>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            display: None,
            mono: None,
            advance_cache: HashMap::new(),
        }
    }

    pub(crate) fn register_display(&mut self, bytes: Vec<u8>) -> CardResult<()> {
        self.display = Some(self.register(bytes)?);
        Ok(())
    }

    pub(crate) fn register_mono(&mut self, bytes: Vec<u8>) -> CardResult<()> {
        self.mono = Some(self.register(bytes)?);
        Ok(())
    }

    fn register(&mut self, bytes: Vec<u8>) -> CardResult<LoadedFont> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardError::validation("no font families registered from font bytes")
        })?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(LoadedFont { family, font })
    }

    fn loaded(&self, family: FontFamily) -> Option<&LoadedFont> {
        match family {
            FontFamily::Display => self.display.as_ref(),
            FontFamily::Mono => self.mono.as_ref(),
        }
    }

    /// Shape a run of text at `size` px. Returns `None` when the family has
    /// not resolved; callers degrade to drawing nothing.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        family: FontFamily,
        size: f32,
    ) -> Option<ShapedText> {
        if text.is_empty() || !size.is_finite() || size <= 0.0 {
            return None;
        }
        let loaded = self.loaded(family)?;
        let family_name = loaded.family.clone();
        let font = loaded.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push(ShapedRun {
                    font: font.clone(),
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        Some(ShapedText {
            width: layout.full_width(),
            height: layout.height(),
            runs,
        })
    }

    pub(crate) fn shape_char(
        &mut self,
        ch: char,
        family: FontFamily,
        size: f32,
    ) -> Option<ShapedText> {
        let mut buf = [0u8; 4];
        self.shape(ch.encode_utf8(&mut buf), family, size)
    }

    /// Advance width of a single character, measured in isolation the way the
    /// tracked draw positions it.
    pub(crate) fn advance(&mut self, ch: char, family: FontFamily, size: f32) -> Option<f32> {
        let key = AdvanceKey {
            ch,
            family,
            size_q: (size * 16.0).round() as u32,
        };
        if let Some(&w) = self.advance_cache.get(&key) {
            return Some(w);
        }
        let w = self.shape_char(ch, family, size)?.width;
        self.advance_cache.insert(key, w);
        Some(w)
    }

    /// Per-character advances for a whole run; `None` when the family has not
    /// resolved.
    pub(crate) fn char_advances(
        &mut self,
        text: &str,
        family: FontFamily,
        size: f32,
    ) -> Option<SmallVec<[f32; 24]>> {
        self.loaded(family)?;
        let mut out = SmallVec::new();
        for ch in text.chars() {
            out.push(self.advance(ch, family, size).unwrap_or(0.0));
        }
        Some(out)
    }

    /// Greedy word wrap against a max pixel width; a word that alone exceeds
    /// the limit still gets its own line.
    pub(crate) fn wrap_words(
        &mut self,
        text: &str,
        family: FontFamily,
        size: f32,
        max_width: f64,
    ) -> Vec<String> {
        let space = self
            .advance(' ', family, size)
            .map(f64::from)
            .unwrap_or(f64::from(size) * 0.3);

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0f64;

        for word in text.split_whitespace() {
            let word_width: f64 = self
                .char_advances(word, family, size)
                .map(|adv| adv.iter().map(|&a| f64::from(a)).sum())
                .unwrap_or(0.0);

            if !current.is_empty() && current_width + space + word_width > max_width {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            if current.is_empty() {
                current_width = word_width;
            } else {
                current.push(' ');
                current_width += space + word_width;
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

pub(crate) struct TrackedLayout {
    pub(crate) start_x: f64,
    pub(crate) total_width: f64,
}

/// Shared tracked-layout arithmetic: total width is the sum of per-character
/// advances plus `(n-1)` gaps, and the start x is derived from that total for
/// every alignment.
pub(crate) fn tracked_layout(
    advances: &[f32],
    gap: f64,
    align: Align,
    anchor_x: f64,
) -> TrackedLayout {
    let sum: f64 = advances.iter().map(|&a| f64::from(a)).sum();
    let total_width = sum + gap * advances.len().saturating_sub(1) as f64;
    let start_x = match align {
        Align::Left => anchor_x,
        Align::Center => anchor_x - total_width / 2.0,
        Align::Right => anchor_x - total_width,
    };
    TrackedLayout {
        start_x,
        total_width,
    }
}

impl Painter {
    /// Measure a tracked run without drawing it.
    pub(crate) fn measure_tracked(
        &mut self,
        text: &str,
        family: FontFamily,
        size: f64,
        tracking: f64,
    ) -> f64 {
        let Some(advances) = self.text.char_advances(text, family, size as f32) else {
            return 0.0;
        };
        tracked_layout(&advances, tracking * size, Align::Left, 0.0).total_width
    }

    /// Draw text character by character with uniform tracking. Gradient fills
    /// are sampled at each character's center across the tracked width.
    /// Returns the tracked width, 0.0 when the family has not resolved.
    pub(crate) fn draw_tracked(
        &mut self,
        text: &str,
        family: FontFamily,
        size: f64,
        tracking: f64,
        align: Align,
        anchor_x: f64,
        y: f64,
        fill: TextFill,
    ) -> f64 {
        let Some(advances) = self.text.char_advances(text, family, size as f32) else {
            return 0.0;
        };
        if advances.is_empty() {
            return 0.0;
        }

        let gap = tracking * size;
        let layout = tracked_layout(&advances, gap, align, anchor_x);

        let mut x = layout.start_x;
        for (i, ch) in text.chars().enumerate() {
            let advance = f64::from(advances[i]);
            if !ch.is_whitespace() {
                let t = if layout.total_width > 0.0 {
                    ((x + advance / 2.0) - layout.start_x) / layout.total_width
                } else {
                    0.0
                };
                let color = fill.sample(t);
                if let Some(shaped) = self.text.shape_char(ch, family, size as f32) {
                    self.draw_shaped(&shaped, x, y, color);
                }
            }
            x += advance + gap;
        }
        layout.total_width
    }

    /// Headline with a soft accent glow painted behind the glyphs.
    pub(crate) fn headline(&mut self, text: &str, y: f64, scale: f64, fill: TextFill) -> f64 {
        let size = self.w * 0.082 * scale;
        let tracking = 0.02;
        let total = self.measure_tracked(text, FontFamily::Display, size, tracking);
        if total > 0.0 {
            let glow_w = total * 1.5;
            let glow_h = size * 2.6;
            let glow = self.paints.radial_glow(self.accent, glow_w, glow_h, 0.30, 0.10);
            self.fill_rect_with(
                Rect::new(
                    self.w / 2.0 - glow_w / 2.0,
                    y + size * 0.62 - glow_h / 2.0,
                    self.w / 2.0 + glow_w / 2.0,
                    y + size * 0.62 + glow_h / 2.0,
                ),
                glow,
            );
            self.draw_tracked(
                text,
                FontFamily::Display,
                size,
                tracking,
                Align::Center,
                self.w / 2.0,
                y,
                fill,
            );
        }
        size * 1.25
    }

    pub(crate) fn subhead(&mut self, text: &str, y: f64, color: Rgba) -> f64 {
        let size = self.w * 0.030;
        self.draw_tracked(
            text,
            FontFamily::Display,
            size,
            0.01,
            Align::Center,
            self.w / 2.0,
            y,
            TextFill::Solid(color),
        );
        size * 1.5
    }

    /// Body prose, greedily wrapped to `max_width` pixels.
    pub(crate) fn body(&mut self, text: &str, y: f64, max_width: f64, color: Rgba) -> f64 {
        let size = self.w * 0.024;
        let line_height = size * 1.55;
        let lines = self
            .text
            .wrap_words(text, FontFamily::Display, size as f32, max_width);
        for (i, line) in lines.iter().enumerate() {
            self.draw_tracked(
                line,
                FontFamily::Display,
                size,
                0.0,
                Align::Center,
                self.w / 2.0,
                y + i as f64 * line_height,
                TextFill::Solid(color),
            );
        }
        lines.len().max(1) as f64 * line_height
    }

    /// Small uppercase monospace eyebrow line in the accent color.
    pub(crate) fn kicker(&mut self, text: &str, y: f64) -> f64 {
        let size = self.w * 0.016;
        let accent = self.accent;
        self.draw_tracked(
            &text.to_uppercase(),
            FontFamily::Mono,
            size,
            0.35,
            Align::Center,
            self.w / 2.0,
            y,
            TextFill::Solid(accent),
        );
        size * 1.4
    }

    pub(crate) fn cta(&mut self, text: &str, y: f64, color: Rgba) -> f64 {
        let size = self.w * 0.019;
        self.draw_tracked(
            text,
            FontFamily::Mono,
            size,
            0.12,
            Align::Center,
            self.w / 2.0,
            y,
            TextFill::Solid(color),
        );
        size * 1.4
    }

    /// Free-position monospace label for cards, badges and the footer.
    pub(crate) fn label(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f64,
        align: Align,
        color: Rgba,
    ) -> f64 {
        self.draw_tracked(
            text,
            FontFamily::Mono,
            size,
            0.08,
            align,
            x,
            y,
            TextFill::Solid(color),
        );
        size * 1.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_total_is_sum_of_advances_plus_gaps() {
        let advances = [10.0f32, 12.0, 8.0, 20.0];
        let gap = 3.0;
        for align in [Align::Left, Align::Center, Align::Right] {
            let layout = tracked_layout(&advances, gap, align, 100.0);
            assert!((layout.total_width - (50.0 + 3.0 * 3.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn tracked_alignment_offsets() {
        let advances = [10.0f32, 10.0];
        let layout_l = tracked_layout(&advances, 0.0, Align::Left, 100.0);
        let layout_c = tracked_layout(&advances, 0.0, Align::Center, 100.0);
        let layout_r = tracked_layout(&advances, 0.0, Align::Right, 100.0);
        assert_eq!(layout_l.start_x, 100.0);
        assert_eq!(layout_c.start_x, 90.0);
        assert_eq!(layout_r.start_x, 80.0);
    }

    #[test]
    fn tracked_single_char_has_no_gap() {
        let layout = tracked_layout(&[7.0f32], 100.0, Align::Left, 0.0);
        assert_eq!(layout.total_width, 7.0);
    }

    #[test]
    fn gradient_fill_samples_endpoints() {
        let fill = TextFill::Gradient(Rgba::rgb(0, 0, 0), Rgba::rgb(255, 255, 255));
        assert_eq!(fill.sample(0.0), Rgba::rgb(0, 0, 0));
        assert_eq!(fill.sample(1.0), Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn shape_without_fonts_degrades_to_none() {
        let mut engine = TextEngine::new();
        assert!(engine.shape("DGKO", FontFamily::Display, 32.0).is_none());
        assert!(engine.char_advances("DGKO", FontFamily::Mono, 32.0).is_none());
    }

    #[test]
    fn wrap_without_fonts_packs_everything_on_one_line() {
        // Word widths measure 0.0 with no font, so nothing ever overflows.
        let mut engine = TextEngine::new();
        let lines = engine.wrap_words("alpha beta gamma", FontFamily::Display, 16.0, 10.0);
        assert_eq!(lines, vec!["alpha beta gamma".to_string()]);
    }
}
