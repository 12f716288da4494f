use crate::assets::BRAND_LOGO_URL;
use crate::color::Rgba;
use crate::foundation::core::Rect;
use crate::render::painter::{Painter, circle_path};
use crate::render::text::Align;

pub(crate) const BRAND_NAME: &str = "DIGIKO";
pub(crate) const BRAND_TAGLINE: &str = "The community DEX on Klever";
pub(crate) const BRAND_SITE: &str = "digiko.io";
pub(crate) const DISCLAIMER: &str = "Not financial advice. Digital assets involve risk.";

const SOFT_WHITE: Rgba = Rgba::rgb(0xe6, 0xea, 0xf2);
const DIM: Rgba = Rgba::rgb(0x8a, 0x92, 0xa6);

impl Painter {
    /// Brand footer, always drawn last and independent of template.
    pub(crate) fn draw_footer(&mut self, show_disclaimer: bool) {
        let margin = self.w * 0.055;
        let row_y = self.h - self.w * 0.085;
        let logo_r = self.w * 0.020;
        let accent = self.accent;

        let mut text_x = margin;
        if self.images.get(BRAND_LOGO_URL).is_some() {
            let (lx, ly) = (margin + logo_r, row_y + logo_r);
            let clip = circle_path(lx, ly, logo_r);
            self.push_clip(&clip);
            self.draw_image_in_rect(
                BRAND_LOGO_URL,
                Rect::new(lx - logo_r, ly - logo_r, lx + logo_r, ly + logo_r),
            );
            self.pop_layer();
            self.stroke_path(&circle_path(lx, ly, logo_r), accent.with_alpha(0.6), 1.5);
            text_x = margin + logo_r * 2.0 + self.w * 0.012;
        }

        let name_size = self.w * 0.020;
        let used = self.label(BRAND_NAME, text_x, row_y, name_size, Align::Left, SOFT_WHITE);
        self.label(
            BRAND_TAGLINE,
            text_x,
            row_y + used,
            self.w * 0.013,
            Align::Left,
            DIM,
        );

        let site_x = self.w - margin;
        self.label(
            BRAND_SITE,
            site_x,
            row_y,
            self.w * 0.016,
            Align::Right,
            accent,
        );

        if show_disclaimer {
            let y = self.h - self.w * 0.030;
            self.label(
                DISCLAIMER,
                self.w / 2.0,
                y,
                self.w * 0.011,
                Align::Center,
                DIM.with_alpha(0.8),
            );
        }
    }
}
