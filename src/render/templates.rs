use crate::color::Rgba;
use crate::foundation::core::{Point, Rect};
use crate::model::{Template, TemplateData, TokenInfo};
use crate::render::painter::Painter;
use crate::render::text::{Align, TextFill};

const SOFT_WHITE: Rgba = Rgba::rgb(0xe6, 0xea, 0xf2);
const DIM: Rgba = Rgba::rgb(0x8a, 0x92, 0xa6);
const CARD_FILL: Rgba = Rgba::rgb(0x0d, 0x11, 0x17);

/// Exhaustive template selection. An unrecognized template draws nothing
/// beyond the background and footer.
pub(crate) fn draw_template(p: &mut Painter, data: &TemplateData) {
    match data.template {
        Template::NewPair => new_pair(p, data),
        Template::AprPromotion => apr_promotion(p, data),
        Template::Listing => listing(p, data),
        Template::Announcement => announcement(p, data),
        Template::Milestone => milestone(p, data),
        Template::SeasonAnnouncement => season_announcement(p, data),
        Template::Unknown => {}
    }
}

/// Vertical layout cursor shared by all six recipes; the gap constants are
/// proportional to canvas width.
pub(crate) struct Flow {
    pub(crate) y: f64,
    gap_xl: f64,
    gap_large: f64,
    gap_medium: f64,
    gap_small: f64,
}

impl Flow {
    pub(crate) fn start(w: f64, h: f64, frac: f64) -> Self {
        Self {
            y: h * frac,
            gap_xl: w * 0.055,
            gap_large: w * 0.040,
            gap_medium: w * 0.025,
            gap_small: w * 0.015,
        }
    }

    pub(crate) fn advance(&mut self, used: f64) {
        self.y += used;
    }

    pub(crate) fn space_xl(&mut self) {
        self.y += self.gap_xl;
    }

    pub(crate) fn space_large(&mut self) {
        self.y += self.gap_large;
    }

    pub(crate) fn space_medium(&mut self) {
        self.y += self.gap_medium;
    }

    pub(crate) fn space_small(&mut self) {
        self.y += self.gap_small;
    }
}

fn field(data: &TemplateData, key: &str, default: &str) -> String {
    data.fields
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn token_at(data: &TemplateData, index: usize) -> TokenInfo {
    data.tokens.get(index).cloned().unwrap_or_else(|| TokenInfo {
        symbol: "TOKEN".to_string(),
        name: "Token".to_string(),
        color: crate::model::DEFAULT_ACCENT.to_string(),
        ..TokenInfo::default()
    })
}

/// Milestone metric captions. Unrecognized keys fall back to the raw key so
/// arbitrary metrics still render.
pub(crate) fn metric_label(key: &str) -> String {
    match key {
        "transactions" => "transactions processed",
        "users" => "active users",
        "volume" => "in trading volume",
        "tvl" => "in total value locked",
        "pairs" => "trading pairs created",
        "trades" => "trades executed",
        other => other,
    }
    .to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NewPairCopy {
    pub(crate) kicker: String,
    pub(crate) headline: String,
    pub(crate) pair_label: String,
    pub(crate) subheadline: String,
    pub(crate) cta: String,
}

impl NewPairCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        let a = token_at(data, 0);
        let b = token_at(data, 1);
        Self {
            kicker: field(data, "kicker", "Digiko DEX"),
            headline: field(data, "headline", "New Pair Added").to_uppercase(),
            pair_label: format!("{} / {}", a.symbol, b.symbol),
            subheadline: field(data, "subheadline", "Trade now on digiko.io"),
            cta: field(data, "cta", "START TRADING"),
        }
    }
}

fn new_pair(p: &mut Painter, data: &TemplateData) {
    let copy = NewPairCopy::resolve(data);
    let accent = p.accent;
    let mut flow = Flow::start(p.w, p.h, 0.10);

    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_small();
    let used = p.headline(
        &copy.headline,
        flow.y,
        1.0,
        TextFill::Gradient(SOFT_WHITE, accent),
    );
    flow.advance(used);
    flow.space_medium();
    let used = p.label(
        &copy.pair_label,
        p.w / 2.0,
        flow.y,
        p.w * 0.034,
        Align::Center,
        SOFT_WHITE,
    );
    flow.advance(used);

    let plat_y = p.h * 0.60;
    let footprint = p.w * 0.42;
    p.draw_platform(p.w / 2.0, plat_y, footprint);
    let r = p.w * 0.062;
    p.draw_token_badge(p.w / 2.0 - r * 1.35, plat_y - r * 1.5, r, &token_at(data, 0));
    p.draw_token_badge(p.w / 2.0 + r * 1.35, plat_y - r * 1.2, r, &token_at(data, 1));

    p.subhead(&copy.subheadline, p.h * 0.76, SOFT_WHITE);
    p.cta(&copy.cta, p.h * 0.82, accent);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AprPromotionCopy {
    pub(crate) kicker: String,
    pub(crate) apr: String,
    pub(crate) apr_label: String,
    pub(crate) subheadline: String,
    pub(crate) cta: String,
}

impl AprPromotionCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        Self {
            kicker: field(data, "kicker", "Liquidity Program"),
            apr: field(data, "apr", "120%"),
            apr_label: field(data, "apr_label", "APR"),
            subheadline: field(data, "subheadline", "Provide liquidity, earn rewards"),
            cta: field(data, "cta", "STAKE NOW • digiko.io"),
        }
    }
}

fn apr_promotion(p: &mut Painter, data: &TemplateData) {
    let copy = AprPromotionCopy::resolve(data);
    let accent = p.accent;
    let mut flow = Flow::start(p.w, p.h, 0.09);

    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_medium();
    let used = p.headline(
        &copy.apr,
        flow.y,
        1.4,
        TextFill::Gradient(accent, SOFT_WHITE),
    );
    flow.advance(used);
    flow.space_small();
    let used = p.label(
        &copy.apr_label,
        p.w / 2.0,
        flow.y,
        p.w * 0.026,
        Align::Center,
        DIM,
    );
    flow.advance(used);
    flow.space_large();
    p.subhead(&copy.subheadline, flow.y, SOFT_WHITE);

    let plat_y = p.h * 0.64;
    p.draw_platform(p.w / 2.0, plat_y, p.w * 0.38);
    let r = p.w * 0.068;
    p.draw_token_badge(p.w / 2.0, plat_y - r * 1.3, r, &token_at(data, 0));

    p.cta(&copy.cta, p.h * 0.82, accent);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ListingCopy {
    pub(crate) kicker: String,
    pub(crate) hero: String,
    pub(crate) secondary: String,
    pub(crate) subheadline: String,
    pub(crate) cta: String,
}

impl ListingCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        let token = token_at(data, 0);
        let subheadline = field(data, "subheadline", "Now on Digiko");
        Self {
            kicker: field(data, "kicker", "New Listing"),
            hero: token.symbol.clone(),
            secondary: field(data, "secondary", "is now available"),
            cta: format!("{} • {}", token.symbol, subheadline),
            subheadline,
        }
    }
}

fn listing(p: &mut Painter, data: &TemplateData) {
    let copy = ListingCopy::resolve(data);
    let accent = p.accent;
    let mut flow = Flow::start(p.w, p.h, 0.10);

    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_medium();
    let used = p.headline(
        &copy.hero,
        flow.y,
        1.25,
        TextFill::Gradient(SOFT_WHITE, accent),
    );
    flow.advance(used);
    flow.space_small();
    p.subhead(&copy.secondary, flow.y, DIM);

    let plat_y = p.h * 0.62;
    p.draw_platform(p.w / 2.0, plat_y, p.w * 0.40);
    let r = p.w * 0.072;
    p.draw_token_badge(p.w / 2.0, plat_y - r * 1.3, r, &token_at(data, 0));

    p.cta(&copy.cta, p.h * 0.82, accent);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AnnouncementCopy {
    pub(crate) kicker: String,
    pub(crate) headline_lines: Vec<String>,
    pub(crate) body: String,
}

impl AnnouncementCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        let headline = field(data, "headline", "Big News").to_uppercase();
        Self {
            kicker: field(data, "kicker", "Announcement"),
            headline_lines: split_headline(&headline),
            body: field(
                data,
                "body",
                "Something new is coming to the Digiko ecosystem. Stay tuned.",
            ),
        }
    }
}

/// Headlines longer than 3 words break into two centered lines at reduced
/// scale.
pub(crate) fn split_headline(headline: &str) -> Vec<String> {
    let words: Vec<&str> = headline.split_whitespace().collect();
    if words.len() <= 3 {
        return vec![words.join(" ")];
    }
    let mid = words.len().div_ceil(2);
    vec![words[..mid].join(" "), words[mid..].join(" ")]
}

fn announcement(p: &mut Painter, data: &TemplateData) {
    let copy = AnnouncementCopy::resolve(data);
    let accent = p.accent;
    let mut flow = Flow::start(p.w, p.h, 0.12);

    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_medium();

    let scale = if copy.headline_lines.len() > 1 { 0.78 } else { 1.0 };
    for line in &copy.headline_lines {
        let used = p.headline(line, flow.y, scale, TextFill::Gradient(SOFT_WHITE, accent));
        flow.advance(used);
    }
    flow.space_large();
    let max_width = p.w * 0.72;
    let used = p.body(&copy.body, flow.y, max_width, DIM);
    flow.advance(used);

    p.draw_chain(p.w / 2.0, p.h * 0.68, p.w * 0.60);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MilestoneCopy {
    pub(crate) kicker: String,
    pub(crate) number: String,
    pub(crate) metric: String,
    pub(crate) subheadline: String,
}

impl MilestoneCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        Self {
            kicker: field(data, "kicker", "Milestone"),
            number: field(data, "number", "1,000,000"),
            metric: metric_label(&field(data, "metric", "transactions")),
            subheadline: field(data, "subheadline", "and counting"),
        }
    }
}

fn milestone(p: &mut Painter, data: &TemplateData) {
    let copy = MilestoneCopy::resolve(data);
    let accent = p.accent;
    let mut flow = Flow::start(p.w, p.h, 0.16);

    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_large();

    // Hero value gets an extra halo beyond the headline glow.
    p.glow_at(accent, p.w / 2.0, flow.y + p.w * 0.07, p.w * 0.9, p.w * 0.34, 0.22, 0.08);
    let used = p.headline(
        &copy.number,
        flow.y,
        1.55,
        TextFill::Gradient(SOFT_WHITE, accent),
    );
    flow.advance(used);
    flow.space_medium();
    let used = p.subhead(&copy.metric, flow.y, accent);
    flow.advance(used);
    flow.space_xl();

    let rule_w = p.w * 0.12;
    p.line(
        Point::new(p.w / 2.0 - rule_w / 2.0, flow.y),
        Point::new(p.w / 2.0 + rule_w / 2.0, flow.y),
        accent.with_alpha(0.6),
        2.0,
    );
    flow.space_large();
    p.subhead(&copy.subheadline, flow.y, DIM);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SeasonCopy {
    pub(crate) kicker: String,
    pub(crate) headline: String,
    pub(crate) top_players: String,
    pub(crate) duration: String,
    pub(crate) cta: String,
}

impl SeasonCopy {
    pub(crate) fn resolve(data: &TemplateData) -> Self {
        Self {
            kicker: field(data, "kicker", "Trading Season"),
            headline: field(data, "headline", "Season One").to_uppercase(),
            top_players: field(data, "top_players", "TOP 100"),
            duration: field(data, "duration", "30 DAYS"),
            cta: field(data, "cta", "COMPETE NOW • digiko.io"),
        }
    }
}

fn season_announcement(p: &mut Painter, data: &TemplateData) {
    let copy = SeasonCopy::resolve(data);
    let accent = p.accent;
    let (w, h) = (p.w, p.h);

    checker_corner(p, w * 0.05, h * 0.045);
    checker_corner(p, w * 0.71, h * 0.92);
    speed_lines(p);

    let mut flow = Flow::start(p.w, p.h, 0.12);
    let used = p.kicker(&copy.kicker, flow.y);
    flow.advance(used);
    flow.space_medium();
    let used = p.headline(
        &copy.headline,
        flow.y,
        1.0,
        TextFill::Gradient(SOFT_WHITE, accent),
    );
    flow.advance(used);
    flow.space_xl();

    let card_w = w * 0.30;
    let card_h = w * 0.15;
    let card_y = flow.y + card_h / 2.0;
    info_card(p, w * 0.33, card_y, card_w, card_h, "TOP PLAYERS", &copy.top_players);
    info_card(p, w * 0.67, card_y, card_w, card_h, "DURATION", &copy.duration);

    p.cta(&copy.cta, p.h * 0.80, accent);
}

fn info_card(p: &mut Painter, cx: f64, cy: f64, w: f64, h: f64, caption: &str, value: &str) {
    let accent = p.accent;
    let rect = Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);
    p.fill_rect(rect, CARD_FILL.with_alpha(0.85));
    p.stroke_path(&crate::render::painter::polygon_path(&[
        (rect.x0, rect.y0),
        (rect.x1, rect.y0),
        (rect.x1, rect.y1),
        (rect.x0, rect.y1),
    ]), accent.with_alpha(0.4), 1.5);

    p.label(caption, cx, rect.y0 + h * 0.16, p.w * 0.012, Align::Center, DIM);
    p.label(value, cx, rect.y0 + h * 0.45, p.w * 0.026, Align::Center, SOFT_WHITE);
}

/// Two rows of alternating cells, the checkered-flag motif.
fn checker_corner(p: &mut Painter, x: f64, y: f64) {
    let cell = p.w * 0.012;
    for row in 0..2 {
        for col in 0..10 {
            if (row + col) % 2 == 0 {
                let x0 = x + f64::from(col) * cell;
                let y0 = y + f64::from(row) * cell;
                p.fill_rect(
                    Rect::new(x0, y0, x0 + cell, y0 + cell),
                    SOFT_WHITE.with_alpha(0.5),
                );
            }
        }
    }
}

fn speed_lines(p: &mut Painter) {
    let accent = p.accent;
    for i in 0..5u32 {
        let t = f64::from(i);
        let y = p.h * (0.30 + 0.055 * t);
        let len = p.w * (0.05 + 0.018 * f64::from(i % 3));
        p.line(
            Point::new(p.w * 0.94 - len, y),
            Point::new(p.w * 0.94, y),
            accent.with_alpha(0.35),
            2.0,
        );
        p.line(
            Point::new(p.w * 0.06, p.h - y),
            Point::new(p.w * 0.06 + len, p.h - y),
            accent.with_alpha(0.35),
            2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Template;

    #[test]
    fn new_pair_defaults_uppercase_headline_and_pair_label() {
        let data = TemplateData::new(Template::NewPair)
            .with_token(TokenInfo::new("DGKO"))
            .with_token(TokenInfo::new("KLV"));
        let copy = NewPairCopy::resolve(&data);
        assert_eq!(copy.headline, "NEW PAIR ADDED");
        assert_eq!(copy.pair_label, "DGKO / KLV");
    }

    #[test]
    fn new_pair_missing_tokens_use_placeholders() {
        let data = TemplateData::new(Template::NewPair);
        let copy = NewPairCopy::resolve(&data);
        assert_eq!(copy.pair_label, "TOKEN / TOKEN");
    }

    #[test]
    fn listing_concatenates_cta_from_symbol_and_subheadline() {
        let data = TemplateData::new(Template::Listing)
            .with_token(TokenInfo::new("ABC"))
            .with_field("subheadline", "Now on Digiko");
        let copy = ListingCopy::resolve(&data);
        assert_eq!(copy.hero, "ABC");
        assert_eq!(copy.secondary, "is now available");
        assert_eq!(copy.cta, "ABC • Now on Digiko");
    }

    #[test]
    fn milestone_metric_lookup_and_fallback() {
        let data = TemplateData::new(Template::Milestone)
            .with_field("number", "1,000,000")
            .with_field("metric", "users");
        let copy = MilestoneCopy::resolve(&data);
        assert_eq!(copy.metric, "active users");

        let data = TemplateData::new(Template::Milestone).with_field("metric", "unknown_key");
        let copy = MilestoneCopy::resolve(&data);
        assert_eq!(copy.metric, "unknown_key");
    }

    #[test]
    fn metric_table_known_keys() {
        assert_eq!(metric_label("transactions"), "transactions processed");
        assert_eq!(metric_label("volume"), "in trading volume");
        assert_eq!(metric_label("tvl"), "in total value locked");
    }

    #[test]
    fn announcement_splits_long_headlines() {
        assert_eq!(split_headline("BIG NEWS TODAY"), vec!["BIG NEWS TODAY"]);
        assert_eq!(
            split_headline("A VERY LONG HEADLINE INDEED"),
            vec!["A VERY LONG", "HEADLINE INDEED"]
        );
    }

    #[test]
    fn empty_field_values_fall_back_to_defaults() {
        let data = TemplateData::new(Template::Milestone).with_field("number", "");
        let copy = MilestoneCopy::resolve(&data);
        assert_eq!(copy.number, "1,000,000");
    }

    #[test]
    fn flow_gaps_are_proportional_and_ordered() {
        let mut flow = Flow::start(1000.0, 1000.0, 0.1);
        assert_eq!(flow.y, 100.0);
        flow.space_small();
        assert_eq!(flow.y, 115.0);
        flow.space_medium();
        assert_eq!(flow.y, 140.0);
        flow.space_large();
        assert_eq!(flow.y, 180.0);
        flow.space_xl();
        assert_eq!(flow.y, 235.0);
        flow.advance(10.0);
        assert_eq!(flow.y, 245.0);
    }
}
