use std::collections::BTreeMap;

/// Default accent when the record carries none: the Digiko teal.
pub const DEFAULT_ACCENT: &str = "#2dd4bf";

/// One of the six fixed layout recipes. Unrecognized strings deserialize to
/// [`Template::Unknown`], which renders background and footer only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    NewPair,
    AprPromotion,
    Listing,
    Announcement,
    Milestone,
    SeasonAnnouncement,
    #[serde(other)]
    Unknown,
}

/// Backdrop grid variant. Unrecognized strings deserialize to `None`, which
/// skips the grid band entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridStyle {
    Perspective,
    Isometric,
    Horizontal,
    Radial,
    Hex,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub style: GridStyle,
    /// Percent, 0..=100. Nonzero grids never fall below 10% alpha.
    #[serde(default = "default_grid_opacity")]
    pub opacity: u8,
    /// Line/ray/hex count tier: 1 = low, 2 = medium, 3 = high. Out-of-range
    /// values clamp to the nearest tier.
    #[serde(default = "default_grid_density")]
    pub density: u8,
}

fn default_grid_opacity() -> u8 {
    60
}

fn default_grid_density() -> u8 {
    2
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            style: GridStyle::None,
            opacity: default_grid_opacity(),
            density: default_grid_density(),
        }
    }
}

/// Named output presets; every render targets exactly one entry of this table.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CardSize {
    #[default]
    Square,
    Portrait,
    Story,
    Landscape,
    Banner,
}

impl CardSize {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1080, 1080),
            Self::Portrait => (1080, 1350),
            Self::Story => (1080, 1920),
            Self::Landscape => (1200, 630),
            Self::Banner => (1500, 500),
        }
    }

    pub fn all() -> [CardSize; 5] {
        [
            Self::Square,
            Self::Portrait,
            Self::Story,
            Self::Landscape,
            Self::Banner,
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl TokenInfo {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Logo resolution order: explicit `logo_url`, then the derived
    /// `/tokens/{lowercased symbol}.png` convention, then none (the badge
    /// falls back to a color fill with the token initial).
    pub fn resolved_logo_url(&self) -> Option<String> {
        if let Some(url) = &self.logo_url {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }
        if self.symbol.is_empty() {
            return None;
        }
        Some(format!("/tokens/{}.png", self.symbol.to_lowercase()))
    }

    /// Uppercased first symbol character, for the badge fallback glyph.
    pub fn initial(&self) -> char {
        self.symbol
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// Immutable input record for one render call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateData {
    pub template: Template,
    /// Free-form copy overrides; every lookup has a template-specific default.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Tokens referenced by the template (at most two are drawn).
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
    #[serde(default = "default_accent")]
    pub accent_color: String,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default = "default_show_disclaimer")]
    pub show_disclaimer: bool,
    #[serde(default)]
    pub size: CardSize,
}

fn default_accent() -> String {
    DEFAULT_ACCENT.to_string()
}

fn default_show_disclaimer() -> bool {
    true
}

impl TemplateData {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            fields: BTreeMap::new(),
            tokens: Vec::new(),
            accent_color: default_accent(),
            grid: GridConfig::default(),
            show_disclaimer: true,
            size: CardSize::default(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_token(mut self, token: TokenInfo) -> Self {
        self.tokens.push(token);
        self
    }

    /// Stable fingerprint of the record; seeds the per-render noise plane so
    /// identical inputs produce byte-identical frames.
    pub fn fingerprint(&self) -> u64 {
        serde_json::to_vec(self)
            .map(|bytes| xxhash_rust::xxh3::xxh3_64(&bytes))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_kebab_case_roundtrip() {
        let t: Template = serde_json::from_str("\"new-pair\"").unwrap();
        assert_eq!(t, Template::NewPair);
        let s = serde_json::to_string(&Template::SeasonAnnouncement).unwrap();
        assert_eq!(s, "\"season-announcement\"");
    }

    #[test]
    fn unknown_template_and_grid_style_do_not_fail() {
        let t: Template = serde_json::from_str("\"mystery-card\"").unwrap();
        assert_eq!(t, Template::Unknown);
        let g: GridStyle = serde_json::from_str("\"spiral\"").unwrap();
        assert_eq!(g, GridStyle::None);
    }

    #[test]
    fn partial_record_deserializes_with_defaults() {
        let data: TemplateData = serde_json::from_str(r#"{"template":"listing"}"#).unwrap();
        assert_eq!(data.template, Template::Listing);
        assert!(data.fields.is_empty());
        assert!(data.tokens.is_empty());
        assert_eq!(data.accent_color, DEFAULT_ACCENT);
        assert_eq!(data.grid.style, GridStyle::None);
        assert!(data.show_disclaimer);
        assert_eq!(data.size, CardSize::Square);
    }

    #[test]
    fn size_table_is_exact() {
        assert_eq!(CardSize::Square.dimensions(), (1080, 1080));
        assert_eq!(CardSize::Portrait.dimensions(), (1080, 1350));
        assert_eq!(CardSize::Story.dimensions(), (1080, 1920));
        assert_eq!(CardSize::Landscape.dimensions(), (1200, 630));
        assert_eq!(CardSize::Banner.dimensions(), (1500, 500));
    }

    #[test]
    fn logo_resolution_order() {
        let mut token = TokenInfo::new("DGKO");
        assert_eq!(
            token.resolved_logo_url().as_deref(),
            Some("/tokens/dgko.png")
        );

        token.logo_url = Some("https://cdn.example/dgko.png".to_string());
        assert_eq!(
            token.resolved_logo_url().as_deref(),
            Some("https://cdn.example/dgko.png")
        );

        let empty = TokenInfo::new("");
        assert_eq!(empty.resolved_logo_url(), None);
        assert_eq!(empty.initial(), '?');
        assert_eq!(TokenInfo::new("klv").initial(), 'K');
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = TemplateData::new(Template::Milestone).with_field("number", "1,000,000");
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = a.clone().with_field("number", "2,000,000");
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
