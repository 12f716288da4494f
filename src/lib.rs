//! Cardsmith composes promotional "social card" graphics for the Digiko DEX
//! entirely through programmatic 2D drawing: layered gradient/grid backdrops,
//! tracked typography, an isometric token platform, and six fixed template
//! recipes, rasterized on the CPU and exported as PNG.
//!
//! The engine consumes a plain [`TemplateData`] record plus an
//! [`AssetProvider`], and produces a [`CardFrame`]:
//!
//! - build a record, pick a [`CardSize`] preset
//! - construct a [`CardRenderer`] over a provider (logo loads are batched,
//!   deduplicated through a shared [`ImageCache`], and degrade silently)
//! - `render` and export PNG bytes
#![forbid(unsafe_code)]

pub mod assets;
pub mod color;
pub mod foundation;
pub mod model;
pub mod render;

pub use assets::{
    AssetProvider, BRAND_LOGO_URL, CancelToken, FsAssetProvider, ImageCache, ResolvedImages,
};
pub use color::Rgba;
pub use foundation::error::{CardError, CardResult};
pub use model::{CardSize, GridConfig, GridStyle, Template, TemplateData, TokenInfo};
pub use render::{CardFrame, CardRenderer};
