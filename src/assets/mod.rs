mod decode;
mod loader;
mod provider;

pub use decode::{PreparedImage, decode_image};
pub use loader::{CancelToken, ImageCache, ResolvedImages};
pub use provider::{
    AssetProvider, BRAND_LOGO_URL, DISPLAY_FONT_URL, FsAssetProvider, MONO_FONT_URL,
};
