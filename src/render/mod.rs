use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::assets::{
    AssetProvider, BRAND_LOGO_URL, CancelToken, DISPLAY_FONT_URL, ImageCache, MONO_FONT_URL,
    ResolvedImages,
};
use crate::color::Rgba;
use crate::foundation::core::unpremul_channel;
use crate::foundation::error::{CardError, CardResult};
use crate::model::TemplateData;
use crate::render::painter::Painter;
use crate::render::text::TextEngine;

mod background;
mod footer;
mod grid;
mod paint;
mod painter;
mod platform;
mod templates;
mod text;

const ACCENT_FALLBACK: Rgba = Rgba::rgb(0x2d, 0xd4, 0xbf);

/// Session-style entry point: owns the asset provider and the shared image
/// cache, produces one [`CardFrame`] per call.
pub struct CardRenderer {
    provider: Arc<dyn AssetProvider>,
    cache: Arc<ImageCache>,
    font_bytes: Mutex<HashMap<&'static str, Option<Arc<Vec<u8>>>>>,
}

impl CardRenderer {
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        Self::with_cache(provider, Arc::new(ImageCache::new()))
    }

    /// Share one cache across renderers; entries are URL-keyed and immutable,
    /// so concurrent writers cannot conflict.
    pub fn with_cache(provider: Arc<dyn AssetProvider>, cache: Arc<ImageCache>) -> Self {
        Self {
            provider,
            cache,
            font_bytes: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> Arc<ImageCache> {
        self.cache.clone()
    }

    /// Prefetch every referenced logo asset, then draw.
    pub fn render(&self, data: &TemplateData) -> CardResult<CardFrame> {
        self.render_cancellable(data, &CancelToken::new())
    }

    /// Like [`render`](Self::render), but a superseded call can be abandoned
    /// through the token instead of completing a stale frame.
    #[tracing::instrument(skip_all, fields(template = ?data.template, size = ?data.size))]
    pub fn render_cancellable(
        &self,
        data: &TemplateData,
        cancel: &CancelToken,
    ) -> CardResult<CardFrame> {
        let urls = collect_asset_urls(data);
        let images = self.cache.load_batch(self.provider.as_ref(), &urls, cancel);
        if cancel.is_cancelled() {
            return Err(CardError::render("render superseded before draw"));
        }
        self.render_with_images(data, images)
    }

    /// Synchronous draw pass against an already-settled image map.
    pub fn render_with_images(
        &self,
        data: &TemplateData,
        images: ResolvedImages,
    ) -> CardResult<CardFrame> {
        let (width, height) = data.size.dimensions();
        let accent = Rgba::from_hex_or(&data.accent_color, ACCENT_FALLBACK);

        let mut text = TextEngine::new();
        if let Some(bytes) = self.font(DISPLAY_FONT_URL) {
            if let Err(err) = text.register_display(bytes.as_ref().clone()) {
                tracing::warn!(error = %err, "display font rejected");
            }
        }
        if let Some(bytes) = self.font(MONO_FONT_URL) {
            if let Err(err) = text.register_mono(bytes.as_ref().clone()) {
                tracing::warn!(error = %err, "mono font rejected");
            }
        }

        let mut painter = Painter::new(width, height, accent, data.fingerprint(), text, images)?;
        painter.draw_background(&data.grid);
        templates::draw_template(&mut painter, data);
        painter.draw_footer(data.show_disclaimer);

        let pixmap = painter.finish();
        tracing::debug!(width, height, "card rendered");
        Ok(CardFrame {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    /// Font bytes resolve once per renderer; a missing font is logged and the
    /// affected primitives degrade to drawing nothing.
    fn font(&self, url: &'static str) -> Option<Arc<Vec<u8>>> {
        if let Ok(mut cache) = self.font_bytes.lock() {
            if let Some(entry) = cache.get(url) {
                return entry.clone();
            }
            let fetched = match self.provider.fetch(url) {
                Ok(bytes) => Some(Arc::new(bytes)),
                Err(err) => {
                    tracing::warn!(url, error = %err, "font load failed");
                    None
                }
            };
            cache.insert(url, fetched.clone());
            return fetched;
        }
        None
    }
}

fn collect_asset_urls(data: &TemplateData) -> Vec<String> {
    let mut urls: Vec<String> = data
        .tokens
        .iter()
        .filter_map(|t| t.resolved_logo_url())
        .collect();
    urls.push(BRAND_LOGO_URL.to_string());
    urls
}

/// Finished raster card in premultiplied RGBA8, exposed for PNG export.
#[derive(Clone, Debug)]
pub struct CardFrame {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl CardFrame {
    pub fn data_premul(&self) -> &[u8] {
        &self.data
    }

    /// Straight-alpha copy of the frame.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_channel(px[0], a);
            px[1] = unpremul_channel(px[1], a);
            px[2] = unpremul_channel(px[2], a);
        }
        out
    }

    pub fn to_png(&self) -> CardResult<Vec<u8>> {
        encode_png(self.rgba_image()?)
    }

    /// PNG at a display-scale multiple. The multiplier only resizes the
    /// exported bitmap; drawing math is untouched.
    pub fn to_png_scaled(&self, scale: f32) -> CardResult<Vec<u8>> {
        let scale = scale.clamp(0.05, 4.0);
        let w = ((self.width as f32) * scale).round().max(1.0) as u32;
        let h = ((self.height as f32) * scale).round().max(1.0) as u32;
        let resized = image::imageops::resize(
            &self.rgba_image()?,
            w,
            h,
            image::imageops::FilterType::CatmullRom,
        );
        encode_png(resized)
    }

    pub fn write_png(&self, path: &Path) -> CardResult<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)
            .map_err(|e| CardError::encode(format!("failed to write '{}': {e}", path.display())))
    }

    fn rgba_image(&self) -> CardResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or_else(|| CardError::encode("frame byte length mismatch"))
    }
}

fn encode_png(img: image::RgbaImage) -> CardResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CardError::encode(format!("png encode failed: {e}")))?;
    Ok(buf)
}
