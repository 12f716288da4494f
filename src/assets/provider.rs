use std::path::{Path, PathBuf};

use crate::foundation::error::{CardError, CardResult};

/// Brand footer logo; participates in every prefetch batch.
pub const BRAND_LOGO_URL: &str = "/brand/logo.png";

/// Display family used by headline/subhead/body prose.
pub const DISPLAY_FONT_URL: &str = "/fonts/display.ttf";

/// Monospace family used by kickers, CTA lines, badges and the footer.
pub const MONO_FONT_URL: &str = "/fonts/mono.ttf";

/// The seam between the engine and whatever hosts the assets. Implementations
/// must be cheap to call concurrently; the batched loader fans out over them.
pub trait AssetProvider: Send + Sync {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// Maps site-absolute asset URLs (`/tokens/dgko.png`) onto a directory root.
pub struct FsAssetProvider {
    root: PathBuf,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for FsAssetProvider {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let norm = normalize_url_path(url)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p).map_err(|e| anyhow::anyhow!("failed to read asset '{}': {e}", p.display()))
    }
}

/// Normalize a site-absolute or relative asset URL into a safe relative path.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects parent traversals (`..`).
pub(crate) fn normalize_url_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    let s = s.strip_prefix('/').unwrap_or(&s);
    if s.is_empty() {
        return Err(CardError::validation("asset url must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("asset urls must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardError::validation("asset url must contain a file name"));
    }

    Ok(out.join("/"))
}
