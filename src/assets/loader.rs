use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::provider::AssetProvider;
use crate::foundation::error::CardError;

/// Aggregate result of one prefetch batch: every requested URL has settled,
/// and only the successes are present.
#[derive(Clone, Debug, Default)]
pub struct ResolvedImages {
    map: HashMap<String, Arc<PreparedImage>>,
}

impl ResolvedImages {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Arc<PreparedImage>> {
        self.map.get(url)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Cooperative abandonment for a superseded batch. Loads that have not
/// started when the token flips are skipped; their URLs settle as absent
/// without writing a failure marker, so a later batch can still load them.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
enum CacheEntry {
    Loaded(Arc<PreparedImage>),
    Failed,
}

enum Settled {
    Loaded(Arc<PreparedImage>),
    Failed,
    Skipped,
}

/// URL-keyed, append-only bitmap cache with process lifetime. Entries are
/// never evicted and failures are never retried.
#[derive(Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a batch of asset URLs. Cached entries are reused
    /// synchronously; the rest fan out over the provider in parallel. Every
    /// URL settles (loaded or failed) before the aggregate map is returned;
    /// a failed load is logged and degrades to absence, never an error. An
    /// empty URL set returns immediately without touching the provider.
    pub fn load_batch(
        &self,
        provider: &dyn AssetProvider,
        urls: &[String],
        cancel: &CancelToken,
    ) -> ResolvedImages {
        let unique: BTreeSet<&String> = urls.iter().collect();

        let mut out = HashMap::new();
        let mut pending: Vec<String> = Vec::new();
        if let Ok(entries) = self.entries.lock() {
            for url in unique {
                match entries.get(url.as_str()) {
                    Some(CacheEntry::Loaded(img)) => {
                        out.insert(url.clone(), img.clone());
                    }
                    Some(CacheEntry::Failed) => {}
                    None => pending.push(url.clone()),
                }
            }
        }

        if pending.is_empty() {
            return ResolvedImages { map: out };
        }

        let settled: Vec<(String, Settled)> = pending
            .into_par_iter()
            .map(|url| {
                if cancel.is_cancelled() {
                    return (url, Settled::Skipped);
                }
                let loaded = provider
                    .fetch(&url)
                    .map_err(CardError::from)
                    .and_then(|bytes| decode_image(&bytes));
                match loaded {
                    Ok(img) => {
                        let img = Arc::new(img);
                        (url, Settled::Loaded(img))
                    }
                    Err(err) => {
                        tracing::warn!(url = %url, error = %err, "asset load failed");
                        (url, Settled::Failed)
                    }
                }
            })
            .collect();

        if let Ok(mut entries) = self.entries.lock() {
            for (url, result) in settled {
                match result {
                    Settled::Loaded(img) => {
                        entries.insert(url.clone(), CacheEntry::Loaded(img.clone()));
                        out.insert(url, img);
                    }
                    Settled::Failed => {
                        entries.insert(url, CacheEntry::Failed);
                    }
                    Settled::Skipped => {}
                }
            }
        }

        ResolvedImages { map: out }
    }
}
