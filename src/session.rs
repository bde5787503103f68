//! Runs pure store updates and then their side effects on storage and the
//! image cache.

use std::sync::{Mutex, MutexGuard, OnceLock};

use streamdeck_lib::Context;
use tracing::debug;

use crate::cache::ImageCache;
use crate::config::PluginConfig;
use crate::error::Result;
use crate::state::{Storage, load_cache_entries, load_store, save_cache, save_store};
use crate::store::CounterStore;

static CACHE: OnceLock<Mutex<ImageCache>> = OnceLock::new();

/// Process-wide image cache, restored from storage on first use.
pub fn shared_cache(cx: &Context) -> MutexGuard<'static, ImageCache> {
    let lock = CACHE.get_or_init(|| {
        let theme = PluginConfig::load(cx).theme;
        let mut cache = ImageCache::new(theme);
        cache.restore(load_cache_entries(cx, theme));
        if !cache.is_empty() {
            debug!(entries = cache.len(), "image cache restored");
        }
        Mutex::new(cache)
    });
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Load, update, and on success persist the store and refresh the cache.
/// Theme and prefetch depth come from the stored plugin config. Nothing is
/// written when `update` fails.
pub fn commit<S, F>(storage: &S, cache: &mut ImageCache, update: F) -> Result<CounterStore>
where
    S: Storage,
    F: FnOnce(&CounterStore) -> Result<CounterStore>,
{
    let config = PluginConfig::load(storage);
    let next = update(&load_store(storage))?;
    save_store(storage, &next);

    cache.set_theme(config.theme);
    let current = next.current();
    let added = cache.prefetch(current.count, current.increment, config.prefetch_depth);
    if added > 0 {
        debug!(added, total = cache.len(), "prefetched key images");
        save_cache(storage, cache);
    }
    Ok(next)
}

/// Image payload for the current counter.
pub fn current_image(storage: &impl Storage, cache: &mut ImageCache) -> String {
    let config = PluginConfig::load(storage);
    cache.set_theme(config.theme);
    let store = load_store(storage);
    cache.lookup(store.current().count)
}
