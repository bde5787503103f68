use serde_json::Value;
use streamdeck_lib::Context;
use tracing::warn;

use crate::cache::ImageCache;
use crate::error::{CounterError, Result};
use crate::render::Theme;
use crate::store::CounterStore;

pub const DATA_KEY: &str = "data";
pub const PREFETCH_KEY: &str = "prefetchedData";
pub const PREFETCH_THEME_KEY: &str = "prefetchedTheme";

/// Flat key/value persistence. The plugin uses the host's global settings,
/// which Stream Deck writes to disk on its own schedule.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<Value>;
    fn set_item(&self, key: &str, value: Value);
}

impl Storage for Context {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.globals().get(key).map(|v| v.clone())
    }

    fn set_item(&self, key: &str, value: Value) {
        self.globals().with_mut(|m| {
            m.insert(key.to_string(), value);
        });
    }
}

/// Load the counter store, writing the default back if nothing usable is
/// stored.
pub fn load_store(storage: &impl Storage) -> CounterStore {
    match read_store(storage) {
        Ok(store) => store,
        Err(e) => {
            warn!("{e}; starting with a default counter");
            let store = CounterStore::default();
            save_store(storage, &store);
            store
        }
    }
}

fn read_store(storage: &impl Storage) -> Result<CounterStore> {
    let raw = storage
        .get_item(DATA_KEY)
        .ok_or_else(|| CounterError::StorageRead("nothing stored".to_string()))?;
    // Older saves hold the document as a JSON string.
    let raw = match raw {
        Value::String(s) => {
            serde_json::from_str(&s).map_err(|e| CounterError::StorageRead(e.to_string()))?
        }
        other => other,
    };
    serde_json::from_value(raw).map_err(|e| CounterError::StorageRead(e.to_string()))
}

pub fn save_store(storage: &impl Storage, store: &CounterStore) {
    match serde_json::to_value(store) {
        Ok(v) => storage.set_item(DATA_KEY, v),
        Err(e) => warn!("failed to serialise counters: {e}"),
    }
}

/// Stored cache entries, only if they were rendered with `theme`.
pub fn load_cache_entries(storage: &impl Storage, theme: Theme) -> Vec<(i64, String)> {
    let stored_theme = storage
        .get_item(PREFETCH_THEME_KEY)
        .and_then(|v| serde_json::from_value::<Theme>(v).ok());
    if stored_theme != Some(theme) {
        return Vec::new();
    }
    storage
        .get_item(PREFETCH_KEY)
        .map(|v| ImageCache::parse_stored(&v))
        .unwrap_or_default()
}

pub fn save_cache(storage: &impl Storage, cache: &ImageCache) {
    storage.set_item(PREFETCH_KEY, Value::Object(cache.to_stored()));
    match serde_json::to_value(cache.theme()) {
        Ok(v) => storage.set_item(PREFETCH_THEME_KEY, v),
        Err(e) => warn!("failed to serialise cache theme: {e}"),
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    items: std::sync::Mutex<serde_json::Map<String, Value>>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<Value> {
        self.items.lock().unwrap().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: Value) {
        self.items.lock().unwrap().insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::CounterValues;

    #[test]
    fn missing_data_writes_default_back() {
        let storage = MemoryStorage::default();
        let store = load_store(&storage);
        assert_eq!(store, CounterStore::default());
        assert_eq!(
            storage.get_item(DATA_KEY),
            Some(serde_json::to_value(CounterStore::default()).unwrap())
        );
    }

    #[test]
    fn corrupt_data_is_replaced() {
        for bad in [
            json!("{not json"),
            json!({ "counters": [] , "currentCounter": 0 }),
            json!({ "counters": [{ "id": 0, "name": "A", "count": "x", "increment": 1, "modulo": 0 }], "currentCounter": 0 }),
            json!(42),
        ] {
            let storage = MemoryStorage::default();
            storage.set_item(DATA_KEY, bad);
            assert_eq!(load_store(&storage), CounterStore::default());
            assert_eq!(
                storage.get_item(DATA_KEY),
                Some(serde_json::to_value(CounterStore::default()).unwrap())
            );
        }
    }

    #[test]
    fn store_round_trips() {
        let storage = MemoryStorage::default();
        let store = CounterStore::default()
            .create("B", CounterValues { count: 4, increment: 2, modulo: 9 })
            .switch_current(1)
            .unwrap();
        save_store(&storage, &store);
        let back = load_store(&storage);
        assert_eq!(back, store);
        assert_eq!(back.current_id(), 1);
    }

    #[test]
    fn string_encoded_document_is_accepted() {
        let storage = MemoryStorage::default();
        let doc = r#"{"counters":[{"id":0,"name":"Counter","count":7,"increment":1,"modulo":0}],"currentCounter":0}"#;
        storage.set_item(DATA_KEY, json!(doc));
        assert_eq!(load_store(&storage).current().count, 7);
    }

    #[test]
    fn cache_restores_only_for_matching_theme() {
        let storage = MemoryStorage::default();
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(0, 1, 3);
        save_cache(&storage, &cache);

        assert_eq!(load_cache_entries(&storage, Theme::Dark).len(), 3);
        assert!(load_cache_entries(&storage, Theme::Light).is_empty());
    }

    #[test]
    fn cache_without_theme_is_not_restored() {
        let storage = MemoryStorage::default();
        storage.set_item(PREFETCH_KEY, json!({ "1": "payload" }));
        assert!(load_cache_entries(&storage, Theme::Dark).is_empty());
    }
}
