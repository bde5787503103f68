use serde::Deserialize;
use tracing::warn;

use crate::cache::DEFAULT_PREFETCH;
use crate::render::Theme;
use crate::state::Storage;

pub const CONFIG_KEY: &str = "config";

/// Largest prefetch depth honoured; every commit renders up to this many
/// images on the event thread.
pub const MAX_PREFETCH: usize = 64;

/// Plugin-wide settings, stored in global settings under `"config"`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    pub theme: Theme,
    pub prefetch_depth: usize,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self { theme: Theme::Dark, prefetch_depth: DEFAULT_PREFETCH }
    }
}

impl PluginConfig {
    pub fn load(storage: &impl Storage) -> Self {
        let Some(raw) = storage.get_item(CONFIG_KEY) else {
            return Self::default();
        };
        let mut cfg: Self = serde_json::from_value(raw).unwrap_or_else(|e| {
            warn!("ignoring unreadable plugin config: {e}");
            Self::default()
        });
        if cfg.prefetch_depth > MAX_PREFETCH {
            warn!(
                depth = cfg.prefetch_depth,
                max = MAX_PREFETCH,
                "prefetch depth out of range, using {DEFAULT_PREFETCH}"
            );
            cfg.prefetch_depth = DEFAULT_PREFETCH;
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::MemoryStorage;

    #[test]
    fn missing_config_uses_defaults() {
        let storage = MemoryStorage::default();
        assert_eq!(PluginConfig::load(&storage), PluginConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let storage = MemoryStorage::default();
        storage.set_item(CONFIG_KEY, json!({ "theme": "light" }));
        let cfg = PluginConfig::load(&storage);
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.prefetch_depth, DEFAULT_PREFETCH);
    }

    #[test]
    fn oversized_prefetch_depth_falls_back() {
        let storage = MemoryStorage::default();
        storage.set_item(
            CONFIG_KEY,
            json!({ "theme": "light", "prefetchDepth": 1_000_000_000u64 }),
        );
        let cfg = PluginConfig::load(&storage);
        assert_eq!(cfg.prefetch_depth, DEFAULT_PREFETCH);
        assert_eq!(cfg.theme, Theme::Light);

        storage.set_item(CONFIG_KEY, json!({ "prefetchDepth": MAX_PREFETCH }));
        assert_eq!(PluginConfig::load(&storage).prefetch_depth, MAX_PREFETCH);
    }

    #[test]
    fn bad_config_falls_back() {
        let storage = MemoryStorage::default();
        storage.set_item(CONFIG_KEY, json!({ "theme": "sepia" }));
        assert_eq!(PluginConfig::load(&storage), PluginConfig::default());
    }
}
