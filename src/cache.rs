use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::render::{Theme, render_number};

pub const DEFAULT_PREFETCH: usize = 10;

/// Rendered key images keyed by counter value.
///
/// Entries are write-once and never evicted; the map only grows until
/// `clear` or a theme change.
#[derive(Debug, Default)]
pub struct ImageCache {
    theme: Theme,
    entries: HashMap<i64, String>,
    renders: u64,
}

impl ImageCache {
    pub fn new(theme: Theme) -> Self {
        Self { theme, entries: HashMap::new(), renders: 0 }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme; cached images of the old theme are dropped.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            debug!(?theme, dropped = self.entries.len(), "image cache theme changed");
            self.theme = theme;
            self.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, value: i64) -> Option<&str> {
        self.entries.get(&value).map(String::as_str)
    }

    /// Total renders performed, on demand or by prefetch.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    fn render(&mut self, value: i64) -> String {
        self.renders += 1;
        render_number(value, self.theme)
    }

    /// Render the next `count` values `current + k * increment`.
    ///
    /// No modulo is applied, so a wrapping counter leaves unreachable entries
    /// behind. Returns how many values were newly rendered.
    pub fn prefetch(&mut self, current: i64, increment: i64, count: usize) -> usize {
        let mut added = 0;
        let mut value = current;
        for _ in 0..count {
            value = value.saturating_add(increment);
            if self.entries.contains_key(&value) {
                continue;
            }
            let payload = self.render(value);
            self.entries.insert(value, payload);
            added += 1;
        }
        added
    }

    /// Cached payload, or a fresh render that is not stored.
    pub fn lookup(&mut self, value: i64) -> String {
        match self.get(value) {
            Some(payload) => payload.to_string(),
            None => self.render(value),
        }
    }

    /// Merge previously stored entries without overwriting existing ones.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (i64, String)>) {
        for (value, payload) in entries {
            self.entries.entry(value).or_insert(payload);
        }
    }

    /// Stored form: stringified value → payload.
    pub fn to_stored(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(v.as_str())))
            .collect()
    }

    /// Parse the stored form, skipping keys or payloads that don't fit.
    pub fn parse_stored(v: &Value) -> Vec<(i64, String)> {
        v.as_object()
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| Some((k.parse().ok()?, v.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefetch_renders_next_values() {
        let mut cache = ImageCache::new(Theme::Dark);
        assert_eq!(cache.prefetch(3, 2, DEFAULT_PREFETCH), 10);
        assert_eq!(cache.len(), 10);
        assert!(cache.get(3).is_none());
        assert!(cache.get(5).is_some());
        assert!(cache.get(23).is_some());
        assert!(cache.get(25).is_none());
    }

    #[test]
    fn prefetch_skips_cached_values() {
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(0, 1, 10);
        let renders = cache.render_count();
        assert_eq!(cache.prefetch(1, 1, 10), 1);
        assert_eq!(cache.render_count(), renders + 1);
    }

    #[test]
    fn zero_increment_renders_once() {
        let mut cache = ImageCache::new(Theme::Light);
        assert_eq!(cache.prefetch(4, 0, 10), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lookup_after_prefetch_does_not_render() {
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(0, 1, 10);
        let renders = cache.render_count();
        let payload = cache.lookup(4);
        assert_eq!(cache.render_count(), renders);
        assert_eq!(payload, render_number(4, Theme::Dark));
    }

    #[test]
    fn lookup_miss_renders_without_storing() {
        let mut cache = ImageCache::new(Theme::Dark);
        let payload = cache.lookup(99);
        assert_eq!(payload, render_number(99, Theme::Dark));
        assert_eq!(cache.render_count(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn theme_change_clears() {
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(0, 1, 3);
        cache.set_theme(Theme::Dark);
        assert_eq!(cache.len(), 3);
        cache.set_theme(Theme::Light);
        assert!(cache.is_empty());
        assert_eq!(cache.theme(), Theme::Light);
    }

    #[test]
    fn restore_is_write_once() {
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(0, 1, 1);
        cache.restore(vec![(1, "stale".to_string()), (2, "two".to_string())]);
        assert_eq!(cache.get(1), Some(render_number(1, Theme::Dark).as_str()));
        assert_eq!(cache.get(2), Some("two"));
    }

    #[test]
    fn stored_form_round_trips() {
        let mut cache = ImageCache::new(Theme::Dark);
        cache.prefetch(-2, 1, 4);
        let stored = Value::Object(cache.to_stored());
        assert!(stored.get("-1").is_some());

        let mut back = ImageCache::new(Theme::Dark);
        back.restore(ImageCache::parse_stored(&stored));
        assert_eq!(back.len(), 4);
        assert_eq!(back.get(2), cache.get(2));
    }

    #[test]
    fn parse_stored_skips_junk() {
        let v = json!({ "1": "a", "x": "b", "2": 3 });
        assert_eq!(ImageCache::parse_stored(&v), vec![(1, "a".to_string())]);
        assert!(ImageCache::parse_stored(&json!("nope")).is_empty());
    }
}
