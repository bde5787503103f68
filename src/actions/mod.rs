pub mod count;
pub mod create;
pub mod settings;
pub mod switch;

use streamdeck_lib::prelude::*;
use tracing::{info, warn};

use crate::error::Result;
use crate::render::show_image;
use crate::session::{commit, current_image, shared_cache};
use crate::store::CounterStore;
use crate::topics::{STORE_CHANGED, StoreChanged};

pub mod ids {
    use crate::PLUGIN_ID;

    pub const COUNT: &str = const_format::concatcp!(PLUGIN_ID, ".count");
    pub const SETTINGS: &str = const_format::concatcp!(PLUGIN_ID, ".settings");
    pub const SWITCH: &str = const_format::concatcp!(PLUGIN_ID, ".switch");
    pub const CREATE: &str = const_format::concatcp!(PLUGIN_ID, ".create");
}

/// Apply `update` for the key `ctx_id`. On success every count key is told to
/// re-render; on failure the key shows the host's alert.
fn run_update<F>(cx: &Context, ctx_id: &str, what: &str, update: F) -> Option<CounterStore>
where
    F: FnOnce(&CounterStore) -> Result<CounterStore>,
{
    let result = commit(cx, &mut shared_cache(cx), update);
    match result {
        Ok(store) => {
            let current = store.current();
            info!(
                action = what,
                counter = current.id,
                value = current.count,
                counters = store.counters().len(),
                "counter updated"
            );
            cx.bus().publish_t(
                STORE_CHANGED,
                StoreChanged { current: current.id, value: current.count },
            );
            Some(store)
        }
        Err(e) => {
            warn!(action = what, "rejected: {e}");
            cx.sd().show_alert(ctx_id);
            None
        }
    }
}

/// Draw the current counter on a key.
fn show_current(cx: &Context, ctx_id: &str) {
    let payload = current_image(cx, &mut shared_cache(cx));
    show_image(cx, ctx_id, payload);
}
