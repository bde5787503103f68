use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;

use serde_json::{Map, Value};
use streamdeck_lib::prelude::*;
use tracing::debug;

use super::{run_update, show_current};
use crate::topics::STORE_CHANGED;

const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Shows the current counter. Short press counts, long press resets.
pub struct CountAction {
    holding: Arc<AtomicBool>,
    press_seq: u64,
    active_press_id: Arc<AtomicU64>,
    long_fired_press_id: Arc<AtomicU64>,
    long_press_ms: u64,
}

impl Default for CountAction {
    fn default() -> Self {
        Self {
            holding: Arc::new(AtomicBool::new(false)),
            press_seq: 0,
            active_press_id: Arc::new(AtomicU64::new(0)),
            long_fired_press_id: Arc::new(AtomicU64::new(0)),
            long_press_ms: DEFAULT_LONG_PRESS_MS,
        }
    }
}

impl ActionStatic for CountAction {
    const ID: &'static str = super::ids::COUNT;
}

impl Action for CountAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn topics(&self) -> &'static [&'static str] {
        &[STORE_CHANGED.name]
    }

    fn init(&mut self, cx: &Context, ctx_id: &str) {
        cx.sd().get_settings(ctx_id);
        show_current(cx, ctx_id);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &incoming::DidReceiveSettings) {
        self.long_press_ms = parse_long_press_ms(&ev.settings);
        show_current(cx, ev.context);
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        self.long_press_ms = parse_long_press_ms(&ev.settings);
        self.holding.store(true, Ordering::SeqCst);

        self.press_seq = self.press_seq.wrapping_add(1);
        let pid = self.press_seq;
        self.active_press_id.store(pid, Ordering::SeqCst);
        self.long_fired_press_id.store(0, Ordering::SeqCst);

        let holding = Arc::clone(&self.holding);
        let active_id = Arc::clone(&self.active_press_id);
        let fired_id = Arc::clone(&self.long_fired_press_id);
        let cx2 = cx.clone();
        let ctx = ev.context.to_string();
        let long_press_ms = self.long_press_ms;

        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(long_press_ms));

            // Only fire if still holding AND this is still the active press
            if !holding.load(Ordering::SeqCst) {
                return;
            }
            if active_id.load(Ordering::SeqCst) != pid {
                return;
            }

            fired_id.store(pid, Ordering::SeqCst);

            if run_update(&cx2, &ctx, "reset", |s| s.reset(s.current_id())).is_some() {
                show_current(&cx2, &ctx);
            }
        });
    }

    fn key_up(&mut self, cx: &Context, ev: &incoming::KeyUp) {
        self.holding.store(false, Ordering::SeqCst);

        let pid = self.active_press_id.load(Ordering::SeqCst);
        if self.long_fired_press_id.load(Ordering::SeqCst) == pid {
            // Long press already reset the counter
            return;
        }

        if run_update(cx, ev.context, "count", |s| s.increment(s.current_id())).is_some() {
            show_current(cx, ev.context);
        }
    }

    fn on_notify(&mut self, cx: &Context, ctx_id: &str, event: &ErasedTopic) {
        if let Some(n) = event.downcast(STORE_CHANGED) {
            debug!(counter = n.current, value = n.value, "store changed, redrawing");
            show_current(cx, ctx_id);
        }
    }
}

fn parse_long_press_ms(v: &Map<String, Value>) -> u64 {
    match v.get("longPressMs") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(DEFAULT_LONG_PRESS_MS),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_LONG_PRESS_MS),
        _ => DEFAULT_LONG_PRESS_MS,
    }
}
