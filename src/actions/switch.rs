use streamdeck_lib::prelude::*;

use super::run_update;
use crate::store::input::SwitchTarget;

/// Makes the key's `counterId` the current counter, or steps to the next one
/// when no id is set.
#[derive(Default)]
pub struct SwitchAction;

impl ActionStatic for SwitchAction {
    const ID: &'static str = super::ids::SWITCH;
}

impl Action for SwitchAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        let target = SwitchTarget::from_settings(&ev.settings);
        run_update(cx, ev.context, "switch", |s| match target? {
            SwitchTarget::Next => s.switch_current(s.next_counter_id()),
            SwitchTarget::Counter(id) => s.switch_current(id),
        });
    }
}
