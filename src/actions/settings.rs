use streamdeck_lib::prelude::*;

use super::run_update;
use crate::store::CounterValues;
use crate::store::input::SettingsForm;

/// Writes the key's `count` / `increment` / `modulo` fields onto the current
/// counter. Blank fields keep the counter's value.
#[derive(Default)]
pub struct SettingsAction;

impl ActionStatic for SettingsAction {
    const ID: &'static str = super::ids::SETTINGS;
}

impl Action for SettingsAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        let form = SettingsForm::from_settings(&ev.settings);
        run_update(cx, ev.context, "settings", |s| {
            let current = s.current();
            let values = form?.merged(CounterValues {
                count: current.count,
                increment: current.increment,
                modulo: current.modulo,
            });
            s.update_settings(current.id, values)
        });
    }
}
