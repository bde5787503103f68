use streamdeck_lib::prelude::*;

use super::run_update;
use crate::store::input::CounterForm;

#[derive(Default)]
pub struct CreateAction;

impl ActionStatic for CreateAction {
    const ID: &'static str = super::ids::CREATE;
}

impl Action for CreateAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        let form = CounterForm::from_settings(&ev.settings);
        run_update(cx, ev.context, "create", |s| {
            let form = form?;
            Ok(s.create(&form.name, form.values))
        });
    }
}
