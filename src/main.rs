mod actions;
mod cache;
mod config;
mod error;
mod render;
mod session;
mod state;
mod store;
mod topics;

use streamdeck_lib::prelude::*;
use tracing::info;

use actions::{
    count::CountAction, create::CreateAction, settings::SettingsAction, switch::SwitchAction,
};

pub const PLUGIN_ID: &str = "icu.veelume.multicounter";

fn main() -> anyhow::Result<()> {
    let _guard = init(PLUGIN_ID);
    info!("Starting V's Multi-Counter Stream Deck plugin");

    let plugin = Plugin::new()
        .add_action(ActionFactory::default_of::<CountAction>())
        .add_action(ActionFactory::default_of::<SettingsAction>())
        .add_action(ActionFactory::default_of::<SwitchAction>())
        .add_action(ActionFactory::default_of::<CreateAction>());

    run_plugin(plugin)
}
