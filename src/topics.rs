use streamdeck_lib::TopicId;

use crate::store::CounterId;

/// Published after every successful store update.
/// Subscribed by `CountAction` so every count key shows the current counter.
pub const STORE_CHANGED: TopicId<StoreChanged> = TopicId::new("store_changed");

#[derive(Clone, Debug)]
pub struct StoreChanged {
    pub current: CounterId,
    pub value: i64,
}
