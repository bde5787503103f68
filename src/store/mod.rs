pub mod input;

use serde::{Deserialize, Serialize};

use crate::error::{CounterError, Result};

pub type CounterId = u32;

pub const DEFAULT_NAME: &str = "Counter";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub count: i64,
    pub increment: i64,
    /// `> 0` wraps `count` after each increment, anything else is unbounded.
    pub modulo: i64,
}

impl Counter {
    fn ticked(&self) -> Self {
        let mut next = self.clone();
        next.count = wrap(self.count.saturating_add(self.increment), self.modulo);
        next
    }
}

/// Truncated remainder: the result keeps the sign of `count`, so a negative
/// count stays negative under a positive modulo.
pub fn wrap(count: i64, modulo: i64) -> i64 {
    if modulo > 0 { count % modulo } else { count }
}

/// Numeric fields written by the settings form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterValues {
    pub count: i64,
    pub increment: i64,
    pub modulo: i64,
}

impl Default for CounterValues {
    fn default() -> Self {
        Self { count: 0, increment: 1, modulo: 0 }
    }
}

/// Ordered counters plus the one currently shown.
///
/// Every constructor checks that ids are unique and that the current id
/// resolves, so `current()` never fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStore", into = "RawStore")]
pub struct CounterStore {
    counters: Vec<Counter>,
    current: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStore {
    counters: Vec<Counter>,
    current_counter: CounterId,
}

impl TryFrom<RawStore> for CounterStore {
    type Error = CounterError;

    fn try_from(raw: RawStore) -> Result<Self> {
        Self::from_parts(raw.counters, raw.current_counter)
    }
}

impl From<CounterStore> for RawStore {
    fn from(store: CounterStore) -> Self {
        let current_counter = store.current_id();
        Self { counters: store.counters, current_counter }
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        let values = CounterValues::default();
        Self {
            counters: vec![Counter {
                id: 0,
                name: DEFAULT_NAME.to_string(),
                count: values.count,
                increment: values.increment,
                modulo: values.modulo,
            }],
            current: 0,
        }
    }
}

impl CounterStore {
    /// Ids must run `0..len` in display order, the only layout `create` can
    /// produce since counters are never deleted.
    pub fn from_parts(counters: Vec<Counter>, current_id: CounterId) -> Result<Self> {
        if let Some((pos, c)) = counters
            .iter()
            .enumerate()
            .find(|(pos, c)| c.id as usize != *pos)
        {
            return Err(CounterError::CorruptStore(format!(
                "counter id {} at position {pos}",
                c.id
            )));
        }
        let current = counters
            .iter()
            .position(|c| c.id == current_id)
            .ok_or_else(|| {
                CounterError::CorruptStore(format!("current counter {current_id} not found"))
            })?;
        Ok(Self { counters, current })
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn current(&self) -> &Counter {
        &self.counters[self.current]
    }

    pub fn current_id(&self) -> CounterId {
        self.current().id
    }

    pub fn get(&self, id: CounterId) -> Option<&Counter> {
        self.counters.iter().find(|c| c.id == id)
    }

    /// Id following the current counter in display order, wrapping around.
    pub fn next_counter_id(&self) -> CounterId {
        self.counters[(self.current + 1) % self.counters.len()].id
    }

    pub fn increment(&self, id: CounterId) -> Result<Self> {
        self.map_counter(id, Counter::ticked)
    }

    pub fn reset(&self, id: CounterId) -> Result<Self> {
        self.map_counter(id, |c| Counter { count: 0, ..c.clone() })
    }

    /// Overwrites the numeric fields as given; `count` is not wrapped.
    pub fn update_settings(&self, id: CounterId, values: CounterValues) -> Result<Self> {
        self.map_counter(id, |c| Counter {
            count: values.count,
            increment: values.increment,
            modulo: values.modulo,
            ..c.clone()
        })
    }

    /// Appends a counter with `id == counters.len()`. Names may repeat and the
    /// current counter does not change.
    pub fn create(&self, name: &str, values: CounterValues) -> Self {
        let mut next = self.clone();
        next.counters.push(Counter {
            id: self.counters.len() as CounterId,
            name: name.to_string(),
            count: values.count,
            increment: values.increment,
            modulo: values.modulo,
        });
        next
    }

    pub fn switch_current(&self, id: CounterId) -> Result<Self> {
        let idx = self.index_of(id)?;
        Ok(Self { counters: self.counters.clone(), current: idx })
    }

    fn index_of(&self, id: CounterId) -> Result<usize> {
        self.counters
            .iter()
            .position(|c| c.id == id)
            .ok_or(CounterError::InvalidReference(id))
    }

    fn map_counter(&self, id: CounterId, f: impl FnOnce(&Counter) -> Counter) -> Result<Self> {
        let idx = self.index_of(id)?;
        let mut next = self.clone();
        next.counters[idx] = f(&self.counters[idx]);
        Ok(next)
    }
}
