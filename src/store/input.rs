//! Parse-or-reject handling of the text fields a key's property inspector
//! sends. Nothing here coerces: a field is either absent, or a clean integer,
//! or an `InvalidInput` error.

use serde_json::{Map, Value};

use super::{CounterId, CounterValues, DEFAULT_NAME};
use crate::error::{CounterError, Result};

/// Fields of the "Create Counter" key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterForm {
    pub name: String,
    pub values: CounterValues,
}

/// Fields of the "Settings" key. `None` keeps the counter's current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub count: Option<i64>,
    pub increment: Option<i64>,
    pub modulo: Option<i64>,
}

/// Target of the "Switch Counter" key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchTarget {
    Next,
    Counter(CounterId),
}

pub fn parse_int(field: &'static str, text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| CounterError::InvalidInput {
        field,
        value: text.to_string(),
    })
}

fn parse_modulo(text: &str) -> Result<i64> {
    let m = parse_int("modulo", text)?;
    if m < 0 {
        return Err(CounterError::InvalidInput { field: "modulo", value: text.to_string() });
    }
    Ok(m)
}

/// Raw text of a field; numbers are accepted as their decimal text.
fn field_text(v: &Map<String, Value>, k: &str) -> Option<String> {
    match v.get(k) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

fn optional(
    v: &Map<String, Value>,
    k: &str,
    parse: impl Fn(&str) -> Result<i64>,
) -> Result<Option<i64>> {
    field_text(v, k).map(|s| parse(&s)).transpose()
}

impl CounterForm {
    pub fn from_settings(v: &Map<String, Value>) -> Result<Self> {
        let defaults = CounterValues::default();
        let name = field_text(v, "name")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let values = CounterValues {
            count: optional(v, "count", |s| parse_int("count", s))?.unwrap_or(defaults.count),
            increment: optional(v, "increment", |s| parse_int("increment", s))?
                .unwrap_or(defaults.increment),
            modulo: optional(v, "modulo", parse_modulo)?.unwrap_or(defaults.modulo),
        };
        Ok(Self { name, values })
    }
}

impl SettingsForm {
    pub fn from_settings(v: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            count: optional(v, "count", |s| parse_int("count", s))?,
            increment: optional(v, "increment", |s| parse_int("increment", s))?,
            modulo: optional(v, "modulo", parse_modulo)?,
        })
    }

    /// Fill unset fields from `current`.
    pub fn merged(&self, current: CounterValues) -> CounterValues {
        CounterValues {
            count: self.count.unwrap_or(current.count),
            increment: self.increment.unwrap_or(current.increment),
            modulo: self.modulo.unwrap_or(current.modulo),
        }
    }
}

impl SwitchTarget {
    pub fn from_settings(v: &Map<String, Value>) -> Result<Self> {
        match field_text(v, "counterId") {
            Some(s) if !s.trim().is_empty() => {
                let id = parse_int("counterId", &s)?;
                CounterId::try_from(id)
                    .map(SwitchTarget::Counter)
                    .map_err(|_| CounterError::InvalidInput { field: "counterId", value: s })
            }
            _ => Ok(SwitchTarget::Next),
        }
    }
}
