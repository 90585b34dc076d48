use std::borrow::Cow;

use serde::{Serialize, Serializer, ser::SerializeMap};

/// A flattened, ordered key/value record for one logged step.
///
/// Keys keep insertion order so row-oriented sinks can derive a stable header
/// from the first record. Looking up a missing key yields zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(Cow<'static, str>, f64)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a value, or overwrites it if the key is already present.
    pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value for `key`, or zero if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> f64 {
        self.try_get(key).unwrap_or(0.0)
    }

    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_ref(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}
