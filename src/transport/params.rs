//! Parameter sets and the layered merge that turns them into one canonical map.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;

/// Name of the computed signature parameter.
pub const SIGNATURE: &str = "Signature";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Insertion-ordered request parameters with unique keys.
///
/// Values are stringified on insertion with [`Display`], so numbers and
/// booleans become their literal form (`10`, `false`). Structured values must
/// be serialized (e.g. to JSON text) before insertion.
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    /// Insert a parameter only when a value is present.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Display>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Chaining form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Precedence of a parameter layer; higher layers override lower ones.
pub enum Priority {
    /// Protocol parameters every request carries (`Action`, `Timestamp`, ...).
    Common,
    /// Defaults an action fills in (`PageSize=10`, `AddressType=1`, ...).
    ActionDefaults,
    /// Values supplied by the caller.
    Caller,
}

#[derive(Debug, Clone, Default)]
/// Builder that merges prioritized parameter layers deterministically.
///
/// Layers are applied in ascending [`Priority`]; layers of equal priority are
/// applied in the order they were added, so the later one wins. A
/// [`SIGNATURE`] entry in any layer is discarded: the signature is always
/// computed, never supplied.
pub struct ParamLayers {
    layers: Vec<(Priority, Params)>,
}

impl ParamLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, priority: Priority, params: Params) -> Self {
        self.layers.push((priority, params));
        self
    }

    /// Merge all layers into a map sorted by key in byte order.
    pub fn merge(mut self) -> BTreeMap<String, String> {
        // `sort_by_key` is stable, keeping insertion order within a priority.
        self.layers.sort_by_key(|(priority, _)| *priority);

        let mut merged = BTreeMap::new();
        for (_, params) in self.layers {
            for (key, value) in params {
                if key == SIGNATURE {
                    debug!("discarding caller-supplied {SIGNATURE} parameter");
                    continue;
                }
                merged.insert(key, value);
            }
        }
        merged
    }
}
