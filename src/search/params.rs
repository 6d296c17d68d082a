// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Flat protocol parameter set produced by the translator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single protocol parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    /// Emitted as one query pair per element
    List(Vec<String>),
}

impl ParamValue {
    /// Wire representation, one entry per repeated key.
    #[must_use]
    pub fn wire_values(&self) -> Vec<String> {
        match self {
            Self::Bool(b) => vec![b.to_string()],
            Self::Integer(n) => vec![n.to_string()],
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Parameter name → value, ordered by name so output is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtocolParameters {
    params: BTreeMap<String, ParamValue>,
}

impl ProtocolParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Expand into query-string pairs; list values become repeated keys.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .flat_map(|(name, value)| {
                value
                    .wire_values()
                    .into_iter()
                    .map(move |v| (name.clone(), v))
            })
            .collect()
    }
}
