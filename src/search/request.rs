// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Structured search request.
//!
//! Every option is an `Option` whose default is applied by the translator,
//! so an empty request is a valid match-all search.
//!
//! # Example
//!
//! ```rust
//! use content_hub_connector::search::{SearchRequest, Facet, Dismax};
//!
//! let request = SearchRequest::new("name:hero*")
//!     .fields("id,name,path")
//!     .rows(25)
//!     .facet_query("classification:asset")
//!     .dismax(Dismax::extended("name^2 tags"))
//!     .facet(Facet::on_fields(["tags"]).limit(5))
//!     .managed(true);
//! assert_eq!(request.rows, Some(25));
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use super::params::ParamValue;

/// Relevance ranking strategy of the remote query parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    Lucene,
    Dismax,
    ExtendedDismax,
}

impl RankingMode {
    /// Value of the `defType` parameter.
    #[must_use]
    pub fn def_type(&self) -> &'static str {
        match self {
            Self::Lucene => "lucene",
            Self::Dismax => "dismax",
            Self::ExtendedDismax => "edismax",
        }
    }
}

/// Dismax ranking block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dismax {
    /// Use the extended parser (`edismax`)
    pub extended: bool,
    /// Query-field weights, e.g. `"name^2 tags"`
    pub qf: Option<String>,
}

impl Dismax {
    pub fn plain(qf: impl Into<String>) -> Self {
        Self { extended: false, qf: Some(qf.into()) }
    }

    pub fn extended(qf: impl Into<String>) -> Self {
        Self { extended: true, qf: Some(qf.into()) }
    }
}

/// Substring filter on facet values.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetContains {
    pub text: String,
    pub ignore_case: bool,
}

/// Range faceting. All four members are required.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetRange {
    pub fields: Vec<String>,
    pub start: String,
    pub end: String,
    pub gap: String,
}

/// Faceting block. Presence enables faceting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Facet {
    pub fields: Vec<String>,
    /// Default 0
    pub mincount: Option<u32>,
    /// Default 10; negative means unlimited on the remote side
    pub limit: Option<i64>,
    pub contains: Option<FacetContains>,
    pub range: Option<FacetRange>,
}

impl Facet {
    pub fn on_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn mincount(mut self, mincount: u32) -> Self {
        self.mincount = Some(mincount);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn contains(mut self, text: impl Into<String>, ignore_case: bool) -> Self {
        self.contains = Some(FacetContains { text: text.into(), ignore_case });
        self
    }

    pub fn range(mut self, range: FacetRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// A structured search request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    /// Default `*:*`
    pub query: Option<String>,
    /// Default `*`
    pub fields: Option<String>,
    /// Default 0
    pub start: Option<u64>,
    /// Default 10
    pub rows: Option<u32>,
    /// Default empty
    pub sort: Option<String>,
    /// Caller filter clause, emitted first in `fq`
    pub facet_query: Option<String>,
    pub dismax: Option<Dismax>,
    pub facet: Option<Facet>,
    /// Field-scoped parameters, emitted as `f.<key>`
    pub overrides: BTreeMap<String, ParamValue>,
    /// Tri-state managed filter; `None` adds no clause
    pub is_managed: Option<bool>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), ..Default::default() }
    }

    /// Match-all request.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn facet_query(mut self, clause: impl Into<String>) -> Self {
        self.facet_query = Some(clause.into());
        self
    }

    pub fn dismax(mut self, dismax: Dismax) -> Self {
        self.dismax = Some(dismax);
        self
    }

    pub fn facet(mut self, facet: Facet) -> Self {
        self.facet = Some(facet);
        self
    }

    pub fn override_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn managed(mut self, managed: bool) -> Self {
        self.is_managed = Some(managed);
        self
    }

    /// Ranking mode implied by the dismax block.
    #[must_use]
    pub fn ranking_mode(&self) -> RankingMode {
        match &self.dismax {
            Some(d) if d.extended => RankingMode::ExtendedDismax,
            Some(_) => RankingMode::Dismax,
            None => RankingMode::Lucene,
        }
    }

    /// Build a request from untyped JSON options. Never fails.
    ///
    /// Recognised keys: `query`, `fields`, `start`, `rows`, `sort`,
    /// `facetquery`, `dismax {extended, qf}`, `facet {fields, mincount,
    /// limit, contains {text, ignoreCase}, range {fields, start, end, gap}}`,
    /// `override`, `isManaged`. Members of the wrong type are treated as
    /// absent, so `"rows": "5"` falls back to the default row count.
    pub fn from_json(options: &Value) -> Self {
        let Some(obj) = options.as_object() else {
            return Self::default();
        };

        Self {
            query: obj.get("query").and_then(Value::as_str).map(String::from),
            fields: obj.get("fields").and_then(field_list).map(|f| f.join(",")),
            start: obj.get("start").and_then(Value::as_u64),
            rows: obj
                .get("rows")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            sort: obj.get("sort").and_then(Value::as_str).map(String::from),
            facet_query: obj.get("facetquery").and_then(Value::as_str).map(String::from),
            dismax: obj.get("dismax").and_then(Value::as_object).map(|d| Dismax {
                extended: d.get("extended").and_then(Value::as_bool).unwrap_or(false),
                qf: d.get("qf").and_then(Value::as_str).map(String::from),
            }),
            facet: obj.get("facet").and_then(Value::as_object).map(facet_from_json),
            overrides: obj
                .get("override")
                .and_then(Value::as_object)
                .map(|map| {
                    map.iter()
                        .filter_map(|(k, v)| param_from_json(v).map(|p| (k.clone(), p)))
                        .collect()
                })
                .unwrap_or_default(),
            is_managed: obj.get("isManaged").and_then(Value::as_bool),
        }
    }
}

fn facet_from_json(obj: &serde_json::Map<String, Value>) -> Facet {
    let contains = obj.get("contains").and_then(|c| match c {
        Value::String(text) => Some(FacetContains { text: text.clone(), ignore_case: false }),
        Value::Object(o) => o.get("text").and_then(Value::as_str).map(|text| FacetContains {
            text: text.to_string(),
            ignore_case: o.get("ignoreCase").and_then(Value::as_bool).unwrap_or(false),
        }),
        _ => None,
    });

    // Partial range blocks are dropped: the remote side rejects empty bounds.
    let range = obj.get("range").and_then(Value::as_object).and_then(|r| {
        Some(FacetRange {
            fields: r.get("fields").and_then(field_list)?,
            start: r.get("start").and_then(scalar_text)?,
            end: r.get("end").and_then(scalar_text)?,
            gap: r.get("gap").and_then(scalar_text)?,
        })
    });

    Facet {
        fields: obj.get("fields").and_then(field_list).unwrap_or_default(),
        mincount: obj
            .get("mincount")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok()),
        limit: obj.get("limit").and_then(Value::as_i64),
        contains,
        range,
    }
}

/// A string, a comma list, or an array of strings.
fn field_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
        ),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
        ),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn param_from_json(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::Number(n) => Some(
            n.as_i64()
                .map(ParamValue::Integer)
                .unwrap_or_else(|| ParamValue::Text(n.to_string())),
        ),
        Value::String(s) => Some(ParamValue::Text(s.clone())),
        Value::Array(items) => Some(ParamValue::List(
            items.iter().filter_map(scalar_text).collect(),
        )),
        _ => None,
    }
}
