// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Translator
//!
//! Translates a [`SearchRequest`] into faceted-search protocol parameters.
//!
//! # Parameters Generated
//!
//! ```text
//! q, fl, rows, start, sort       - always
//! fq (repeatable)                - caller clause, then isManaged:("<bool>")
//! defType, qf                    - lucene | dismax | edismax
//! facet                          - always (true/false)
//! facet.field, facet.mincount,
//! facet.limit                    - facet block present
//! facet.contains[.ignoreCase]    - contains filter present
//! facet.range[.start|.end|.gap]  - range sub-block present
//! f.<key>                        - per-field overrides, merged last
//! ```

use super::params::{ParamValue, ProtocolParameters};
use super::request::{Facet, RankingMode, SearchRequest};

pub const MATCH_ALL: &str = "*:*";
pub const ALL_FIELDS: &str = "*";
pub const DEFAULT_ROWS: u32 = 10;
pub const DEFAULT_FACET_MINCOUNT: u32 = 0;
pub const DEFAULT_FACET_LIMIT: i64 = 10;

/// Faceted-search parameter translator
pub struct SearchTranslator;

impl SearchTranslator {
    /// Translate a request into protocol parameters. Total: every request
    /// yields a parameter set, absent options fall back to defaults.
    pub fn translate(request: &SearchRequest) -> ProtocolParameters {
        let mut params = ProtocolParameters::new();

        params.insert("q", request.query.as_deref().unwrap_or(MATCH_ALL));
        params.insert("fl", request.fields.as_deref().unwrap_or(ALL_FIELDS));
        params.insert("rows", i64::from(request.rows.unwrap_or(DEFAULT_ROWS)));
        params.insert("start", i64::try_from(request.start.unwrap_or(0)).unwrap_or(i64::MAX));
        params.insert("sort", request.sort.as_deref().unwrap_or(""));

        let filters = Self::filter_clauses(request);
        if !filters.is_empty() {
            params.insert("fq", filters);
        }

        let mode = request.ranking_mode();
        params.insert("defType", mode.def_type());
        if mode != RankingMode::Lucene {
            if let Some(qf) = request.dismax.as_ref().and_then(|d| d.qf.as_deref()) {
                params.insert("qf", qf);
            }
        }

        match &request.facet {
            Some(facet) => Self::translate_facet(facet, &mut params),
            None => params.insert("facet", false),
        }

        for (key, value) in &request.overrides {
            params.insert(format!("f.{}", key), value.clone());
        }

        params
    }

    fn filter_clauses(request: &SearchRequest) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(fq) = &request.facet_query {
            clauses.push(fq.clone());
        }
        if let Some(managed) = request.is_managed {
            clauses.push(format!("isManaged:(\"{}\")", managed));
        }
        clauses
    }

    fn translate_facet(facet: &Facet, params: &mut ProtocolParameters) {
        params.insert("facet", true);
        params.insert("facet.field", ParamValue::List(facet.fields.clone()));
        params.insert(
            "facet.mincount",
            i64::from(facet.mincount.unwrap_or(DEFAULT_FACET_MINCOUNT)),
        );
        params.insert("facet.limit", facet.limit.unwrap_or(DEFAULT_FACET_LIMIT));

        if let Some(contains) = &facet.contains {
            params.insert("facet.contains", contains.text.as_str());
            params.insert("facet.contains.ignoreCase", contains.ignore_case);
        }

        if let Some(range) = &facet.range {
            params.insert("facet.range", ParamValue::List(range.fields.clone()));
            params.insert("facet.range.start", range.start.as_str());
            params.insert("facet.range.end", range.end.as_str());
            params.insert("facet.range.gap", range.gap.as_str());
        }
    }
}

/// Escape query-syntax characters for literal identifier lookups.
///
/// Each of `+ - ! ( ) { } [ ] ^ " ~ * ? : /`, the tokens `&&` and `||`, and
/// whitespace gets one leading backslash. A lone `&` or `|` is kept as is.
pub fn escape_special_chars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' | '|' if chars.peek() == Some(&c) => {
                chars.next();
                escaped.push('\\');
                escaped.push(c);
                escaped.push(c);
            }
            '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~' | '*' | '?'
            | ':' | '/' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_whitespace() => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
