// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Translation
//!
//! Turns structured search options into faceted-search wire parameters.
//!
//! # Architecture
//!
//! ```text
//! SearchRequest (typed or SearchRequest::from_json)
//!     ↓
//! SearchTranslator::translate → ProtocolParameters
//!     ↓
//! to_query_pairs() → q=..&fl=..&fq=..&fq=..  (lists as repeated keys)
//! ```
//!
//! # Example
//!
//! ```rust
//! use content_hub_connector::search::{SearchRequest, SearchTranslator, ParamValue};
//!
//! let params = SearchTranslator::translate(&SearchRequest::default());
//! assert_eq!(params.get("q"), Some(&ParamValue::Text("*:*".into())));
//! assert_eq!(params.get("facet"), Some(&ParamValue::Bool(false)));
//! ```

mod params;
mod request;
mod translator;

pub use params::{ParamValue, ProtocolParameters};
pub use request::{Dismax, Facet, FacetContains, FacetRange, RankingMode, SearchRequest};
pub use translator::{escape_special_chars, SearchTranslator, DEFAULT_ROWS, MATCH_ALL};
