// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Transport boundary.
//!
//! Everything above this module talks to the remote service through the
//! [`Transport`] trait. [`HttpTransport`] is the reqwest-backed production
//! implementation; [`ScriptedTransport`] answers from an in-memory handler.

pub mod traits;
pub mod http;
pub mod memory;

pub use traits::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
pub use http::HttpTransport;
pub use memory::ScriptedTransport;
