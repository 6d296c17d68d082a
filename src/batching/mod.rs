// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Bounded-concurrency fan-out for bulk operations.

pub mod executor;

pub use executor::{BatchExecutor, DEFAULT_BATCH_SIZE};
