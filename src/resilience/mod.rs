// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request resilience: one recovery action, one replay.

pub mod dispatch;

pub use dispatch::{retry_once, DispatchStage, Dispatcher, RetryPolicy};
