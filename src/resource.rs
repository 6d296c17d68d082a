// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Resource digests for upload integrity headers.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Bytes of a resource file together with its SHA-256 and length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDigest {
    pub bytes: Vec<u8>,
    pub sha256: [u8; 32],
    pub length: u64,
}

impl ResourceDigest {
    /// Read `path` and digest its contents.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let sha256: [u8; 32] = Sha256::digest(&bytes).into();
        let length = bytes.len() as u64;
        Self { bytes, sha256, length }
    }

    /// Value of the `Digest` request header: `SHA-256=<base64>`.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("SHA-256={}", STANDARD.encode(self.sha256))
    }
}
