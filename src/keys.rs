// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Hold the key-binding blob and rebuild the grab set from it.
// Author: Lukas Bower

//! Key bindings.
//!
//! `/keys` is a free-form blob, one binding name per line in the usual
//! `Mod1-x` chord notation. Writing it replaces the blob; clunking the
//! handle re-installs the grab set. Actually grabbing keys on the display
//! belongs to the X layer; here the parsed set is retained and logged.

use log::info;

/// The key-binding blob and its parsed bindings.
#[derive(Debug, Default)]
pub struct Keys {
    blob: Vec<u8>,
    bindings: Vec<String>,
}

impl Keys {
    /// Construct from an initial blob, parsing it immediately.
    #[must_use]
    pub fn from_blob(blob: &str) -> Self {
        let mut keys = Self {
            blob: blob.as_bytes().to_vec(),
            bindings: Vec::new(),
        };
        keys.commit();
        keys
    }

    /// The raw blob.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Mutable access to the raw blob.
    pub fn blob_mut(&mut self) -> &mut Vec<u8> {
        &mut self.blob
    }

    /// Rebuild the binding set from the blob.
    pub fn commit(&mut self) {
        let text = String::from_utf8_lossy(&self.blob);
        self.bindings = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        info!("grabbing {} key binding(s)", self.bindings.len());
    }

    /// The current binding set.
    #[must_use]
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }
}
