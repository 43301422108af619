// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Managed-client records exposed under /client.
// Author: Lukas Bower

//! Managed clients.

use rift_9p::ClientId;

/// One managed client window, reduced to the state the filesystem
/// observes: identity, properties and tag membership.
#[derive(Debug, Clone)]
pub struct Client {
    id: ClientId,
    name: String,
    props: Vec<u8>,
    tags: Vec<u8>,
}

impl Client {
    /// Create a client record. `props` is the `class:instance:title`
    /// property string reported by the windowing layer.
    #[must_use]
    pub fn new(id: ClientId, name: impl Into<String>, props: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            props: props.into().into_bytes(),
            tags: Vec::new(),
        }
    }

    /// The client's id.
    #[must_use]
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// The client's title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property string.
    #[must_use]
    pub fn props(&self) -> &[u8] {
        &self.props
    }

    /// The raw tag buffer.
    #[must_use]
    pub fn tags(&self) -> &[u8] {
        &self.tags
    }

    /// Mutable access to the raw tag buffer.
    pub fn tags_mut(&mut self) -> &mut Vec<u8> {
        &mut self.tags
    }

    /// Tag names parsed from the buffer: `+`-separated, blanks dropped.
    #[must_use]
    pub fn tag_names(&self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.tags);
        let mut names = Vec::new();
        for name in text.split('+') {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        names
    }

    /// Replace the tag buffer with the canonical join of `names`.
    pub fn set_tag_names(&mut self, names: &[String]) {
        self.tags = names.join("+").into_bytes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_are_split_and_deduped() {
        let mut client = Client::new(ClientId::from_raw(1), "xterm", "XTerm:xterm:xterm");
        client.tags_mut().extend_from_slice(b"web+dev+web+ +dev");
        assert_eq!(client.tag_names(), vec!["web".to_owned(), "dev".to_owned()]);
        client.set_tag_names(&["a".to_owned(), "b".to_owned()]);
        assert_eq!(client.tags(), b"a+b");
    }
}
