// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Bar records and the sorted per-side bar groups under /lbar and /rbar.
// Author: Lukas Bower

//! Bars.
//!
//! Each side of the screen carries a group of named bars kept sorted by
//! name. A bar's raw buffer is what clients write; committing the buffer
//! peels an optional leading color spec off it, trims trailing newlines and
//! installs the remainder as display text.

use rift_9p::BarId;

use crate::color::ColorSpec;

/// One bar.
#[derive(Debug, Clone)]
pub struct Bar {
    id: BarId,
    name: String,
    buf: Vec<u8>,
    colors: ColorSpec,
    text: String,
}

impl Bar {
    /// Create an empty bar with the group's default colors.
    #[must_use]
    pub fn new(id: BarId, name: impl Into<String>, colors: ColorSpec) -> Self {
        Self {
            id,
            name: name.into(),
            buf: Vec::new(),
            colors,
            text: String::new(),
        }
    }

    /// The bar's id.
    #[must_use]
    pub fn id(&self) -> BarId {
        self.id
    }

    /// The bar's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw buffer as last written.
    #[must_use]
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }

    /// Mutable access to the raw buffer.
    pub fn buf_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }

    /// The bar's current colors.
    #[must_use]
    pub fn colors(&self) -> &ColorSpec {
        &self.colors
    }

    /// The display text installed by the last commit.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Commit the buffer: consume a leading color spec if one parses,
    /// strip trailing newlines, install the rest as display text.
    pub fn commit(&mut self) {
        let raw = String::from_utf8_lossy(&self.buf).into_owned();
        let mut rest = raw.as_str();
        if let Some((colors, tail)) = ColorSpec::parse_prefix(rest) {
            self.colors = colors;
            rest = tail.strip_prefix(' ').unwrap_or(tail);
        }
        self.text = rest.trim_end_matches('\n').to_owned();
    }
}

/// One side's ordered bar list.
#[derive(Debug, Default)]
pub struct BarGroup {
    bars: Vec<Bar>,
}

impl BarGroup {
    /// Ids of all bars, in list (name-sorted) order.
    #[must_use]
    pub fn ids(&self) -> Vec<BarId> {
        self.bars.iter().map(Bar::id).collect()
    }

    /// Borrow a bar by id.
    #[must_use]
    pub fn get(&self, id: BarId) -> Option<&Bar> {
        self.bars.iter().find(|bar| bar.id() == id)
    }

    /// Borrow a bar mutably by id.
    pub fn get_mut(&mut self, id: BarId) -> Option<&mut Bar> {
        self.bars.iter_mut().find(|bar| bar.id() == id)
    }

    /// Look a bar up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Bar> {
        self.bars.iter().find(|bar| bar.name() == name)
    }

    /// Insert a bar at its name-sorted position.
    pub fn insert(&mut self, bar: Bar) {
        let at = self
            .bars
            .iter()
            .position(|b| b.name() > bar.name())
            .unwrap_or(self.bars.len());
        self.bars.insert(at, bar);
    }

    /// Remove a bar by id.
    pub fn remove(&mut self, id: BarId) -> Option<Bar> {
        let at = self.bars.iter().position(|bar| bar.id() == id)?;
        Some(self.bars.remove(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> ColorSpec {
        ColorSpec::parse("#222222 #eeeeee #666666").expect("default colors")
    }

    #[test]
    fn groups_stay_sorted_by_name() {
        let mut group = BarGroup::default();
        group.insert(Bar::new(BarId::from_raw(1), "mem", colors()));
        group.insert(Bar::new(BarId::from_raw(2), "cpu", colors()));
        group.insert(Bar::new(BarId::from_raw(3), "net", colors()));
        let names: Vec<&str> = group
            .ids()
            .into_iter()
            .filter_map(|id| group.get(id).map(Bar::name))
            .collect();
        assert_eq!(names, vec!["cpu", "mem", "net"]);
    }

    #[test]
    fn commit_peels_colors_and_newlines() {
        let mut bar = Bar::new(BarId::from_raw(1), "cpu", colors());
        bar.buf_mut()
            .extend_from_slice(b"#000000 #111111 #222222 load 0.42\n\n");
        bar.commit();
        assert_eq!(bar.colors().bg, 0x111111);
        assert_eq!(bar.text(), "load 0.42");
    }

    #[test]
    fn commit_without_colors_keeps_defaults() {
        let mut bar = Bar::new(BarId::from_raw(1), "cpu", colors());
        bar.buf_mut().extend_from_slice(b"plain text\n");
        bar.commit();
        assert_eq!(bar.colors(), &colors());
        assert_eq!(bar.text(), "plain text");
    }
}
