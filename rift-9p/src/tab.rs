// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Static template tables describing every directory of the namespace.
// Author: Lukas Bower

//! Template tables.
//!
//! Each directory kind owns one immutable table of rows walked in
//! declaration order by the resolver. A row with an empty name stands for a
//! family of entries synthesized from a live collection at lookup time; the
//! leading `"."` row describes the directory itself and never appears in
//! enumerations.

use crate::types::{NodeKind, Perm};

/// One template row: name, node kind and permission word.
#[derive(Debug, Clone, Copy)]
pub struct TabRow {
    /// Entry name; empty for dynamic rows.
    pub name: &'static str,
    /// Kind of the node this row materializes.
    pub kind: NodeKind,
    /// Permission word stamped onto materialized nodes.
    pub perm: Perm,
}

impl TabRow {
    const fn new(name: &'static str, kind: NodeKind, perm: Perm) -> Self {
        Self { name, kind, perm }
    }

    /// Whether this row synthesizes entries from a live collection.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.name.is_empty()
    }
}

/// Rows of the filesystem root.
pub const ROOT: &[TabRow] = &[
    TabRow::new(".", NodeKind::Root, Perm::dir(0o500)),
    TabRow::new("rbar", NodeKind::BarsDir, Perm::dir(0o700)),
    TabRow::new("lbar", NodeKind::BarsDir, Perm::dir(0o700)),
    TabRow::new("client", NodeKind::ClientsDir, Perm::dir(0o500)),
    TabRow::new("tag", NodeKind::TagsDir, Perm::dir(0o500)),
    TabRow::new("ctl", NodeKind::RootCtl, Perm::append(0o600)),
    TabRow::new("colrules", NodeKind::ColRules, Perm::file(0o600)),
    TabRow::new("event", NodeKind::Event, Perm::file(0o600)),
    TabRow::new("keys", NodeKind::Keys, Perm::file(0o600)),
    TabRow::new("tagrules", NodeKind::TagRules, Perm::file(0o600)),
];

/// Rows of `/client`.
pub const CLIENTS: &[TabRow] = &[
    TabRow::new(".", NodeKind::ClientsDir, Perm::dir(0o500)),
    TabRow::new("", NodeKind::ClientDir, Perm::dir(0o500)),
];

/// Rows of one `/client/N` directory.
pub const CLIENT: &[TabRow] = &[
    TabRow::new(".", NodeKind::ClientDir, Perm::dir(0o500)),
    TabRow::new("ctl", NodeKind::ClientCtl, Perm::append(0o600)),
    TabRow::new("tags", NodeKind::ClientTags, Perm::file(0o600)),
    TabRow::new("props", NodeKind::Props, Perm::file(0o400)),
];

/// Rows of `/lbar` and `/rbar`.
pub const BARS: &[TabRow] = &[
    TabRow::new(".", NodeKind::BarsDir, Perm::dir(0o700)),
    TabRow::new("", NodeKind::Bar, Perm::file(0o600)),
];

/// Rows of `/tag`.
pub const TAGS: &[TabRow] = &[
    TabRow::new(".", NodeKind::TagsDir, Perm::dir(0o500)),
    TabRow::new("", NodeKind::TagDir, Perm::dir(0o500)),
];

/// Rows of one `/tag/NAME` directory.
pub const TAG: &[TabRow] = &[
    TabRow::new(".", NodeKind::TagDir, Perm::dir(0o500)),
    TabRow::new("ctl", NodeKind::TagCtl, Perm::append(0o600)),
    TabRow::new("index", NodeKind::TagIndex, Perm::file(0o400)),
];

/// Table governing a directory kind, or `None` for file kinds.
#[must_use]
pub fn rows_for(kind: NodeKind) -> Option<&'static [TabRow]> {
    match kind {
        NodeKind::Root => Some(ROOT),
        NodeKind::ClientsDir => Some(CLIENTS),
        NodeKind::ClientDir => Some(CLIENT),
        NodeKind::BarsDir => Some(BARS),
        NodeKind::TagsDir => Some(TAGS),
        NodeKind::TagDir => Some(TAG),
        _ => None,
    }
}
