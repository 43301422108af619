// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Path-element node records and their typed content payloads.
// Author: Lukas Bower

//! Path-element nodes.

use crate::backend::{BarId, BarSide, ClientId, RuleKind, ViewId};
use crate::types::{NodeKind, Perm, Qid};

/// Typed reference carried by a node to the object it exposes.
///
/// Exactly one variant per referent kind; nodes never own window-manager
/// state. Static children inherit their parent's payload so that, say,
/// `/client/3/tags` still knows which client it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// No referent (root and `/client`, `/tag` themselves).
    None,
    /// A managed client.
    Client(ClientId),
    /// A view.
    View(ViewId),
    /// One whole bar group.
    BarGroup(BarSide),
    /// A single bar within a group.
    Bar(BarSide, BarId),
    /// A ruleset.
    Rules(RuleKind),
}

/// One resolved path segment.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind discriminant; selects read/write/clunk behavior.
    pub kind: NodeKind,
    /// Numeric half of the identity tuple.
    pub id: u32,
    /// Secondary ordinal (a client's list position).
    pub index: u32,
    /// Entry name as materialized.
    pub name: String,
    /// Permission word.
    pub perm: Perm,
    /// Referent.
    pub payload: Payload,
}

impl Node {
    /// The identity reported for this node.
    #[must_use]
    pub fn qid(&self) -> Qid {
        Qid::from_ident(self.kind, self.id)
    }

    /// Whether the node is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Stable handle to a pooled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) usize);
