// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Resolve directory children from template rows and live collections.
// Author: Lukas Bower

//! The namespace resolver.
//!
//! All lookup and directory organization happens here, driven by the
//! template tables. Called with a name it yields at most one child and
//! stops at the first match; called without one it materializes the full
//! ordered child list. Dynamic rows synthesize entries from whichever live
//! collection fits the parent's kind.

use crate::backend::{Backend, BarSide, RuleKind};
use crate::node::{Node, NodeRef, Payload};
use crate::pool::NodePool;
use crate::tab::{self, TabRow};
use crate::types::NodeKind;

/// Resolve `name` under `parent`, or enumerate every child when `name` is
/// `None`. A non-directory parent, or no match, yields an empty list; the
/// caller turns that into not-found.
pub fn resolve<B: Backend>(
    pool: &mut NodePool,
    backend: &B,
    parent: &Node,
    name: Option<&str>,
) -> Vec<NodeRef> {
    let mut found = Vec::new();
    if !parent.perm.is_dir() {
        return found;
    }
    let Some(rows) = tab::rows_for(parent.kind) else {
        return found;
    };
    // Row 0 is the directory's own "." entry; walks treat "." specially and
    // enumerations never list it.
    for row in &rows[1..] {
        if row.is_dynamic() {
            if dynamic_row(pool, backend, parent, row, name, &mut found) {
                return found;
            }
        } else if name.is_none() || name == Some(row.name) {
            let node = static_node(parent, row);
            found.push(pool.acquire(node));
            if name.is_some() {
                return found;
            }
        }
    }
    found
}

/// Materialize dynamic entries for one blank-named row. Returns true when a
/// named lookup is finished with this table, matched or not.
fn dynamic_row<B: Backend>(
    pool: &mut NodePool,
    backend: &B,
    parent: &Node,
    row: &TabRow,
    name: Option<&str>,
    found: &mut Vec<NodeRef>,
) -> bool {
    match parent.kind {
        NodeKind::ClientsDir => {
            if name.is_none() || name == Some("sel") {
                if let Some(id) = backend.selected_client() {
                    let index = backend.client_index(id).unwrap_or(0);
                    found.push(pool.acquire(Node {
                        kind: row.kind,
                        id: id.into_raw(),
                        index,
                        name: "sel".to_owned(),
                        perm: row.perm,
                        payload: Payload::Client(id),
                    }));
                }
                if name.is_some() {
                    return true;
                }
            }
            let wanted = match name {
                Some(text) => match text.parse::<u32>() {
                    Ok(n) => Some(n),
                    // Not "sel" and not numeric: nothing in this row.
                    Err(_) => return false,
                },
                None => None,
            };
            for (i, id) in backend.clients().into_iter().enumerate() {
                let i = i as u32;
                if wanted.is_none() || wanted == Some(i) {
                    found.push(pool.acquire(Node {
                        kind: row.kind,
                        id: id.into_raw(),
                        index: i,
                        name: i.to_string(),
                        perm: row.perm,
                        payload: Payload::Client(id),
                    }));
                    if wanted.is_some() {
                        return true;
                    }
                }
            }
            false
        }
        NodeKind::TagsDir => {
            if name.is_none() || name == Some("sel") {
                if let Some(id) = backend.selected_view() {
                    found.push(pool.acquire(Node {
                        kind: row.kind,
                        id: id.into_raw(),
                        index: 0,
                        name: "sel".to_owned(),
                        perm: row.perm,
                        payload: Payload::View(id),
                    }));
                }
                if name.is_some() {
                    return true;
                }
            }
            for id in backend.views() {
                let Some(view_name) = backend.view_name(id) else {
                    continue;
                };
                if name.is_none() || name == Some(view_name) {
                    found.push(pool.acquire(Node {
                        kind: row.kind,
                        id: id.into_raw(),
                        index: 0,
                        name: view_name.to_owned(),
                        perm: row.perm,
                        payload: Payload::View(id),
                    }));
                    if name.is_some() {
                        return true;
                    }
                }
            }
            false
        }
        NodeKind::BarsDir => {
            let Payload::BarGroup(side) = parent.payload else {
                return false;
            };
            for id in backend.bars(side) {
                let Some(bar_name) = backend.bar_name(side, id) else {
                    continue;
                };
                if name.is_none() || name == Some(bar_name) {
                    found.push(pool.acquire(Node {
                        kind: row.kind,
                        id: id.into_raw(),
                        index: 0,
                        name: bar_name.to_owned(),
                        perm: row.perm,
                        payload: Payload::Bar(side, id),
                    }));
                    if name.is_some() {
                        return true;
                    }
                }
            }
            false
        }
        _ => false,
    }
}

/// Build a static child. It inherits the parent's id, index and payload so
/// that files under a client or view directory keep their referent; a few
/// kinds then carry extra wiring.
fn static_node(parent: &Node, row: &TabRow) -> Node {
    let mut node = Node {
        kind: row.kind,
        id: 0,
        index: parent.index,
        name: row.name.to_owned(),
        perm: row.perm,
        payload: parent.payload,
    };
    match row.kind {
        NodeKind::BarsDir => {
            let side = if row.name == "lbar" {
                BarSide::Left
            } else {
                BarSide::Right
            };
            // Distinct ids keep the two bar groups' identity tuples apart.
            node.id = side as u32;
            node.payload = Payload::BarGroup(side);
        }
        NodeKind::ColRules => node.payload = Payload::Rules(RuleKind::Color),
        NodeKind::TagRules => node.payload = Payload::Rules(RuleKind::Tag),
        _ => {}
    }
    node
}

/// Build the root node installed by attach.
#[must_use]
pub fn root_node() -> Node {
    let row = &tab::ROOT[0];
    Node {
        kind: row.kind,
        id: 0,
        index: 0,
        name: "/".to_owned(),
        perm: row.perm,
        payload: Payload::None,
    }
}
