// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Arena allocator and reference counting for path-element nodes.
// Author: Lukas Bower

//! The node pool.
//!
//! Nodes are pooled because walks, enumerations and handle duplication churn
//! through them constantly. Slots live in an arena addressed by stable
//! [`NodeRef`] indices; a freelist threads through dead slots and the arena
//! grows by fixed batches. Memory is recycled, never returned.
//!
//! Reference counting is explicit and checked: incrementing a dead or
//! saturated slot, or releasing past zero, is a logic error in the engine
//! itself, never reachable from client input, and panics.

use crate::node::{Node, NodeRef};

const GROW_BATCH: usize = 16;

enum Slot {
    Free { next: Option<usize> },
    Used { node: Node, nref: u16 },
}

/// Pool of path-element nodes with manual reference counts.
#[derive(Default)]
pub struct NodePool {
    slots: Vec<Slot>,
    free_head: Option<usize>,
    live: usize,
}

impl NodePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Move a node into the pool with reference count 1.
    pub fn acquire(&mut self, node: Node) -> NodeRef {
        if self.free_head.is_none() {
            self.grow();
        }
        let idx = match self.free_head.take() {
            Some(idx) => idx,
            // grow() always threads at least one slot.
            None => unreachable!("node pool freelist empty after growth"),
        };
        match self.slots[idx] {
            Slot::Free { next } => self.free_head = next,
            Slot::Used { .. } => panic!("node pool: freelist points at a live slot"),
        }
        self.slots[idx] = Slot::Used { node, nref: 1 };
        self.live += 1;
        NodeRef(idx)
    }

    /// Borrow a live node.
    #[must_use]
    pub fn get(&self, r: NodeRef) -> &Node {
        match &self.slots[r.0] {
            Slot::Used { node, .. } => node,
            Slot::Free { .. } => panic!("node pool: use of a dead slot"),
        }
    }

    /// Increment one node's reference count.
    pub fn retain(&mut self, r: NodeRef) {
        match &mut self.slots[r.0] {
            Slot::Used { nref, .. } => {
                *nref = nref
                    .checked_add(1)
                    .unwrap_or_else(|| panic!("node pool: reference count saturated"));
            }
            Slot::Free { .. } => panic!("node pool: retain of a dead slot"),
        }
    }

    /// Increment every node's reference count along a chain.
    pub fn retain_chain(&mut self, chain: &[NodeRef]) {
        for r in chain {
            self.retain(*r);
        }
    }

    /// Decrement one node's reference count, recycling the slot at zero.
    pub fn release(&mut self, r: NodeRef) {
        let nref = match &mut self.slots[r.0] {
            Slot::Used { nref, .. } => {
                *nref = nref
                    .checked_sub(1)
                    .unwrap_or_else(|| panic!("node pool: reference count underflow"));
                *nref
            }
            Slot::Free { .. } => panic!("node pool: release of a dead slot"),
        };
        if nref == 0 {
            self.slots[r.0] = Slot::Free {
                next: self.free_head,
            };
            self.free_head = Some(r.0);
            self.live -= 1;
        }
    }

    /// Release every node of a chain once.
    pub fn release_chain(&mut self, chain: &[NodeRef]) {
        for r in chain {
            self.release(*r);
        }
    }

    /// Number of live nodes; walks must leave this unchanged on failure.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live
    }

    fn grow(&mut self) {
        let base = self.slots.len();
        self.slots.reserve(GROW_BATCH);
        for i in 0..GROW_BATCH {
            self.slots.push(Slot::Free {
                next: self.free_head,
            });
            self.free_head = Some(base + i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Payload;
    use crate::types::{NodeKind, Perm};

    fn node(name: &str) -> Node {
        Node {
            kind: NodeKind::Event,
            id: 0,
            index: 0,
            name: name.to_owned(),
            perm: Perm::file(0o600),
            payload: Payload::None,
        }
    }

    #[test]
    fn released_slots_are_recycled() {
        let mut pool = NodePool::new();
        let a = pool.acquire(node("a"));
        assert_eq!(pool.live(), 1);
        pool.release(a);
        assert_eq!(pool.live(), 0);
        let b = pool.acquire(node("b"));
        assert_eq!(b, a);
        assert_eq!(pool.get(b).name, "b");
    }

    #[test]
    fn retain_delays_recycling() {
        let mut pool = NodePool::new();
        let a = pool.acquire(node("a"));
        pool.retain(a);
        pool.release(a);
        assert_eq!(pool.live(), 1);
        assert_eq!(pool.get(a).name, "a");
        pool.release(a);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn grows_in_batches() {
        let mut pool = NodePool::new();
        let refs: Vec<_> = (0..GROW_BATCH + 1)
            .map(|i| pool.acquire(node(&i.to_string())))
            .collect();
        assert_eq!(pool.live(), GROW_BATCH + 1);
        pool.release_chain(&refs);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    #[should_panic(expected = "dead slot")]
    fn use_after_release_panics() {
        let mut pool = NodePool::new();
        let a = pool.acquire(node("a"));
        pool.release(a);
        let _ = pool.get(a);
    }
}
