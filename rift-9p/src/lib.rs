// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose the rift window manager as a synthetic 9P-style namespace.
// Author: Lukas Bower

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! rift-9p: the window manager as a file tree.
//!
//! Scripts and status bars drive rift by reading and writing files instead
//! of speaking a bespoke IPC dialect. This crate is the namespace engine
//! behind that: it materializes directories on demand from the live
//! window-manager collections, dispatches the stateless remote-filesystem
//! verbs against them, and fans the `/event` stream out to blocked readers.
//!
//! The wire protocol itself is not here. A codec/transport layer decodes
//! frames, calls the matching [`Namespace`] method, and encodes the reply;
//! reads that park return [`ReadOutcome::Parked`] and complete later via
//! [`Namespace::take_completions`]. Execution is single-threaded and
//! run-to-completion; embedders serving concurrent transports must wrap
//! the instance in an exclusive lock.
//!
//! The window manager proper sits behind the [`Backend`] trait; this crate
//! only ever names its objects by typed id.

use thiserror::Error as ThisError;

pub mod backend;
pub mod buf;
mod core;
mod event;
pub mod lookup;
mod node;
mod pool;
pub mod stat;
pub mod tab;
mod types;

pub use crate::core::{Namespace, ReadOutcome, BAR_BUF_MAX, TAGS_MAX};
pub use crate::event::Completion;
pub use crate::node::{Node, NodeRef, Payload};
pub use crate::pool::NodePool;
pub use crate::types::{ident_path, NodeKind, OpenBase, OpenMode, Perm, Qid, QidType};
pub use backend::{Backend, BarId, BarSide, ClientId, RuleKind, ViewId};

/// Protocol-visible errors. The display strings are the exact error
/// strings clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The open mode or permission bits forbid the operation.
    #[error("permission denied")]
    Denied,
    /// A walk or lookup failed to resolve.
    #[error("file not found")]
    NotFound,
    /// A malformed argument, empty create name, or rejected write.
    #[error("bad value")]
    BadValue,
    /// An unrecognized control verb.
    #[error("bad command")]
    BadCommand,
    /// A parked read canceled by flush or by closing its handle.
    #[error("interrupted")]
    Interrupted,
}
