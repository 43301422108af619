// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Protocol dispatcher binding handles, the resolver and per-kind handlers.
// Author: Lukas Bower

//! The protocol dispatcher.
//!
//! One [`Namespace`] instance owns every piece of shared state: the node
//! pool, the fid table, the event log and the backend. Execution is strictly
//! sequential and run-to-completion; the only operation that defers is a
//! read on an empty event file, which parks and is later resolved by
//! [`Namespace::publish`] or [`Namespace::flush`] through the completion
//! outbox.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace};

use crate::backend::{Backend, BarId, BarSide, ClientId, RuleKind, ViewId};
use crate::buf;
use crate::event::{Completion, EventLog};
use crate::lookup;
use crate::node::{Node, NodeRef, Payload};
use crate::pool::NodePool;
use crate::stat::Stat;
use crate::types::{NodeKind, OpenBase, OpenMode, Qid};
use crate::Error;

/// Maximum length of a client's tag buffer.
pub const TAGS_MAX: usize = 255;
/// Maximum length of a bar's text buffer.
pub const BAR_BUF_MAX: usize = 279;

/// Result of a read: bytes now, or parked until publish/flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The read completed synchronously.
    Done(Vec<u8>),
    /// The read was parked; its reply arrives as a [`Completion`].
    Parked,
}

struct FidState {
    chain: Vec<NodeRef>,
    open: Option<OpenMode>,
}

/// The namespace service: dispatcher state plus the backend it exposes.
pub struct Namespace<B: Backend> {
    pool: NodePool,
    fids: HashMap<u32, FidState>,
    events: EventLog,
    completions: Vec<Completion>,
    backend: B,
    user: String,
}

impl<B: Backend> Namespace<B> {
    /// Create a namespace over the supplied backend.
    pub fn new(backend: B) -> Self {
        Self {
            pool: NodePool::new(),
            fids: HashMap::new(),
            events: EventLog::default(),
            completions: Vec::new(),
            backend,
            user: "rift".to_owned(),
        }
    }

    /// Set the user name reported in stat records.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Borrow the backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of live pool nodes; failed walks must not change this.
    #[must_use]
    pub fn live_nodes(&self) -> usize {
        self.pool.live()
    }

    /// Bind `fid` to a fresh root handle.
    pub fn attach(&mut self, fid: u32) -> Result<Qid, Error> {
        if self.fids.contains_key(&fid) {
            return Err(Error::BadValue);
        }
        let root = self.pool.acquire(lookup::root_node());
        let qid = self.pool.get(root).qid();
        self.fids.insert(
            fid,
            FidState {
                chain: vec![root],
                open: None,
            },
        );
        debug!("attach fid={fid}");
        Ok(qid)
    }

    /// Walk `names` from `fid`, committing the result to `newfid`.
    ///
    /// The candidate chain is built in a scratch vector; any unresolved
    /// component releases every scratch node and leaves both fids exactly
    /// as they were.
    pub fn walk(&mut self, fid: u32, newfid: u32, names: &[&str]) -> Result<Vec<Qid>, Error> {
        trace!("walk fid={fid} newfid={newfid} names={names:?}");
        let chain = self.fids.get(&fid).ok_or(Error::NotFound)?.chain.clone();
        if newfid != fid && self.fids.contains_key(&newfid) {
            return Err(Error::BadValue);
        }
        let mut scratch = chain;
        self.pool.retain_chain(&scratch);
        let mut qids = Vec::with_capacity(names.len());
        for name in names {
            match *name {
                ".." => {
                    if scratch.len() > 1 {
                        if let Some(r) = scratch.pop() {
                            self.pool.release(r);
                        }
                    }
                }
                "." => {}
                _ => {
                    let parent = self.pool.get(top(&scratch)).clone();
                    let found =
                        lookup::resolve(&mut self.pool, &self.backend, &parent, Some(name));
                    match found.first() {
                        Some(&r) => scratch.push(r),
                        None => break,
                    }
                }
            }
            qids.push(self.pool.get(top(&scratch)).qid());
        }
        if qids.len() < names.len() {
            self.pool.release_chain(&scratch);
            return Err(Error::NotFound);
        }
        if newfid == fid {
            if let Some(old) = self.fids.insert(
                fid,
                FidState {
                    chain: scratch,
                    open: None,
                },
            ) {
                self.pool.release_chain(&old.chain);
            }
        } else {
            self.fids.insert(
                newfid,
                FidState {
                    chain: scratch,
                    open: None,
                },
            );
        }
        Ok(qids)
    }

    /// Open `fid` for I/O under `mode`.
    pub fn open(&mut self, fid: u32, mode: OpenMode) -> Result<Qid, Error> {
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let node = self.pool.get(top(&state.chain)).clone();
        debug!("open fid={fid} kind={:?} mode={mode:?}", node.kind);
        if mode.base() == OpenBase::Exec {
            return Err(Error::Denied);
        }
        if mode.allows_write() && !node.perm.writable() {
            return Err(Error::Denied);
        }
        if mode.allows_read() && !node.perm.readable() {
            return Err(Error::Denied);
        }
        if node.kind == NodeKind::Event {
            self.events.subscribe(fid);
        }
        if let Some(state) = self.fids.get_mut(&fid) {
            state.open = Some(mode);
        }
        Ok(node.qid())
    }

    /// Create a file under the current node. Only bar groups accept
    /// creation; the new bar is resolved and prepended to the chain.
    pub fn create(&mut self, fid: u32, name: &str, mode: OpenMode) -> Result<Qid, Error> {
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let node = self.pool.get(top(&state.chain)).clone();
        if node.kind != NodeKind::BarsDir {
            return Err(Error::Denied);
        }
        let Payload::BarGroup(side) = node.payload else {
            return Err(Error::Denied);
        };
        if name.is_empty() {
            return Err(Error::BadValue);
        }
        debug!("create fid={fid} side={side:?} name={name}");
        self.backend.create_bar(side, name)?;
        let found = lookup::resolve(&mut self.pool, &self.backend, &node, Some(name));
        let Some(&new) = found.first() else {
            return Err(Error::NotFound);
        };
        let qid = self.pool.get(new).qid();
        if let Some(state) = self.fids.get_mut(&fid) {
            state.chain.push(new);
            state.open = Some(mode);
        }
        Ok(qid)
    }

    /// Read from `fid`. Directory reads enumerate and paginate stat
    /// records; the event file may park.
    pub fn read(&mut self, tag: u16, fid: u32, offset: u64, count: u32) -> Result<ReadOutcome, Error> {
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let open = state.open.ok_or(Error::Denied)?;
        if !open.allows_read() {
            return Err(Error::Denied);
        }
        let node = self.pool.get(top(&state.chain)).clone();
        trace!("read fid={fid} kind={:?} offset={offset} count={count}", node.kind);
        if node.is_dir() {
            if !node.perm.readable() {
                return Err(Error::Denied);
            }
            return Ok(ReadOutcome::Done(self.read_dir(&node, offset, count)));
        }
        let data = match node.kind {
            NodeKind::Props => {
                let id = client_of(&node)?;
                let props = self.backend.client_props(id).ok_or(Error::NotFound)?;
                buf::read_slice(props, offset, count)
            }
            NodeKind::ClientTags => {
                let id = client_of(&node)?;
                let tags = self.backend.client_tags(id).ok_or(Error::NotFound)?;
                buf::read_slice(tags, offset, count)
            }
            NodeKind::ColRules | NodeKind::TagRules => {
                let kind = rules_of(&node)?;
                buf::read_slice(self.backend.rule_text(kind), offset, count)
            }
            NodeKind::Keys => buf::read_slice(self.backend.keys(), offset, count),
            NodeKind::Bar => {
                let (side, id) = bar_of(&node)?;
                let text = self.backend.bar_buf(side, id).ok_or(Error::NotFound)?;
                buf::read_slice(text, offset, count)
            }
            NodeKind::RootCtl => {
                let text = self.backend.root_ctl_text();
                buf::read_slice(text.as_bytes(), offset, count)
            }
            NodeKind::ClientCtl => {
                // The client control file reads as the client's index and
                // only at offset zero.
                if offset != 0 {
                    Vec::new()
                } else {
                    let text = node.index.to_string();
                    buf::read_slice(text.as_bytes(), 0, count)
                }
            }
            NodeKind::TagCtl => {
                let id = view_of(&node)?;
                let name = self.backend.view_name(id).ok_or(Error::NotFound)?;
                buf::read_slice(name.as_bytes(), offset, count)
            }
            NodeKind::TagIndex => {
                let id = view_of(&node)?;
                let text = self.backend.view_index(id).ok_or(Error::NotFound)?;
                buf::read_slice(text.as_bytes(), offset, count)
            }
            NodeKind::Event => {
                return Ok(match self.events.read(tag, fid) {
                    Some(data) => ReadOutcome::Done(data),
                    None => ReadOutcome::Parked,
                });
            }
            _ => return Err(Error::Denied),
        };
        Ok(ReadOutcome::Done(data))
    }

    /// Write to `fid`. Empty writes succeed without touching anything.
    pub fn write(&mut self, fid: u32, offset: u64, data: &[u8]) -> Result<u32, Error> {
        if data.is_empty() {
            return Ok(0);
        }
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let open = state.open.ok_or(Error::Denied)?;
        if !open.allows_write() {
            return Err(Error::Denied);
        }
        let append = open.is_append();
        let node = self.pool.get(top(&state.chain)).clone();
        trace!("write fid={fid} kind={:?} offset={offset} len={}", node.kind, data.len());
        match node.kind {
            NodeKind::ColRules | NodeKind::TagRules => {
                let kind = rules_of(&node)?;
                Ok(buf::write_into(
                    self.backend.rule_text_mut(kind),
                    offset,
                    data,
                    append,
                    None,
                ))
            }
            NodeKind::Keys => Ok(buf::write_into(
                self.backend.keys_mut(),
                offset,
                data,
                append,
                None,
            )),
            NodeKind::ClientTags => {
                let id = client_of(&node)?;
                let (body, had_newline) = buf::strip_newline(data);
                let tags = self.backend.client_tags_mut(id).ok_or(Error::NotFound)?;
                let accepted = buf::write_into(tags, offset, body, append, Some(TAGS_MAX));
                Ok(accepted + u32::from(had_newline && accepted as usize == body.len()))
            }
            NodeKind::Bar => {
                let (side, id) = bar_of(&node)?;
                let text = self.backend.bar_buf_mut(side, id).ok_or(Error::NotFound)?;
                Ok(buf::write_into(text, offset, data, append, Some(BAR_BUF_MAX)))
            }
            NodeKind::ClientCtl => {
                let id = client_of(&node)?;
                let line = buf::command_text(data)?;
                self.backend.client_command(id, &line)?;
                Ok(data.len() as u32)
            }
            NodeKind::TagCtl => {
                let id = view_of(&node)?;
                let line = buf::command_text(data)?;
                self.backend.view_command(id, &line)?;
                Ok(data.len() as u32)
            }
            NodeKind::RootCtl => {
                let text = buf::command_text(data)?;
                // Every line runs even after a failure; only the first
                // error makes it back to the writer.
                let mut first_err = None;
                for line in text.split('\n').filter(|line| !line.is_empty()) {
                    if let Err(err) = self.backend.root_command(line) {
                        first_err.get_or_insert(err);
                    }
                }
                match first_err {
                    Some(err) => Err(err),
                    None => Ok(data.len() as u32),
                }
            }
            NodeKind::Event => {
                let text = String::from_utf8_lossy(data);
                self.events.publish(&text, &mut self.completions);
                Ok(data.len() as u32)
            }
            _ => Err(Error::Denied),
        }
    }

    /// Stat the node bound to `fid`.
    pub fn stat(&mut self, fid: u32) -> Result<Stat, Error> {
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let node = self.pool.get(top(&state.chain)).clone();
        Ok(self.stat_for(&node))
    }

    /// Remove the bar bound to `fid` and release the handle.
    pub fn remove(&mut self, fid: u32) -> Result<(), Error> {
        let state = self.fids.get(&fid).ok_or(Error::NotFound)?;
        let node = self.pool.get(top(&state.chain)).clone();
        if node.kind != NodeKind::Bar {
            return Err(Error::Denied);
        }
        let (side, id) = bar_of(&node)?;
        debug!("remove fid={fid} side={side:?} bar={}", node.name);
        self.backend.destroy_bar(side, id)?;
        if let Some(state) = self.fids.remove(&fid) {
            self.pool.release_chain(&state.chain);
        }
        Ok(())
    }

    /// Release `fid`, running the node kind's commit side effects.
    pub fn clunk(&mut self, fid: u32) -> Result<(), Error> {
        let state = self.fids.remove(&fid).ok_or(Error::NotFound)?;
        let node = self.pool.get(top(&state.chain)).clone();
        debug!("clunk fid={fid} kind={:?}", node.kind);
        match node.kind {
            NodeKind::ColRules => self.backend.commit_rules(RuleKind::Color),
            NodeKind::TagRules => self.backend.commit_rules(RuleKind::Tag),
            NodeKind::Keys => self.backend.commit_keys(),
            NodeKind::ClientTags => {
                if let Payload::Client(id) = node.payload {
                    self.backend.commit_client_tags(id);
                }
            }
            NodeKind::Bar => {
                if let Payload::Bar(side, id) = node.payload {
                    self.backend.commit_bar(side, id);
                }
            }
            NodeKind::Event => self.events.unsubscribe(fid, &mut self.completions),
            _ => {}
        }
        self.pool.release_chain(&state.chain);
        Ok(())
    }

    /// Cancel the outstanding read carrying `oldtag`. Flushing an unknown
    /// tag is not an error; the flush itself always succeeds.
    pub fn flush(&mut self, oldtag: u16) {
        self.events.cancel(oldtag, &mut self.completions);
    }

    /// Append a line to the event log, fanning it out to subscribers and
    /// resolving parked reads into the completion outbox.
    pub fn publish(&mut self, text: &str) {
        self.events.publish(text, &mut self.completions);
    }

    /// Drain replies for previously parked reads. The embedding transport
    /// calls this after every operation and after every [`Self::publish`].
    pub fn take_completions(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completions)
    }

    fn read_dir(&mut self, parent: &Node, offset: u64, count: u32) -> Vec<u8> {
        let children = lookup::resolve(&mut self.pool, &self.backend, parent, None);
        let mut packed = Vec::new();
        let mut cursor = 0u64;
        for &r in &children {
            let child = self.pool.get(r).clone();
            let stat = self.stat_for(&child);
            let size = stat.wire_size();
            if cursor >= offset {
                if packed.len() + size > count as usize {
                    break;
                }
                stat.encode_into(&mut packed);
            }
            cursor += size as u64;
        }
        self.pool.release_chain(&children);
        packed
    }

    fn stat_for(&self, node: &Node) -> Stat {
        let now = unix_now();
        Stat {
            qid: node.qid(),
            mode: node.perm.bits(),
            atime: now,
            mtime: now,
            length: self.file_len(node),
            name: node.name.clone(),
            uid: self.user.clone(),
            gid: self.user.clone(),
            muid: self.user.clone(),
        }
    }

    /// Stat length is only reported for content that lives in a buffer;
    /// synthesized files and directories stat as empty.
    fn file_len(&self, node: &Node) -> u64 {
        match node.kind {
            NodeKind::ColRules | NodeKind::TagRules => match node.payload {
                Payload::Rules(kind) => self.backend.rule_text(kind).len() as u64,
                _ => 0,
            },
            NodeKind::Keys => self.backend.keys().len() as u64,
            NodeKind::ClientTags => match node.payload {
                Payload::Client(id) => {
                    self.backend.client_tags(id).map_or(0, |tags| tags.len() as u64)
                }
                _ => 0,
            },
            NodeKind::Props => match node.payload {
                Payload::Client(id) => {
                    self.backend.client_props(id).map_or(0, |props| props.len() as u64)
                }
                _ => 0,
            },
            _ => 0,
        }
    }
}

fn top(chain: &[NodeRef]) -> NodeRef {
    match chain.last() {
        Some(&r) => r,
        None => unreachable!("handle chain is never empty"),
    }
}

fn client_of(node: &Node) -> Result<ClientId, Error> {
    match node.payload {
        Payload::Client(id) => Ok(id),
        _ => Err(Error::NotFound),
    }
}

fn view_of(node: &Node) -> Result<ViewId, Error> {
    match node.payload {
        Payload::View(id) => Ok(id),
        _ => Err(Error::NotFound),
    }
}

fn bar_of(node: &Node) -> Result<(BarSide, BarId), Error> {
    match node.payload {
        Payload::Bar(side, id) => Ok((side, id)),
        _ => Err(Error::NotFound),
    }
}

fn rules_of(node: &Node) -> Result<RuleKind, Error> {
    match node.payload {
        Payload::Rules(kind) => Ok(kind),
        _ => Err(Error::NotFound),
    }
}

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
