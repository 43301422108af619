// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Event fan-out with per-subscriber buffers, parked reads and cancellation.
// Author: Lukas Bower

//! The event subsystem.
//!
//! `/event` is one process-wide text log fanned out to every handle holding
//! it open. Each subscriber owns a private pending buffer; a read drains the
//! buffer or, when it is empty, parks until the next publish or a flush.
//! Parked reads resolve in the reverse of their parking order, and a second
//! read parked on the same fid is re-parked once the first drains the
//! buffer. Late subscribers never see earlier text, and nothing bounds an
//! unread buffer.

use std::collections::HashMap;

use log::{debug, trace};

use crate::Error;

/// A deferred reply to a request that was parked on the event file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Tag of the original read request.
    pub tag: u16,
    /// Delivered event text, or [`Error::Interrupted`] after cancellation.
    pub result: Result<Vec<u8>, Error>,
}

#[derive(Debug, Clone, Copy)]
struct Parked {
    tag: u16,
    fid: u32,
}

/// Subscriber buffers plus the parked-read stack.
#[derive(Default)]
pub(crate) struct EventLog {
    buffers: HashMap<u32, Vec<u8>>,
    parked: Vec<Parked>,
}

impl EventLog {
    /// Register an open event handle. Registration starts an empty buffer;
    /// earlier publishes are not replayed.
    pub(crate) fn subscribe(&mut self, fid: u32) {
        self.buffers.entry(fid).or_default();
    }

    /// Drop a subscriber and its pending buffer, interrupting any read
    /// still parked on the fid.
    pub(crate) fn unsubscribe(&mut self, fid: u32, out: &mut Vec<Completion>) {
        self.buffers.remove(&fid);
        let before = self.parked.len();
        self.parked.retain(|p| {
            if p.fid == fid {
                out.push(Completion {
                    tag: p.tag,
                    result: Err(Error::Interrupted),
                });
                false
            } else {
                true
            }
        });
        if self.parked.len() != before {
            debug!("event: interrupted {} parked read(s) on clunked fid {fid}", before - self.parked.len());
        }
    }

    /// Deliver the fid's pending text, or park the request.
    pub(crate) fn read(&mut self, tag: u16, fid: u32) -> Option<Vec<u8>> {
        match self.buffers.get_mut(&fid) {
            Some(buf) if !buf.is_empty() => Some(std::mem::take(buf)),
            _ => {
                trace!("event: parking read tag={tag} fid={fid}");
                self.parked.push(Parked { tag, fid });
                None
            }
        }
    }

    /// Append a newline-terminated line to every subscriber buffer, then
    /// resolve parked reads, most recently parked first.
    pub(crate) fn publish(&mut self, text: &str, out: &mut Vec<Completion>) {
        if text.is_empty() {
            return;
        }
        let mut line = text.as_bytes().to_vec();
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }
        trace!("event: publish {} byte(s) to {} subscriber(s)", line.len(), self.buffers.len());
        for buf in self.buffers.values_mut() {
            buf.extend_from_slice(&line);
        }
        let mut parked = std::mem::take(&mut self.parked);
        while let Some(p) = parked.pop() {
            match self.buffers.get_mut(&p.fid) {
                Some(buf) if !buf.is_empty() => out.push(Completion {
                    tag: p.tag,
                    result: Ok(std::mem::take(buf)),
                }),
                // Drained by a later-parked read on the same fid, or the
                // fid was never subscribed; park again.
                _ => self.parked.push(p),
            }
        }
    }

    /// Cancel the parked read carrying `tag`, if any.
    pub(crate) fn cancel(&mut self, tag: u16, out: &mut Vec<Completion>) -> bool {
        let Some(pos) = self.parked.iter().position(|p| p.tag == tag) else {
            return false;
        };
        self.parked.remove(pos);
        debug!("event: flushed parked read tag={tag}");
        out.push(Completion {
            tag,
            result: Err(Error::Interrupted),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drained(log: &mut EventLog, text: &str) -> Vec<Completion> {
        let mut out = Vec::new();
        log.publish(text, &mut out);
        out
    }

    #[test]
    fn fanout_reaches_only_existing_subscribers() {
        let mut log = EventLog::default();
        log.subscribe(1);
        log.subscribe(2);
        let out = drained(&mut log, "hi");
        assert!(out.is_empty());
        log.subscribe(3);
        assert_eq!(log.read(10, 1), Some(b"hi\n".to_vec()));
        assert_eq!(log.read(11, 2), Some(b"hi\n".to_vec()));
        // fid 3 subscribed after the publish and sees nothing.
        assert_eq!(log.read(12, 3), None);
    }

    #[test]
    fn parked_reads_resolve_last_first() {
        let mut log = EventLog::default();
        log.subscribe(1);
        log.subscribe(2);
        assert_eq!(log.read(10, 1), None);
        assert_eq!(log.read(11, 2), None);
        let out = drained(&mut log, "X");
        let tags: Vec<u16> = out.iter().map(|c| c.tag).collect();
        assert_eq!(tags, vec![11, 10]);
        for c in out {
            assert_eq!(c.result, Ok(b"X\n".to_vec()));
        }
    }

    #[test]
    fn second_read_on_one_fid_is_reparked() {
        let mut log = EventLog::default();
        log.subscribe(1);
        assert_eq!(log.read(10, 1), None);
        assert_eq!(log.read(11, 1), None);
        let out = drained(&mut log, "a");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, 11);
        let out = drained(&mut log, "b");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, 10);
        assert_eq!(out[0].result, Ok(b"b\n".to_vec()));
    }

    #[test]
    fn cancel_removes_exactly_one_parked_read() {
        let mut log = EventLog::default();
        log.subscribe(1);
        assert_eq!(log.read(10, 1), None);
        let mut out = Vec::new();
        assert!(log.cancel(10, &mut out));
        assert_eq!(out[0].result, Err(Error::Interrupted));
        assert!(!log.cancel(10, &mut out));
        // A later publish buffers the text instead of resolving anything.
        let out = drained(&mut log, "late");
        assert!(out.is_empty());
        assert_eq!(log.read(12, 1), Some(b"late\n".to_vec()));
    }

    #[test]
    fn unsubscribe_interrupts_parked_reads() {
        let mut log = EventLog::default();
        log.subscribe(1);
        assert_eq!(log.read(10, 1), None);
        let mut out = Vec::new();
        log.unsubscribe(1, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, 10);
        assert_eq!(out[0].result, Err(Error::Interrupted));
    }
}
