// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Offset- and append-aware partial read/write primitives over byte buffers.
// Author: Lukas Bower

//! Buffer marshalling helpers.
//!
//! Every textual file in the namespace funnels its read and write bodies
//! through these primitives. Reads are clipped to the buffer; writes honor
//! append mode, grow unbounded buffers, clip against bounded ones, and
//! truncate the tail so a shorter rewrite replaces the previous content.

use crate::Error;

/// Read at most `count` bytes from `buf` starting at `offset`.
///
/// An offset at or past the end yields an empty result.
#[must_use]
pub fn read_slice(buf: &[u8], offset: u64, count: u32) -> Vec<u8> {
    let len = buf.len() as u64;
    if offset >= len {
        return Vec::new();
    }
    let start = offset as usize;
    let avail = buf.len() - start;
    let take = (count as usize).min(avail);
    buf[start..start + take].to_vec()
}

/// Write `data` into `buf` at `offset`, or at the current end when
/// `append` is set. `max` bounds the buffer's total length; `None` grows it
/// as needed. The buffer is truncated to end exactly where the write ends.
///
/// Returns the number of bytes accepted, which for a bounded buffer may be
/// less than `data.len()`. An offset past the current end accepts nothing.
pub fn write_into(
    buf: &mut Vec<u8>,
    offset: u64,
    data: &[u8],
    append: bool,
    max: Option<usize>,
) -> u32 {
    let offset = if append { buf.len() } else { offset as usize };
    if offset > buf.len() || data.is_empty() {
        return 0;
    }
    let mut count = data.len();
    if let Some(max) = max {
        let room = max.saturating_sub(offset);
        if count > room {
            count = room;
        }
    }
    buf.truncate(offset);
    buf.extend_from_slice(&data[..count]);
    count as u32
}

/// Normalize a command write body into text: the payload must be UTF-8 and
/// one trailing newline, if present, is dropped.
pub fn command_text(data: &[u8]) -> Result<String, Error> {
    let text = std::str::from_utf8(data).map_err(|_| Error::BadValue)?;
    Ok(text.strip_suffix('\n').unwrap_or(text).to_owned())
}

/// Strip one trailing newline from a write body, reporting whether it was
/// there. Bounded text files store their content without the terminator but
/// still acknowledge it to the writer.
#[must_use]
pub fn strip_newline(data: &[u8]) -> (&[u8], bool) {
    match data.split_last() {
        Some((&b'\n', rest)) => (rest, true),
        _ => (data, false),
    }
}
