// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the protocol-visible identity and mode types for the rift namespace.
// Author: Lukas Bower

//! Qids, permission words and open modes shared across the namespace engine.

use bitflags::bitflags;

use crate::Error;

/// Node kind discriminant. Together with a numeric id it forms the identity
/// tuple reported to clients; the directory kinds select which template
/// table governs lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    /// The filesystem root.
    Root = 1,
    /// A single client directory (`/client/N`, `/client/sel`).
    ClientDir,
    /// The `/client` directory.
    ClientsDir,
    /// A bar group directory (`/lbar`, `/rbar`).
    BarsDir,
    /// A single view directory (`/tag/NAME`, `/tag/sel`).
    TagDir,
    /// The `/tag` directory.
    TagsDir,
    /// One bar file under a bar group.
    Bar,
    /// `/client/N/ctl`.
    ClientCtl,
    /// `/colrules`.
    ColRules,
    /// `/client/N/tags`.
    ClientTags,
    /// `/event`.
    Event,
    /// `/keys`.
    Keys,
    /// `/ctl`.
    RootCtl,
    /// `/tagrules`.
    TagRules,
    /// `/tag/NAME/ctl`.
    TagCtl,
    /// `/tag/NAME/index`.
    TagIndex,
    /// `/client/N/props`.
    Props,
}

impl NodeKind {
    /// Whether nodes of this kind are directories.
    #[must_use]
    pub fn is_dir(self) -> bool {
        matches!(
            self,
            NodeKind::Root
                | NodeKind::ClientDir
                | NodeKind::ClientsDir
                | NodeKind::BarsDir
                | NodeKind::TagDir
                | NodeKind::TagsDir
        )
    }

    /// Qid type byte for nodes of this kind.
    #[must_use]
    pub fn qid_type(self) -> QidType {
        if self.is_dir() {
            QidType::DIRECTORY
        } else if matches!(
            self,
            NodeKind::RootCtl | NodeKind::ClientCtl | NodeKind::TagCtl
        ) {
            QidType::APPEND_ONLY
        } else {
            QidType::FILE
        }
    }
}

/// Qid type bits per the 9P2000 specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QidType(u8);

impl QidType {
    /// Directory bit.
    pub const DIRECTORY: Self = Self(0x80);
    /// Append-only bit.
    pub const APPEND_ONLY: Self = Self(0x40);
    /// Regular file.
    pub const FILE: Self = Self(0x00);

    /// Raw byte representation.
    #[must_use]
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Check whether the type marks a directory.
    #[must_use]
    pub fn is_directory(self) -> bool {
        self.0 & Self::DIRECTORY.0 != 0
    }
}

/// Server-assigned identity reported for every namespace entry.
///
/// The path field packs the identity tuple: the node kind in the high
/// 32 bits and the numeric id in the low 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qid {
    ty: QidType,
    version: u32,
    path: u64,
}

impl Qid {
    /// Construct a Qid from its parts.
    #[must_use]
    pub fn new(ty: QidType, version: u32, path: u64) -> Self {
        Self { ty, version, path }
    }

    /// Construct the Qid for an identity tuple.
    #[must_use]
    pub fn from_ident(kind: NodeKind, id: u32) -> Self {
        Self::new(kind.qid_type(), 0, ident_path(kind, id))
    }

    /// Return the Qid type byte.
    #[must_use]
    pub fn ty(&self) -> QidType {
        self.ty
    }

    /// Return the Qid version field.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Return the packed identity path.
    #[must_use]
    pub fn path(&self) -> u64 {
        self.path
    }
}

/// Pack an identity tuple into a qid path.
#[must_use]
pub fn ident_path(kind: NodeKind, id: u32) -> u64 {
    (u64::from(kind as u8) << 32) | u64::from(id)
}

bitflags! {
    /// Permission word attached to every template row and node.
    ///
    /// The low nine bits carry the usual octal permission triplet; the two
    /// high bits mirror the protocol's directory and append-only mode bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Perm: u32 {
        /// Owner may read.
        const OWNER_READ = 0o400;
        /// Owner may write.
        const OWNER_WRITE = 0o200;
        /// Owner may traverse.
        const OWNER_EXEC = 0o100;
        /// Group may read.
        const GROUP_READ = 0o040;
        /// Group may traverse.
        const GROUP_EXEC = 0o010;
        /// Others may read.
        const OTHER_READ = 0o004;
        /// Others may traverse.
        const OTHER_EXEC = 0o001;
        /// Append-only file.
        const APPEND = 0x4000_0000;
        /// Directory.
        const DIR = 0x8000_0000;
    }
}

impl Perm {
    /// Build a directory permission word from octal bits.
    #[must_use]
    pub const fn dir(bits: u32) -> Self {
        Self::from_bits_retain(bits | Self::DIR.bits())
    }

    /// Build an append-only file permission word from octal bits.
    #[must_use]
    pub const fn append(bits: u32) -> Self {
        Self::from_bits_retain(bits | Self::APPEND.bits())
    }

    /// Build a plain file permission word from octal bits.
    #[must_use]
    pub const fn file(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Whether the owner-read bit is set.
    #[must_use]
    pub fn readable(self) -> bool {
        self.contains(Self::OWNER_READ)
    }

    /// Whether the owner-write bit is set.
    #[must_use]
    pub fn writable(self) -> bool {
        self.contains(Self::OWNER_WRITE)
    }

    /// Whether the directory bit is set.
    #[must_use]
    pub fn is_dir(self) -> bool {
        self.contains(Self::DIR)
    }
}

/// Base access requested by an open call, from the low two mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpenBase {
    /// Open for reading.
    Read = 0,
    /// Open for writing.
    Write = 1,
    /// Open for reading and writing.
    ReadWrite = 2,
    /// Execute; always denied by this namespace.
    Exec = 3,
}

/// Structured open mode: one base access plus optional append/truncate flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    base: OpenBase,
    truncate: bool,
    append: bool,
}

impl OpenMode {
    /// Read-only mode.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            base: OpenBase::Read,
            truncate: false,
            append: false,
        }
    }

    /// Write-only mode.
    #[must_use]
    pub fn write_only() -> Self {
        Self {
            base: OpenBase::Write,
            truncate: false,
            append: false,
        }
    }

    /// Read-write mode.
    #[must_use]
    pub fn read_write() -> Self {
        Self {
            base: OpenBase::ReadWrite,
            truncate: false,
            append: false,
        }
    }

    /// Write-only mode with append semantics.
    #[must_use]
    pub fn write_append() -> Self {
        Self {
            base: OpenBase::Write,
            truncate: false,
            append: true,
        }
    }

    /// Decode a raw open-mode byte. Bits outside the base mode and the
    /// append/truncate flags are refused outright.
    pub fn from_bits(value: u8) -> Result<Self, Error> {
        if value & !(0x03 | 0x10 | 0x80) != 0 {
            return Err(Error::Denied);
        }
        let base = match value & 0x03 {
            0 => OpenBase::Read,
            1 => OpenBase::Write,
            2 => OpenBase::ReadWrite,
            _ => OpenBase::Exec,
        };
        Ok(Self {
            base,
            truncate: value & 0x10 != 0,
            append: value & 0x80 != 0,
        })
    }

    /// The base access of this mode.
    #[must_use]
    pub fn base(self) -> OpenBase {
        self.base
    }

    /// Whether reads are permitted under this mode.
    #[must_use]
    pub fn allows_read(self) -> bool {
        matches!(self.base, OpenBase::Read | OpenBase::ReadWrite)
    }

    /// Whether writes are permitted under this mode.
    #[must_use]
    pub fn allows_write(self) -> bool {
        matches!(self.base, OpenBase::Write | OpenBase::ReadWrite)
    }

    /// Whether append semantics were requested.
    #[must_use]
    pub fn is_append(self) -> bool {
        self.append
    }

    /// Whether truncate-on-open was requested. The flag is accepted but
    /// has no effect on any file in this namespace.
    #[must_use]
    pub fn is_truncate(self) -> bool {
        self.truncate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_path_packs_kind_and_id() {
        let path = ident_path(NodeKind::Bar, 7);
        assert_eq!(path >> 32, NodeKind::Bar as u64);
        assert_eq!(path & 0xFFFF_FFFF, 7);
    }

    #[test]
    fn ctl_kinds_are_append_only() {
        assert!(!NodeKind::RootCtl.is_dir());
        assert_eq!(NodeKind::RootCtl.qid_type().raw(), 0x40);
        assert!(NodeKind::Root.qid_type().is_directory());
    }

    #[test]
    fn open_mode_rejects_unknown_bits() {
        assert_eq!(OpenMode::from_bits(0x04), Err(Error::Denied));
        let mode = OpenMode::from_bits(0x80 | 1).expect("append write");
        assert!(mode.is_append());
        assert!(mode.allows_write());
        assert!(!mode.allows_read());
    }

    #[test]
    fn perm_ctors_set_high_bits() {
        assert!(Perm::dir(0o500).is_dir());
        assert!(Perm::dir(0o500).readable());
        assert!(!Perm::dir(0o500).writable());
        assert!(Perm::append(0o600).contains(Perm::APPEND));
        assert!(!Perm::file(0o600).is_dir());
    }
}
