// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Declare the window-manager collaborator surface consumed by the namespace.
// Author: Lukas Bower

//! The seam between the namespace engine and the window manager proper.
//!
//! The engine never owns window-manager state. It addresses clients, views
//! and bars by the typed ids below and reaches them through [`Backend`];
//! everything behind the trait (geometry, drawing, key grabs) is someone
//! else's problem.

use crate::Error;

/// Identifier of a managed client window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u32);

impl ClientId {
    /// Wrap a raw id.
    #[must_use]
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Unwrap to the raw id.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0
    }
}

/// Identifier of a view (a tag's arrangement of clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u32);

impl ViewId {
    /// Wrap a raw id.
    #[must_use]
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Unwrap to the raw id.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0
    }
}

/// Identifier of one bar within a bar group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarId(u32);

impl BarId {
    /// Wrap a raw id.
    #[must_use]
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Unwrap to the raw id.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0
    }
}

/// Which edge of the screen a bar group occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarSide {
    /// The `/lbar` group.
    Left,
    /// The `/rbar` group.
    Right,
}

impl BarSide {
    /// The directory name of this group.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            BarSide::Left => "lbar",
            BarSide::Right => "rbar",
        }
    }
}

/// Which ruleset a rule file is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `/colrules`: tag-name to column-layout rules.
    Color,
    /// `/tagrules`: client-property to tag rules.
    Tag,
}

/// Live window-manager collections and mutators consumed by the namespace.
///
/// Accessors return `None` when the referent has been destroyed since the
/// node naming it was materialized; the dispatcher maps that to a not-found
/// protocol error. Mutating commands take one already-normalized text line
/// and answer with the namespace's own error vocabulary.
pub trait Backend {
    /// Ids of all managed clients, in list order.
    fn clients(&self) -> Vec<ClientId>;
    /// The currently selected client, if any.
    fn selected_client(&self) -> Option<ClientId>;
    /// Positional index of a client within the list.
    fn client_index(&self, id: ClientId) -> Option<u32>;
    /// A client's tag-membership buffer.
    fn client_tags(&self, id: ClientId) -> Option<&[u8]>;
    /// Mutable access to a client's tag-membership buffer.
    fn client_tags_mut(&mut self, id: ClientId) -> Option<&mut Vec<u8>>;
    /// A client's property string.
    fn client_props(&self, id: ClientId) -> Option<&[u8]>;
    /// Dispatch one control line to a client.
    fn client_command(&mut self, id: ClientId, line: &str) -> Result<(), Error>;
    /// Commit a rewritten tag buffer: reapply membership and redraw.
    fn commit_client_tags(&mut self, id: ClientId);

    /// Ids of all views, in list order.
    fn views(&self) -> Vec<ViewId>;
    /// The currently selected view, if any.
    fn selected_view(&self) -> Option<ViewId>;
    /// A view's name.
    fn view_name(&self, id: ViewId) -> Option<&str>;
    /// A view's serialized client ordering.
    fn view_index(&self, id: ViewId) -> Option<String>;
    /// Dispatch one control line to a view.
    fn view_command(&mut self, id: ViewId, line: &str) -> Result<(), Error>;

    /// Ids of the bars in one group, in list order.
    fn bars(&self, side: BarSide) -> Vec<BarId>;
    /// A bar's name.
    fn bar_name(&self, side: BarSide, id: BarId) -> Option<&str>;
    /// A bar's raw text buffer.
    fn bar_buf(&self, side: BarSide, id: BarId) -> Option<&[u8]>;
    /// Mutable access to a bar's raw text buffer.
    fn bar_buf_mut(&mut self, side: BarSide, id: BarId) -> Option<&mut Vec<u8>>;
    /// Create a bar in the group. The name is known to be non-empty.
    fn create_bar(&mut self, side: BarSide, name: &str) -> Result<BarId, Error>;
    /// Destroy a bar and redraw the group.
    fn destroy_bar(&mut self, side: BarSide, id: BarId) -> Result<(), Error>;
    /// Commit a rewritten bar buffer: parse colors, trim, redraw.
    fn commit_bar(&mut self, side: BarSide, id: BarId);

    /// A ruleset's raw pattern text.
    fn rule_text(&self, kind: RuleKind) -> &[u8];
    /// Mutable access to a ruleset's raw pattern text.
    fn rule_text_mut(&mut self, kind: RuleKind) -> &mut Vec<u8>;
    /// Recompile a ruleset from its text; the tag ruleset also reapplies
    /// itself to every live client and recomputes view membership.
    fn commit_rules(&mut self, kind: RuleKind);

    /// The key-binding blob.
    fn keys(&self) -> &[u8];
    /// Mutable access to the key-binding blob.
    fn keys_mut(&mut self) -> &mut Vec<u8>;
    /// Re-install key grabs from the blob.
    fn commit_keys(&mut self);

    /// Dispatch one root control line.
    fn root_command(&mut self, line: &str) -> Result<(), Error>;
    /// Synthesize the root control snapshot.
    fn root_ctl_text(&self) -> String;
}
