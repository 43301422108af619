// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Aggregate window-manager state and its namespace backend implementation.
// Author: Lukas Bower

//! The window-manager model.
//!
//! [`Wm`] owns everything the filesystem can see: the client list, the
//! views, the two bar groups, both rulesets, the key bindings and the
//! mutable settings. It implements [`Backend`] so a
//! [`rift_9p::Namespace`] can be stacked directly on top of it.
//!
//! State transitions that a real session would broadcast are pushed onto an
//! internal event queue; the embedder drains it with [`Wm::take_events`]
//! and feeds each line to [`rift_9p::Namespace::publish`].

use log::{debug, info};

use rift_9p::{Backend, BarId, BarSide, ClientId, Error, RuleKind, ViewId};

use crate::bar::{Bar, BarGroup};
use crate::client::Client;
use crate::color::ColorSpec;
use crate::config::{Config, ConfigError};
use crate::keys::Keys;
use crate::msg;
use crate::rules::Ruleset;
use crate::view::View;

/// Mutable appearance and behavior settings, seeded from [`Config`] and
/// rewritten through the root control file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Font specification.
    pub font: String,
    /// Border width in pixels.
    pub border: u32,
    /// Mouse-operation modifier, `Mod1` through `Mod5`.
    pub grabmod: String,
    /// Selected-frame colors.
    pub selcolors: ColorSpec,
    /// Unselected-frame colors.
    pub normcolors: ColorSpec,
    /// Border-state colors.
    pub bcolors: [ColorSpec; 3],
}

/// The window manager, reduced to the state the filesystem observes.
pub struct Wm {
    pub(crate) clients: Vec<Client>,
    pub(crate) sel_client: Option<ClientId>,
    pub(crate) views: Vec<View>,
    pub(crate) sel_view: Option<ViewId>,
    pub(crate) lbar: BarGroup,
    pub(crate) rbar: BarGroup,
    pub(crate) colrules: Ruleset,
    pub(crate) tagrules: Ruleset,
    pub(crate) keys: Keys,
    pub(crate) settings: Settings,
    pub(crate) running: bool,
    next_client: u32,
    next_view: u32,
    next_bar: u32,
    redraws: u64,
    events: Vec<String>,
}

impl Wm {
    /// Construct with default configuration.
    #[must_use]
    pub fn new() -> Self {
        match Self::from_config(Config::default()) {
            Ok(wm) => wm,
            // The built-in defaults always parse.
            Err(_) => unreachable!("default configuration is valid"),
        }
    }

    /// Construct from a configuration, validating its color specs.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let parse = |text: &String| {
            ColorSpec::parse(text).map_err(|_| ConfigError::Color(text.clone()))
        };
        let settings = Settings {
            font: config.font,
            border: config.border,
            grabmod: config.grabmod,
            selcolors: parse(&config.selcolors)?,
            normcolors: parse(&config.normcolors)?,
            bcolors: [
                parse(&config.bcolors[0])?,
                parse(&config.bcolors[1])?,
                parse(&config.bcolors[2])?,
            ],
        };
        Ok(Self {
            clients: Vec::new(),
            sel_client: None,
            views: Vec::new(),
            sel_view: None,
            lbar: BarGroup::default(),
            rbar: BarGroup::default(),
            colrules: Ruleset::from_text(&config.colrules),
            tagrules: Ruleset::from_text(&config.tagrules),
            keys: Keys::from_blob(&config.keys),
            settings,
            running: true,
            next_client: 1,
            next_view: 1,
            next_bar: 1,
            redraws: 0,
            events: Vec::new(),
        })
    }

    /// Whether a `quit` control line has been processed.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running
    }

    /// Number of redraw requests so far.
    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// The current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Drain queued event lines for publication.
    pub fn take_events(&mut self) -> Vec<String> {
        std::mem::take(&mut self.events)
    }

    /// Borrow a client by id.
    #[must_use]
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id() == id)
    }

    /// Borrow a view by id.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|view| view.id() == id)
    }

    /// Look a view up by name.
    #[must_use]
    pub fn view_by_name(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|view| view.name() == name)
    }

    /// The column-layout ruleset.
    #[must_use]
    pub fn col_ruleset(&self) -> &Ruleset {
        &self.colrules
    }

    /// The tagging ruleset.
    #[must_use]
    pub fn tag_ruleset(&self) -> &Ruleset {
        &self.tagrules
    }

    /// The key bindings.
    #[must_use]
    pub fn keybindings(&self) -> &Keys {
        &self.keys
    }

    /// Borrow one side's bar group.
    #[must_use]
    pub fn bar_group(&self, side: BarSide) -> &BarGroup {
        match side {
            BarSide::Left => &self.lbar,
            BarSide::Right => &self.rbar,
        }
    }

    pub(crate) fn bar_group_mut(&mut self, side: BarSide) -> &mut BarGroup {
        match side {
            BarSide::Left => &mut self.lbar,
            BarSide::Right => &mut self.rbar,
        }
    }

    /// Start managing a client. Its initial tags come from the tag rules,
    /// falling back to the selected view, then to `"1"`.
    pub fn manage(&mut self, name: &str, props: &str) -> ClientId {
        let id = ClientId::from_raw(self.next_client);
        self.next_client += 1;
        let tags = self
            .tagrules
            .first_match(props)
            .map(str::to_owned)
            .or_else(|| {
                self.sel_view
                    .and_then(|v| self.view(v))
                    .map(|view| view.name().to_owned())
            })
            .unwrap_or_else(|| "1".to_owned());
        let mut client = Client::new(id, name, props);
        client.tags_mut().extend_from_slice(tags.as_bytes());
        self.clients.push(client);
        self.sel_client = Some(id);
        self.apply_tags(id);
        info!("manage client {} ({name})", id.into_raw());
        id
    }

    /// Stop managing a client, detaching it everywhere.
    pub fn unmanage(&mut self, id: ClientId) {
        self.clients.retain(|client| client.id() != id);
        for view in &mut self.views {
            view.remove(id);
        }
        if self.sel_client == Some(id) {
            self.sel_client = self.clients.first().map(Client::id);
        }
        self.prune_views();
        info!("unmanage client {}", id.into_raw());
    }

    /// Switch the selected view by name. The name is not validated: an
    /// unknown one brings its view into existence, matching tag-on-demand
    /// semantics.
    pub fn select_view_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let prev = self.sel_view;
        let id = self.ensure_view(name);
        if prev == Some(id) {
            return;
        }
        self.sel_view = Some(id);
        if let Some(old) = prev.and_then(|p| self.view(p)).map(|v| v.name().to_owned()) {
            self.events.push(format!("UnfocusTag {old}"));
        }
        self.events.push(format!("FocusTag {name}"));
        self.prune_views();
    }

    /// Re-derive a client's view membership from its tag buffer. An empty
    /// buffer is rewritten to the fallback tag `"1"`; the buffer is
    /// canonicalized to the deduplicated `+`-join either way.
    pub fn apply_tags(&mut self, id: ClientId) {
        let Some(client) = self.clients.iter_mut().find(|c| c.id() == id) else {
            return;
        };
        let mut names = client.tag_names();
        if names.is_empty() {
            names.push("1".to_owned());
        }
        client.set_tag_names(&names);
        for name in &names {
            let vid = self.ensure_view(name);
            if let Some(view) = self.views.iter_mut().find(|v| v.id() == vid) {
                view.insert(id);
            }
        }
        for view in &mut self.views {
            if !names.iter().any(|name| name == view.name()) {
                view.remove(id);
            }
        }
        self.prune_views();
    }

    /// Rewrite a client's tags from the tag rules, then reapply them.
    pub fn apply_rules(&mut self, id: ClientId) {
        let props = self
            .client(id)
            .map(|client| String::from_utf8_lossy(client.props()).into_owned());
        let Some(props) = props else {
            return;
        };
        if let Some(value) = self.tagrules.first_match(&props).map(str::to_owned) {
            if let Some(client) = self.clients.iter_mut().find(|c| c.id() == id) {
                client.tags_mut().clear();
                client.tags_mut().extend_from_slice(value.as_bytes());
            }
        }
        self.apply_tags(id);
    }

    pub(crate) fn request_redraw(&mut self) {
        self.redraws += 1;
        debug!("redraw requested");
    }

    fn ensure_view(&mut self, name: &str) -> ViewId {
        if let Some(view) = self.views.iter().find(|v| v.name() == name) {
            return view.id();
        }
        let id = ViewId::from_raw(self.next_view);
        self.next_view += 1;
        self.views.push(View::new(id, name));
        self.events.push(format!("CreateTag {name}"));
        // The first view to exist becomes the selection.
        if self.sel_view.is_none() {
            self.sel_view = Some(id);
        }
        id
    }

    fn prune_views(&mut self) {
        let sel = self.sel_view;
        let mut dropped = Vec::new();
        self.views.retain(|view| {
            if view.is_empty() && Some(view.id()) != sel {
                dropped.push(view.name().to_owned());
                false
            } else {
                true
            }
        });
        for name in dropped {
            self.events.push(format!("DestroyTag {name}"));
        }
    }
}

impl Default for Wm {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Wm {
    fn clients(&self) -> Vec<ClientId> {
        self.clients.iter().map(Client::id).collect()
    }

    fn selected_client(&self) -> Option<ClientId> {
        self.sel_client
    }

    fn client_index(&self, id: ClientId) -> Option<u32> {
        self.clients
            .iter()
            .position(|client| client.id() == id)
            .map(|i| i as u32)
    }

    fn client_tags(&self, id: ClientId) -> Option<&[u8]> {
        self.client(id).map(Client::tags)
    }

    fn client_tags_mut(&mut self, id: ClientId) -> Option<&mut Vec<u8>> {
        self.clients
            .iter_mut()
            .find(|client| client.id() == id)
            .map(Client::tags_mut)
    }

    fn client_props(&self, id: ClientId) -> Option<&[u8]> {
        self.client(id).map(Client::props)
    }

    fn client_command(&mut self, id: ClientId, line: &str) -> Result<(), Error> {
        msg::client_command(self, id, line)
    }

    fn commit_client_tags(&mut self, id: ClientId) {
        self.apply_tags(id);
        self.request_redraw();
    }

    fn views(&self) -> Vec<ViewId> {
        self.views.iter().map(View::id).collect()
    }

    fn selected_view(&self) -> Option<ViewId> {
        self.sel_view
    }

    fn view_name(&self, id: ViewId) -> Option<&str> {
        self.view(id).map(View::name)
    }

    fn view_index(&self, id: ViewId) -> Option<String> {
        self.view(id).map(View::index_text)
    }

    fn view_command(&mut self, id: ViewId, line: &str) -> Result<(), Error> {
        msg::view_command(self, id, line)
    }

    fn bars(&self, side: BarSide) -> Vec<BarId> {
        self.bar_group(side).ids()
    }

    fn bar_name(&self, side: BarSide, id: BarId) -> Option<&str> {
        self.bar_group(side).get(id).map(Bar::name)
    }

    fn bar_buf(&self, side: BarSide, id: BarId) -> Option<&[u8]> {
        self.bar_group(side).get(id).map(Bar::buf)
    }

    fn bar_buf_mut(&mut self, side: BarSide, id: BarId) -> Option<&mut Vec<u8>> {
        self.bar_group_mut(side).get_mut(id).map(Bar::buf_mut)
    }

    fn create_bar(&mut self, side: BarSide, name: &str) -> Result<BarId, Error> {
        if let Some(existing) = self.bar_group(side).by_name(name) {
            return Ok(existing.id());
        }
        let id = BarId::from_raw(self.next_bar);
        self.next_bar += 1;
        let colors = self.settings.normcolors.clone();
        self.bar_group_mut(side)
            .insert(Bar::new(id, name, colors));
        debug!("create bar {name} on {}", side.dir_name());
        Ok(id)
    }

    fn destroy_bar(&mut self, side: BarSide, id: BarId) -> Result<(), Error> {
        match self.bar_group_mut(side).remove(id) {
            Some(bar) => {
                debug!("destroy bar {} on {}", bar.name(), side.dir_name());
                self.request_redraw();
                Ok(())
            }
            None => Err(Error::NotFound),
        }
    }

    fn commit_bar(&mut self, side: BarSide, id: BarId) {
        if let Some(bar) = self.bar_group_mut(side).get_mut(id) {
            bar.commit();
        }
        self.request_redraw();
    }

    fn rule_text(&self, kind: RuleKind) -> &[u8] {
        match kind {
            RuleKind::Color => self.colrules.text(),
            RuleKind::Tag => self.tagrules.text(),
        }
    }

    fn rule_text_mut(&mut self, kind: RuleKind) -> &mut Vec<u8> {
        match kind {
            RuleKind::Color => self.colrules.text_mut(),
            RuleKind::Tag => self.tagrules.text_mut(),
        }
    }

    fn commit_rules(&mut self, kind: RuleKind) {
        match kind {
            RuleKind::Color => self.colrules.compile(),
            RuleKind::Tag => {
                self.tagrules.compile();
                let ids: Vec<ClientId> = self.clients.iter().map(Client::id).collect();
                for id in ids {
                    self.apply_rules(id);
                }
            }
        }
    }

    fn keys(&self) -> &[u8] {
        self.keys.blob()
    }

    fn keys_mut(&mut self) -> &mut Vec<u8> {
        self.keys.blob_mut()
    }

    fn commit_keys(&mut self) {
        self.keys.commit();
    }

    fn root_command(&mut self, line: &str) -> Result<(), Error> {
        msg::root_command(self, line)
    }

    fn root_ctl_text(&self) -> String {
        let mut out = String::new();
        if let Some(view) = self.sel_view.and_then(|id| self.view(id)) {
            out.push_str(&format!("view {}\n", view.name()));
        }
        out.push_str(&format!("selcolors {}\n", self.settings.selcolors.text()));
        out.push_str(&format!("normcolors {}\n", self.settings.normcolors.text()));
        out.push_str(&format!("font {}\n", self.settings.font));
        out.push_str(&format!("grabmod {}\n", self.settings.grabmod));
        out.push_str(&format!("border {}\n", self.settings.border));
        out
    }
}
