// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: View records with column ordering, selection and index serialization.
// Author: Lukas Bower

//! Views.
//!
//! A view is one tag's arrangement of clients in columns. Geometry stays
//! with the tiling layer; the filesystem only needs the ordering (for the
//! `index` file) and the selection (for the `select` control verb).

use rift_9p::{ClientId, Error, ViewId};

/// One view.
#[derive(Debug, Clone)]
pub struct View {
    id: ViewId,
    name: String,
    columns: Vec<Vec<ClientId>>,
    sel: Option<ClientId>,
}

impl View {
    /// Create an empty view.
    #[must_use]
    pub fn new(id: ViewId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
            sel: None,
        }
    }

    /// The view's id.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The view's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selected client within the view.
    #[must_use]
    pub fn selected(&self) -> Option<ClientId> {
        self.sel
    }

    /// All clients, column by column.
    #[must_use]
    pub fn clients(&self) -> Vec<ClientId> {
        self.columns.iter().flatten().copied().collect()
    }

    /// Whether the view holds `client`.
    #[must_use]
    pub fn contains(&self, client: ClientId) -> bool {
        self.columns.iter().flatten().any(|&c| c == client)
    }

    /// Whether the view holds no clients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    /// Attach a client to the last column, selecting it if nothing is.
    pub fn insert(&mut self, client: ClientId) {
        if self.contains(client) {
            return;
        }
        if self.columns.is_empty() {
            self.columns.push(Vec::new());
        }
        if let Some(last) = self.columns.last_mut() {
            last.push(client);
        }
        if self.sel.is_none() {
            self.sel = Some(client);
        }
    }

    /// Detach a client, collapsing emptied columns and moving the
    /// selection off it.
    pub fn remove(&mut self, client: ClientId) {
        for column in &mut self.columns {
            column.retain(|&c| c != client);
        }
        self.columns.retain(|column| !column.is_empty());
        if self.sel == Some(client) {
            self.sel = self.clients().first().copied();
        }
    }

    /// Serialized ordering: one `column client-id` line per frame, columns
    /// numbered from one.
    #[must_use]
    pub fn index_text(&self) -> String {
        let mut out = String::new();
        for (col, column) in self.columns.iter().enumerate() {
            for client in column {
                out.push_str(&format!("{} {}\n", col + 1, client.into_raw()));
            }
        }
        out
    }

    /// Handle a `select` argument: `next`, `prev`, or a position index
    /// into the view's client ordering.
    pub fn select(&mut self, arg: &str) -> Result<(), Error> {
        let clients = self.clients();
        if clients.is_empty() {
            return Err(Error::BadValue);
        }
        let current = self
            .sel
            .and_then(|sel| clients.iter().position(|&c| c == sel))
            .unwrap_or(0);
        let next = match arg {
            "next" => (current + 1) % clients.len(),
            "prev" => (current + clients.len() - 1) % clients.len(),
            _ => {
                let n: usize = arg.parse().map_err(|_| Error::BadValue)?;
                if n >= clients.len() {
                    return Err(Error::BadValue);
                }
                n
            }
        };
        self.sel = Some(clients[next]);
        Ok(())
    }
}
