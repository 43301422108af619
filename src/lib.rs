// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: rift window-manager model and filesystem backend.
// Author: Lukas Bower

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! rift, a tag-based window manager controlled through a file tree.
//!
//! This crate is the manager's model half: clients, views, bars, rulesets,
//! key bindings and settings, plus the control-command interpreters. The
//! companion `rift-9p` crate mounts all of it as a synthetic filesystem;
//! [`Wm`] implements its [`rift_9p::Backend`] trait, so the usual stack is
//!
//! ```
//! use rift::Wm;
//! use rift_9p::Namespace;
//!
//! let mut fs = Namespace::new(Wm::new());
//! let root = fs.attach(0).expect("attach");
//! assert!(root.ty().is_directory());
//! ```
//!
//! The X11 side (event handling, drawing, tiling geometry, key grabs) is
//! absent; where a real session would draw or grab, the model records and
//! logs.

pub mod bar;
pub mod client;
pub mod color;
pub mod config;
pub mod keys;
pub mod msg;
pub mod rules;
pub mod view;
pub mod wm;

pub use bar::{Bar, BarGroup};
pub use client::Client;
pub use color::ColorSpec;
pub use config::{Config, ConfigError};
pub use keys::Keys;
pub use rules::{Rule, Ruleset};
pub use view::View;
pub use wm::{Settings, Wm};
