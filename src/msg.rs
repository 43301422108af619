// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Interpret the control lines written to the ctl files.
// Author: Lukas Bower

//! Control-command interpreters.
//!
//! One function per control file. Lines arrive already normalized (UTF-8,
//! trailing newline stripped); the verb runs to the first space and a bare
//! verb is the verb with an empty argument.

use log::{debug, info};

use rift_9p::{ClientId, Error, ViewId};

use crate::color::ColorSpec;
use crate::wm::Wm;

/// Dispatch one line written to `/ctl`.
pub fn root_command(wm: &mut Wm, line: &str) -> Result<(), Error> {
    let (verb, arg) = split_verb(line);
    match verb {
        "quit" => {
            info!("quit requested via /ctl");
            wm.running = false;
            Ok(())
        }
        "view" => {
            wm.select_view_name(arg);
            Ok(())
        }
        "selcolors" => {
            wm.settings.selcolors = ColorSpec::parse(arg)?;
            Ok(())
        }
        "normcolors" => {
            wm.settings.normcolors = ColorSpec::parse(arg)?;
            Ok(())
        }
        "b1colors" | "b2colors" | "b3colors" => {
            let slot = match verb.as_bytes()[1] {
                b'1' => 0,
                b'2' => 1,
                _ => 2,
            };
            wm.settings.bcolors[slot] = ColorSpec::parse(arg)?;
            Ok(())
        }
        "font" => {
            wm.settings.font = arg.to_owned();
            info!("loadfont {arg}");
            Ok(())
        }
        "border" => {
            // A bare `border` resets the width to zero.
            wm.settings.border = if arg.is_empty() {
                0
            } else {
                arg.parse().map_err(|_| Error::BadValue)?
            };
            Ok(())
        }
        "grabmod" => {
            if !matches!(arg, "Mod1" | "Mod2" | "Mod3" | "Mod4" | "Mod5") {
                return Err(Error::BadValue);
            }
            wm.settings.grabmod = arg.to_owned();
            debug!("restacking views for grabmod {arg}");
            Ok(())
        }
        _ => Err(Error::BadCommand),
    }
}

/// Dispatch one line written to a client's `ctl`.
pub fn client_command(wm: &mut Wm, id: ClientId, line: &str) -> Result<(), Error> {
    match line {
        "kill" => {
            info!("kill client {}", id.into_raw());
            wm.unmanage(id);
            Ok(())
        }
        _ => Err(Error::BadCommand),
    }
}

/// Dispatch one line written to a view's `ctl`.
pub fn view_command(wm: &mut Wm, id: ViewId, line: &str) -> Result<(), Error> {
    let (verb, arg) = split_verb(line);
    match verb {
        "select" => {
            let view = wm
                .views
                .iter_mut()
                .find(|view| view.id() == id)
                .ok_or(Error::NotFound)?;
            view.select(arg)
        }
        _ => Err(Error::BadCommand),
    }
}

fn split_verb(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((verb, arg)) => (verb, arg),
        None => (line, ""),
    }
}
