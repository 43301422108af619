// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Validate ruleset round-trips and rule application through the filesystem.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use rift::Wm;
use rift_9p::{Namespace, OpenMode, ReadOutcome};

fn fixture() -> Namespace<Wm> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut fs = Namespace::new(Wm::new());
    fs.attach(0).expect("attach");
    fs
}

fn read_back(fs: &mut Namespace<Wm>, fid: u32, path: &[&str]) -> Vec<u8> {
    fs.walk(0, fid, path).expect("walk");
    fs.open(fid, OpenMode::read_only()).expect("open");
    let data = match fs.read(fid as u16, fid, 0, 65535).expect("read") {
        ReadOutcome::Done(data) => data,
        ReadOutcome::Parked => panic!("rules read parked"),
    };
    fs.clunk(fid).expect("clunk");
    data
}

#[test]
fn ruleset_round_trips_and_counts_clauses() {
    let mut fs = fixture();
    let text: &[u8] = b"/Firefox.*/ -> web\nthis line is noise\n/XTerm.*/ -> term\n";
    fs.walk(0, 1, &["tagrules"]).expect("walk");
    fs.open(1, OpenMode::write_only()).expect("open");
    assert_eq!(fs.write(1, 0, text).expect("write"), text.len() as u32);
    fs.clunk(1).expect("clunk");
    // Two well-formed clauses compiled; the noise line was skipped.
    assert_eq!(fs.backend().tag_ruleset().len(), 2);
    assert_eq!(read_back(&mut fs, 2, &["tagrules"]), text);
}

#[test]
fn colrules_compile_independently() {
    let mut fs = fixture();
    let text: &[u8] = b"/main/ -> 60+40\n";
    fs.walk(0, 1, &["colrules"]).expect("walk");
    fs.open(1, OpenMode::write_only()).expect("open");
    fs.write(1, 0, text).expect("write");
    fs.clunk(1).expect("clunk");
    assert_eq!(fs.backend().col_ruleset().len(), 1);
    assert_eq!(fs.backend().tag_ruleset().len(), 0);
}

#[test]
fn tagrule_commit_reapplies_to_live_clients() {
    let mut fs = fixture();
    let id = fs.backend_mut().manage("firefox", "Firefox:Navigator:browse");
    assert_eq!(fs.backend().client(id).expect("client").tags(), b"1");
    fs.walk(0, 1, &["tagrules"]).expect("walk");
    fs.open(1, OpenMode::write_only()).expect("open");
    fs.write(1, 0, b"/Firefox.*/ -> web\n").expect("write");
    fs.clunk(1).expect("clunk");
    let wm = fs.backend();
    assert_eq!(wm.client(id).expect("client").tags(), b"web");
    let web = wm.view_by_name("web").expect("web view");
    assert!(web.contains(id));
}

#[test]
fn client_tag_writes_commit_on_clunk() {
    let mut fs = fixture();
    let id = fs.backend_mut().manage("xterm", "XTerm:xterm:term");
    fs.walk(0, 1, &["client", "0", "tags"]).expect("walk tags");
    fs.open(1, OpenMode::read_write()).expect("open tags");
    fs.write(1, 0, b"dev+scratch\n").expect("write");
    fs.clunk(1).expect("clunk");
    let wm = fs.backend();
    assert_eq!(wm.client(id).expect("client").tags(), b"dev+scratch");
    assert!(wm.view_by_name("dev").expect("dev").contains(id));
    assert!(wm.view_by_name("scratch").expect("scratch").contains(id));
}

#[test]
fn rewriting_rules_shorter_truncates_the_file() {
    let mut fs = fixture();
    fs.walk(0, 1, &["tagrules"]).expect("walk");
    fs.open(1, OpenMode::write_only()).expect("open");
    fs.write(1, 0, b"/aaaa.*/ -> somewhere\n").expect("long write");
    fs.clunk(1).expect("clunk");
    fs.walk(0, 2, &["tagrules"]).expect("walk");
    fs.open(2, OpenMode::write_only()).expect("open");
    fs.write(2, 0, b"/b/ -> c\n").expect("short write");
    fs.clunk(2).expect("clunk");
    assert_eq!(read_back(&mut fs, 3, &["tagrules"]), b"/b/ -> c\n");
    assert_eq!(fs.backend().tag_ruleset().len(), 1);
}

#[test]
fn keys_blob_round_trips_and_rebinds() {
    let mut fs = fixture();
    let blob: &[u8] = b"Mod1-j\nMod1-k\nMod1-Return\n";
    fs.walk(0, 1, &["keys"]).expect("walk keys");
    fs.open(1, OpenMode::write_only()).expect("open keys");
    fs.write(1, 0, blob).expect("write");
    fs.clunk(1).expect("clunk");
    assert_eq!(fs.backend().keybindings().bindings().len(), 3);
    assert_eq!(read_back(&mut fs, 2, &["keys"]), blob);
}
