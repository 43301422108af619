// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Drive the control files end to end over the real window-manager model.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use rift::Wm;
use rift_9p::{Backend, Error, Namespace, OpenMode, ReadOutcome};

fn fixture() -> Namespace<Wm> {
    let _ = env_logger::builder().is_test(true).try_init();
    Namespace::new(Wm::new())
}

fn read_text(fs: &mut Namespace<Wm>, fid: u32, path: &[&str]) -> String {
    fs.walk(0, fid, path).expect("walk");
    fs.open(fid, OpenMode::read_only()).expect("open");
    let data = match fs.read(fid as u16, fid, 0, 65535).expect("read") {
        ReadOutcome::Done(data) => data,
        ReadOutcome::Parked => panic!("control read parked"),
    };
    fs.clunk(fid).expect("clunk");
    String::from_utf8(data).expect("utf8")
}

fn write_line(fs: &mut Namespace<Wm>, fid: u32, path: &[&str], line: &str) -> Result<u32, Error> {
    fs.walk(0, fid, path).expect("walk");
    fs.open(fid, OpenMode::write_only()).expect("open");
    let outcome = fs.write(fid, 0, line.as_bytes());
    fs.clunk(fid).expect("clunk");
    outcome
}

#[test]
fn root_ctl_snapshot_reflects_settings_writes() {
    let mut fs = fixture();
    fs.attach(0).expect("attach");
    write_line(&mut fs, 1, &["ctl"], "border 7\n").expect("border");
    write_line(&mut fs, 2, &["ctl"], "font terminus-12\n").expect("font");
    write_line(&mut fs, 3, &["ctl"], "grabmod Mod4\n").expect("grabmod");
    let snapshot = read_text(&mut fs, 4, &["ctl"]);
    assert!(snapshot.contains("border 7\n"));
    assert!(snapshot.contains("font terminus-12\n"));
    assert!(snapshot.contains("grabmod Mod4\n"));
}

#[test]
fn root_ctl_applies_every_line_but_reports_the_first_error() {
    let mut fs = fixture();
    fs.attach(0).expect("attach");
    let err = write_line(
        &mut fs,
        1,
        &["ctl"],
        "border 9\nfrobnicate\ngrabmod Mod5\nborder nonsense\n",
    )
    .expect_err("first error surfaces");
    assert_eq!(err, Error::BadCommand);
    // Lines after the failure still executed.
    let settings = fs.backend().settings();
    assert_eq!(settings.border, 9);
    assert_eq!(settings.grabmod, "Mod5");
}

#[test]
fn view_switch_creates_the_view_unchecked() {
    let mut fs = fixture();
    fs.attach(0).expect("attach");
    assert!(fs.backend().view_by_name("scratch").is_none());
    write_line(&mut fs, 1, &["ctl"], "view scratch\n").expect("view");
    let snapshot = read_text(&mut fs, 2, &["ctl"]);
    assert!(snapshot.starts_with("view scratch\n"));
    assert!(fs.backend().view_by_name("scratch").is_some());
}

#[test]
fn client_ctl_kills_the_client() {
    let mut fs = fixture();
    let first = fs.backend_mut().manage("xterm", "XTerm:xterm:term");
    fs.backend_mut().manage("firefox", "Firefox:Navigator:web");
    fs.attach(0).expect("attach");
    assert_eq!(
        write_line(&mut fs, 1, &["client", "0", "ctl"], "resize\n"),
        Err(Error::BadCommand)
    );
    write_line(&mut fs, 2, &["client", "0", "ctl"], "kill\n").expect("kill");
    assert!(fs.backend().client(first).is_none());
    // Only one client remains; position 1 no longer resolves.
    assert_eq!(fs.walk(0, 3, &["client", "1"]), Err(Error::NotFound));
    fs.walk(0, 4, &["client", "0"]).expect("walk survivor");
}

#[test]
fn tag_ctl_select_moves_the_view_selection() {
    let mut fs = fixture();
    let a = fs.backend_mut().manage("one", "a:a:a");
    let b = fs.backend_mut().manage("two", "b:b:b");
    fs.attach(0).expect("attach");
    let view = fs.backend().selected_view().expect("selected view");
    assert_eq!(fs.backend().view(view).expect("view").selected(), Some(a));
    write_line(&mut fs, 1, &["tag", "sel", "ctl"], "select next\n").expect("select");
    assert_eq!(fs.backend().view(view).expect("view").selected(), Some(b));
    assert_eq!(
        write_line(&mut fs, 2, &["tag", "sel", "ctl"], "select 9\n"),
        Err(Error::BadValue)
    );
}

#[test]
fn tag_ctl_reads_the_view_name() {
    let mut fs = fixture();
    fs.backend_mut().manage("xterm", "XTerm:xterm:term");
    fs.attach(0).expect("attach");
    assert_eq!(read_text(&mut fs, 1, &["tag", "sel", "ctl"]), "1");
    assert_eq!(read_text(&mut fs, 2, &["tag", "sel", "index"]), "1 1\n");
}
