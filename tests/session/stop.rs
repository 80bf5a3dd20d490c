use crate::common::{assert_table_invariant, session, session_with, stop, view};
use mi_session::config::SessionConfig;
use mi_session::session::event::OutboundEvent;

const END_STEPPING: &str = r#"*stopped,reason="end-stepping-range",frame={addr="0x1",func="main",file="a.cpp",fullname="/x/a.cpp",line="7",arch="x"},thread-id="1""#;

#[test]
fn test_stop_creates_view() {
    let (mut manager, subscriber) = session();

    manager.handle_text(END_STEPPING);

    let id = manager.resolve("/x/a.cpp").expect("view created");
    assert_eq!(manager.active(), Some(id));
    assert_eq!(manager.entries().len(), 1);

    let entry = manager.active_entry().unwrap();
    assert_eq!(entry.fullname(), "/x/a.cpp");
    assert_eq!(entry.file(), "a.cpp");

    let view = view(&manager, "/x/a.cpp");
    assert_eq!(view.records(), &[END_STEPPING.to_string()]);
    assert_eq!(view.current_line(), Some(7));
    assert!(subscriber.events().is_empty());
    assert_table_invariant(&manager);
}

#[test]
fn test_stop_reuses_existing_view() {
    let (mut manager, _) = session();
    manager.open_file("a.cpp", "/x/a.cpp", 0);
    manager.open_file("b.cpp", "/y/b.cpp", 0);
    let a = manager.resolve("/x/a.cpp").unwrap();

    let text = stop("function-finished", "/x/a.cpp", "a.cpp", 11);
    manager.handle_text(&text);

    assert_eq!(manager.resolve("/x/a.cpp"), Some(a));
    assert_eq!(manager.active(), Some(a));
    assert_eq!(manager.entries().len(), 2);
    assert_eq!(view(&manager, "/x/a.cpp").records(), &[text]);
    assert!(view(&manager, "/y/b.cpp").records().is_empty());
    assert_table_invariant(&manager);
}

#[test]
fn test_all_stop_reasons_open_views() {
    let (mut manager, _) = session();
    let reasons = [
        "end-stepping-range",
        "breakpoint-hit",
        "function-finished",
        "location-reached",
        "signal-received",
    ];

    for (i, reason) in reasons.iter().enumerate() {
        let fullname = format!("/src/f{i}.cpp");
        manager.handle_text(&stop(reason, &fullname, &format!("f{i}.cpp"), 3));
        let id = manager.resolve(&fullname).unwrap();
        assert_eq!(manager.active(), Some(id), "reason: {reason}");
    }

    assert_eq!(manager.entries().len(), reasons.len());
    assert_table_invariant(&manager);
}

#[test]
fn test_stop_without_source_is_dropped() {
    let (mut manager, _) = session();
    let placeholder = manager.active().unwrap();

    // no frame at all
    manager.handle_text(r#"*stopped,reason="end-stepping-range",thread-id="1""#);
    // frame without fullname
    manager.handle_text(
        r#"*stopped,reason="signal-received",signal-name="SIGSEGV",frame={addr="0x00007ffff712a420",func="raise",args=[],from="/lib64/libc.so.6",arch="i386:x86-64"},thread-id="1""#,
    );
    // unbalanced frame
    manager.handle_text(r#"*stopped,reason="function-finished",frame={fullname="/x/a.cpp",line="7""#);
    // short file name is required for these reasons
    manager.handle_text(&stop("location-reached", "/x/a.cpp", "", 35));
    manager.handle_text(&stop("signal-received", "/x/a.cpp", "", 35));

    assert!(manager.entries().is_placeholder_only());
    assert_eq!(manager.active(), Some(placeholder));

    // but not for others
    manager.handle_text(&stop("end-stepping-range", "/x/a.cpp", "", 35));
    assert!(manager.resolve("/x/a.cpp").is_some());
}

#[test]
fn test_temporary_breakpoint_hit_requests_refresh() {
    let (mut manager, subscriber) = session();

    manager.handle_text(
        r#"*stopped,reason="breakpoint-hit",disp="del",bkptno="1",frame={fullname="/x/a.cpp",file="a.cpp",line="5"}"#,
    );
    assert_eq!(subscriber.events(), vec![OutboundEvent::RefreshBreakpointsList]);
    assert!(manager.resolve("/x/a.cpp").is_some());

    subscriber.clear();
    manager.handle_text(
        r#"*stopped,reason="breakpoint-hit",disp="keep",bkptno="2",frame={fullname="/x/a.cpp",file="a.cpp",line="9"}"#,
    );
    assert!(subscriber.events().is_empty());
}

#[test]
fn test_temporary_disposition_ignored_for_other_reasons() {
    let (mut manager, subscriber) = session();
    manager.handle_text(
        r#"*stopped,reason="end-stepping-range",disp="del",frame={fullname="/x/a.cpp",file="a.cpp",line="5"}"#,
    );
    assert!(subscriber.events().is_empty());
}

#[test]
fn test_temporary_breakpoint_without_source_is_dropped() {
    let (mut manager, subscriber) = session();
    manager.handle_text(
        r#"*stopped,reason="breakpoint-hit",disp="del",bkptno="1",frame={addr="0x1",func="??"}"#,
    );
    assert!(subscriber.events().is_empty());
    assert!(manager.entries().is_placeholder_only());
}

#[test]
fn test_stop_without_activation() {
    let config = SessionConfig {
        activate_on_stop: false,
        ..Default::default()
    };
    let (mut manager, _) = session_with(config);
    manager.open_file("b.cpp", "/y/b.cpp", 0);
    let b = manager.resolve("/y/b.cpp").unwrap();

    manager.handle_text(&stop("end-stepping-range", "/x/a.cpp", "a.cpp", 7));
    assert!(manager.resolve("/x/a.cpp").is_some());
    assert_eq!(manager.active(), Some(b));
}

#[test]
fn test_escaped_fullname() {
    let (mut manager, _) = session();
    manager.handle_text(
        r#"*stopped,reason="end-stepping-range",frame={file="b\"c.cpp",fullname="/a/b\"c.cpp",line="3"}"#,
    );
    let entry = manager.active_entry().unwrap();
    assert_eq!(entry.fullname(), "/a/b\"c.cpp");
    assert_eq!(entry.file(), "b\"c.cpp");
}
