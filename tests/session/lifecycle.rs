use crate::common::{assert_table_invariant, session, session_with, stop, view};
use mi_session::config::SessionConfig;
use mi_session::session::event::OutboundEvent;
use mi_session::session::view::ViewAction;
use std::io::Write;

#[test]
fn test_open_file() {
    let (mut manager, subscriber) = session();

    manager.open_file("a.cpp", "/x/a.cpp", 42);

    let id = manager.resolve("/x/a.cpp").unwrap();
    assert_eq!(manager.active(), Some(id));
    let view = view(&manager, "/x/a.cpp");
    assert_eq!(view.fullname(), "/x/a.cpp");
    assert_eq!(view.file(), "a.cpp");
    assert_eq!(view.scroll_line(), Some(42));
    assert!(view.records().is_empty());
    assert_eq!(
        subscriber.events(),
        vec![
            OutboundEvent::RefreshBreakpointsList,
            OutboundEvent::RefreshStackFrames
        ]
    );
    assert_table_invariant(&manager);
}

#[test]
fn test_open_file_twice_reuses_view() {
    let (mut manager, subscriber) = session();
    manager.open_file("a.cpp", "/x/a.cpp", 0);
    manager.open_file("b.cpp", "/y/b.cpp", 0);
    let a = manager.resolve("/x/a.cpp").unwrap();

    manager.open_file("a.cpp", "/x/a.cpp", 0);
    assert_eq!(manager.resolve("/x/a.cpp"), Some(a));
    assert_eq!(manager.active(), Some(a));
    assert_eq!(manager.entries().len(), 2);
    assert_eq!(view(&manager, "/x/a.cpp").scroll_line(), None);
    assert_eq!(subscriber.count(&OutboundEvent::RefreshStackFrames), 3);
    assert_eq!(manager.factory().created(), 3);
}

#[test]
fn test_open_file_with_empty_names() {
    let (mut manager, subscriber) = session();
    manager.open_file("", "/x/a.cpp", 1);
    manager.open_file("a.cpp", "", 1);
    assert!(manager.entries().is_placeholder_only());
    assert!(subscriber.events().is_empty());
}

#[test]
fn test_open_file_without_refresh() {
    let config = SessionConfig {
        refresh_on_open: false,
        ..Default::default()
    };
    let (mut manager, subscriber) = session_with(config);
    manager.open_file("a.cpp", "/x/a.cpp", 0);
    assert!(manager.resolve("/x/a.cpp").is_some());
    assert!(subscriber.events().is_empty());
}

#[test]
fn test_open_path() {
    let dir = std::env::temp_dir().join(format!("mi-session-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hello.cpp");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "int main() {{\n  return 0;\n}}").unwrap();

    let (mut manager, _) = session();
    manager.open_path(&path, 2).unwrap();

    let fullname = path.to_str().unwrap();
    let view = view(&manager, fullname);
    assert_eq!(view.file(), "hello.cpp");
    assert_eq!(view.line_count(), Some(3));
    assert_eq!(view.scroll_line(), Some(2));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_close_views() {
    let (mut manager, _) = session();
    manager.handle_text(&stop("end-stepping-range", "/x/a.cpp", "a.cpp", 7));
    manager.open_file("b.cpp", "/y/b.cpp", 0);
    let a = manager.resolve("/x/a.cpp").unwrap();
    let b = manager.resolve("/y/b.cpp").unwrap();

    assert!(manager.close(a));
    assert!(manager.resolve("/x/a.cpp").is_none());
    assert_eq!(manager.active(), Some(b));
    assert_table_invariant(&manager);

    assert!(manager.close(b));
    assert!(manager.entries().is_placeholder_only());
    assert_table_invariant(&manager);

    // file is opened again with a fresh view
    manager.handle_text(&stop("end-stepping-range", "/x/a.cpp", "a.cpp", 7));
    let new_a = manager.resolve("/x/a.cpp").unwrap();
    assert_ne!(new_a, a);
    assert_eq!(manager.factory().released(), 4);
    assert_table_invariant(&manager);
}

#[test]
fn test_view_actions_are_reemitted() {
    let (mut manager, subscriber) = session();
    manager.open_file("a.cpp", "/x/a.cpp", 0);
    subscriber.clear();

    let a = manager.resolve("/x/a.cpp").unwrap();
    {
        let view = manager.view(a).unwrap();
        view.insert_breakpoint(10);
        view.run_to_line(12);
        view.emit(ViewAction::DeleteBreakpoints("1 2".to_string()));
        view.emit(ViewAction::EnableBreakpoints("3".to_string()));
        view.emit(ViewAction::DisableBreakpoints("4".to_string()));
        view.emit(ViewAction::AddVariableExpression("argc".to_string()));
        view.emit(ViewAction::RefreshVariableValues);
        view.emit(ViewAction::EvaluateVariableExpression {
            id: 10,
            expression: "argv[0]".to_string(),
        });
        view.emit(ViewAction::AddMemoryVisualization("&argc".to_string()));
    }
    assert!(subscriber.events().is_empty());

    manager.process_view_actions();

    assert_eq!(
        subscriber.events(),
        vec![
            OutboundEvent::View(ViewAction::InsertBreakpoint(
                "-f --source \"/x/a.cpp\" --line 10".to_string()
            )),
            OutboundEvent::View(ViewAction::RunToLine {
                fullname: "/x/a.cpp".to_string(),
                line: 12
            }),
            OutboundEvent::View(ViewAction::DeleteBreakpoints("1 2".to_string())),
            OutboundEvent::View(ViewAction::EnableBreakpoints("3".to_string())),
            OutboundEvent::View(ViewAction::DisableBreakpoints("4".to_string())),
            OutboundEvent::View(ViewAction::AddVariableExpression("argc".to_string())),
            OutboundEvent::View(ViewAction::RefreshVariableValues),
            OutboundEvent::View(ViewAction::EvaluateVariableExpression {
                id: 10,
                expression: "argv[0]".to_string()
            }),
            OutboundEvent::View(ViewAction::AddMemoryVisualization("&argc".to_string())),
        ]
    );
}

#[test]
fn test_actions_of_closed_view_are_dropped() {
    let (mut manager, subscriber) = session();
    manager.open_file("a.cpp", "/x/a.cpp", 0);
    subscriber.clear();

    let a = manager.resolve("/x/a.cpp").unwrap();
    manager.view(a).unwrap().run_to_line(3);
    manager.close(a);
    manager.process_view_actions();

    assert!(subscriber.events().is_empty());
}

#[test]
fn test_table_invariant_holds() {
    let (mut manager, _) = session();
    let files = ["/x/a.cpp", "/y/b.cpp", "/z/c.cpp"];

    for step in 0..60usize {
        let fullname = files[step % files.len()];
        match step % 7 {
            0 | 3 => manager.handle_text(&stop("breakpoint-hit", fullname, "f.cpp", 1)),
            1 => manager.open_file("f.cpp", fullname, step as u32),
            2 | 5 => {
                if let Some(id) = manager.resolve(fullname) {
                    manager.close(id);
                }
            }
            4 => {
                if let Some(id) = manager.active() {
                    manager.close(id);
                }
            }
            _ => manager.handle_text(&stop("location-reached", fullname, "f.cpp", 2)),
        }
        assert_table_invariant(&manager);
        if let Some(active) = manager.active() {
            assert!(manager.view(active).is_some());
        }
    }
}
