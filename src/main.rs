use anyhow::Context;
use clap::Parser;
use mi_session::config::SessionConfig;
use mi_session::session::event::OutboundEvent;
use mi_session::session::model::ModelFactory;
use mi_session::session::EditorManager;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Replay a GDB/MI transcript through the editor session and print resulting view state.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session config file, `~/.config/mi-session/config.toml` by default.
    #[arg(long, env = "MI_SESSION_CONFIG")]
    config: Option<PathBuf>,

    /// Dump every record into trace log (set RUST_LOG=trace to see it).
    #[arg(long)]
    trace: bool,

    /// Open a file before replay, as `path` or `path:line`.
    #[arg(long = "open", value_name = "PATH[:LINE]")]
    open: Vec<String>,

    /// MI transcript, one record per line. Standard input if omitted.
    transcript: Option<PathBuf>,
}

fn split_line(location: &str) -> (&Path, u32) {
    match location.rsplit_once(':') {
        Some((path, line)) if !path.is_empty() => match line.parse() {
            Ok(line) => (Path::new(path), line),
            Err(_) => (Path::new(location), 0),
        },
        _ => (Path::new(location), 0),
    }
}

fn print_event(event: &OutboundEvent) -> anyhow::Result<()> {
    println!("-> {event:?}");
    Ok(())
}

fn print_state(manager: &EditorManager<ModelFactory>) {
    println!("{} open view(s):", manager.entries().len());
    for entry in manager.entries().iter() {
        let active = if manager.active() == Some(entry.id()) {
            "*"
        } else {
            " "
        };
        let title = manager.title(entry.id()).unwrap_or_default();
        let view = entry.view();
        println!("{active} {} [{title}] {:?}", entry.id(), entry.fullname());
        println!("    current line: {:?}", view.current_line());
        println!("    frame lines:  {:?}", view.current_lines());
        for bp in view.breakpoints() {
            let state = if bp.enabled { "enabled" } else { "disabled" };
            println!("    breakpoint {} at line {} ({state})", bp.number, bp.line);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfig::load(args.config.as_deref())?;
    let mut manager = EditorManager::new(ModelFactory::default(), config);
    manager.subscribe(print_event);
    if args.trace {
        mi_session::log::enable_trace();
    }

    for location in &args.open {
        let (path, line) = split_line(location);
        manager
            .open_path(path, line)
            .with_context(|| format!("open {location}"))?;
    }

    let input: Box<dyn BufRead> = match &args.transcript {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open transcript {path:?}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in input.lines() {
        manager.handle_text(&line?);
        manager.process_view_actions();
    }

    manager.dump_entries();
    print_state(&manager);
    Ok(())
}
