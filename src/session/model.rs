//! In-memory source view. Keeps the state a rendering widget would display,
//! without rendering anything.

use crate::mi::field::{self, Delimiter};
use crate::mi::{Frame, Record};
use crate::session::view::{ActionSender, SourceView, ViewAction, ViewFactory};
use crate::weak_error;
use std::collections::BTreeSet;
use std::fs;

/// Breakpoint mark at a source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakpointMarker {
    pub number: u32,
    pub line: u32,
    pub enabled: bool,
}

/// Reply to an expression evaluation requested by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleReply {
    Value { token: String, value: String },
    Error { token: String, msg: String },
}

#[derive(Debug)]
pub struct SourceModel {
    actions: ActionSender,
    fullname: String,
    file: String,
    line_count: Option<usize>,
    records: Vec<String>,
    breakpoints: Vec<BreakpointMarker>,
    current_lines: BTreeSet<u32>,
    current_line: Option<u32>,
    scroll_line: Option<u32>,
    search_visible: bool,
    last_reply: Option<ConsoleReply>,
}

impl SourceModel {
    pub fn new(actions: ActionSender) -> Self {
        Self {
            actions,
            fullname: String::new(),
            file: String::new(),
            line_count: None,
            records: vec![],
            breakpoints: vec![],
            current_lines: BTreeSet::new(),
            current_line: None,
            scroll_line: None,
            search_visible: false,
            last_reply: None,
        }
    }

    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Number of lines of a loaded file, [`None`] if file wasn't read.
    pub fn line_count(&self) -> Option<usize> {
        self.line_count
    }

    /// All records pushed into the view, in order.
    pub fn records(&self) -> &[String] {
        &self.records
    }

    pub fn breakpoints(&self) -> &[BreakpointMarker] {
        &self.breakpoints
    }

    pub fn current_lines(&self) -> &BTreeSet<u32> {
        &self.current_lines
    }

    pub fn current_line(&self) -> Option<u32> {
        self.current_line
    }

    pub fn scroll_line(&self) -> Option<u32> {
        self.scroll_line
    }

    pub fn search_visible(&self) -> bool {
        self.search_visible
    }

    pub fn last_reply(&self) -> Option<&ConsoleReply> {
        self.last_reply.as_ref()
    }

    /// Raise an action as if user asked for it.
    pub fn emit(&self, action: ViewAction) {
        self.actions.send(action);
    }

    /// Ask to continue execution up to `line` of the file in this view.
    pub fn run_to_line(&self, line: u32) {
        self.emit(ViewAction::RunToLine {
            fullname: self.fullname.clone(),
            line,
        });
    }

    /// Ask to insert a breakpoint at `line` of the file in this view.
    pub fn insert_breakpoint(&self, line: u32) {
        self.emit(ViewAction::InsertBreakpoint(format!(
            "-f --source \"{}\" --line {line}",
            self.fullname
        )));
    }

    fn read_file(&mut self) {
        self.line_count = weak_error!(
            fs::read_to_string(&self.fullname),
            "read source file:"
        )
        .map(|source| source.lines().count());
    }

    fn apply_frame(&mut self, frame: &Frame) {
        if self.fullname.is_empty() && !frame.fullname.is_empty() {
            self.fullname = frame.fullname.clone();
            self.file = frame.file.clone();
            self.read_file();
        }

        if frame.fullname == self.fullname {
            self.current_line = frame.line;
            if let Some(line) = frame.line {
                self.scroll_line = Some(line);
            }
        }
    }
}

impl SourceView for SourceModel {
    fn load_from_path(&mut self, fullname: &str, display_name: &str) {
        self.fullname = fullname.to_string();
        self.file = display_name.to_string();
        self.read_file();
    }

    fn handle_record_text(&mut self, text: &str) {
        self.records.push(text.to_string());

        match Record::classify(text) {
            Record::Stopped(_, text) => {
                if let Some(frame) = field::first(text, "frame=", Delimiter::Brace) {
                    self.apply_frame(&Frame::parse(&frame));
                }
            }
            Record::ConsoleValueResult { token, text } => {
                self.last_reply = Some(ConsoleReply::Value {
                    token: token.to_string(),
                    value: field::string(text, "value=").into_owned(),
                });
            }
            Record::ConsoleErrorResult { token, text } => {
                self.last_reply = Some(ConsoleReply::Error {
                    token: token.to_string(),
                    msg: field::string(text, "msg=").into_owned(),
                });
            }
            Record::BreakpointTable(_)
            | Record::StackFrames(_)
            | Record::NoRegistersError
            | Record::Unrecognized => {}
        }
    }

    fn clear_breakpoint_markers(&mut self) {
        self.breakpoints.clear();
    }

    fn add_breakpoint_marker(&mut self, number: u32, line: u32, enabled: bool) {
        self.breakpoints.push(BreakpointMarker {
            number,
            line,
            enabled,
        });
    }

    fn clear_current_line_markers(&mut self) {
        self.current_lines.clear();
    }

    fn add_current_line_marker(&mut self, line: u32) {
        self.current_lines.insert(line);
    }

    fn set_single_current_line(&mut self, line: Option<u32>) {
        self.current_line = line;
    }

    fn scroll_to_line(&mut self, line: u32) {
        self.scroll_line = Some(line);
    }

    fn show_search_ui(&mut self, show: bool) {
        self.search_visible = show;
    }
}

/// Factory of [`SourceModel`] views.
#[derive(Default, Debug)]
pub struct ModelFactory {
    created: usize,
    released: usize,
}

impl ModelFactory {
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn released(&self) -> usize {
        self.released
    }
}

impl ViewFactory for ModelFactory {
    type View = SourceModel;

    fn create(&mut self, actions: ActionSender) -> SourceModel {
        self.created += 1;
        SourceModel::new(actions)
    }

    fn release(&mut self, _view: SourceModel) {
        self.released += 1;
    }
}
