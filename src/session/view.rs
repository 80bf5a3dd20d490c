use std::fmt;
use std::sync::mpsc::Sender;

/// Opaque handle of a source view, unique for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(super) u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// A presentation of a single source file. Implemented by the UI layer.
///
/// The session owns every view and forwards protocol state into it. Line numbers are 1-based.
pub trait SourceView {
    /// Load file content from storage.
    fn load_from_path(&mut self, fullname: &str, display_name: &str);

    /// Push a raw MI record, the view parses its own cursor position out of it.
    fn handle_record_text(&mut self, text: &str);

    fn clear_breakpoint_markers(&mut self);

    fn add_breakpoint_marker(&mut self, number: u32, line: u32, enabled: bool);

    /// Clear lines of active stack frames.
    fn clear_current_line_markers(&mut self);

    /// Mark a line of an active stack frame.
    fn add_current_line_marker(&mut self, line: u32);

    /// Set (or reset with [`None`]) the current execution line.
    fn set_single_current_line(&mut self, line: Option<u32>);

    fn scroll_to_line(&mut self, line: u32);

    fn show_search_ui(&mut self, show: bool);
}

/// User action raised by a view, re-emitted by the session to the rest of the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    InsertBreakpoint(String),
    DeleteBreakpoints(String),
    EnableBreakpoints(String),
    DisableBreakpoints(String),
    RunToLine { fullname: String, line: u32 },
    AddVariableExpression(String),
    RefreshVariableValues,
    EvaluateVariableExpression { id: i64, expression: String },
    AddMemoryVisualization(String),
}

/// Channel end given to a view at creation, used to raise [`ViewAction`].
#[derive(Clone, Debug)]
pub struct ActionSender {
    id: ViewId,
    tx: Sender<(ViewId, ViewAction)>,
}

impl ActionSender {
    pub(super) fn new(id: ViewId, tx: Sender<(ViewId, ViewAction)>) -> Self {
        Self { id, tx }
    }

    /// Identity of the view this sender belongs to.
    pub fn view_id(&self) -> ViewId {
        self.id
    }

    /// Send an action to the session. Actions of a closed session are dropped.
    pub fn send(&self, action: ViewAction) {
        _ = self.tx.send((self.id, action));
    }
}

/// Creates and releases views on session demand.
pub trait ViewFactory {
    type View: SourceView;

    /// Build an empty view. `actions` is the only way for the view to talk back to the session.
    fn create(&mut self, actions: ActionSender) -> Self::View;

    /// Called when a view is closed, after it was removed from the session.
    fn release(&mut self, _view: Self::View) {}
}

/// How a freshly created view gets its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewInit<'a> {
    /// From the record which referenced the file first (stop events).
    RecordText(&'a str),
    /// Read the file from storage (explicit open).
    LoadFromPath,
    /// Nothing to show, the placeholder view.
    Empty,
}
