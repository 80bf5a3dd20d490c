//! Per-file source view state, synchronized with the debugger MI output.

pub mod entry;
pub mod event;
pub mod model;
pub mod view;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::mi::extract::{self, StopEvent};
use crate::mi::{Record, StopReason};
use crate::session::entry::{Entry, EntryTable, PLACEHOLDER};
use crate::session::event::{EventBus, OutboundEvent, Subscriber};
use crate::session::view::{ActionSender, SourceView, ViewAction, ViewFactory, ViewId, ViewInit};
use crate::short::TitleAbbreviator;
use crate::{mi_trace, weak_error};
use log::debug;
use std::borrow::Cow;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Owner of all open source views.
///
/// Consumes MI records one by one and keeps views in sync with them:
/// opens views for files where the debugee stops, rebuilds breakpoint and stack markers
/// from bulk records, routes console replies to the active view.
/// Requests to the rest of the application are delivered to subscribers as [`OutboundEvent`].
pub struct EditorManager<F: ViewFactory> {
    factory: F,
    entries: EntryTable<F::View>,
    active: Option<ViewId>,
    next_id: u64,
    events: EventBus,
    actions_tx: Sender<(ViewId, ViewAction)>,
    actions_rx: Receiver<(ViewId, ViewAction)>,
    config: SessionConfig,
}

impl<F: ViewFactory> EditorManager<F> {
    /// Create a session with a single placeholder view.
    pub fn new(factory: F, config: SessionConfig) -> Self {
        if config.trace_records {
            crate::log::enable_trace();
        } else {
            crate::log::disable_trace();
        }

        let (actions_tx, actions_rx) = channel();
        let mut manager = Self {
            factory,
            entries: EntryTable::default(),
            active: None,
            next_id: 0,
            events: EventBus::default(),
            actions_tx,
            actions_rx,
            config,
        };
        manager.create_placeholder();
        manager
    }

    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) {
        self.events.subscribe(Box::new(subscriber));
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn entries(&self) -> &EntryTable<F::View> {
        &self.entries
    }

    /// Currently active (front) view.
    pub fn active(&self) -> Option<ViewId> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&Entry<F::View>> {
        self.entries.find_by_id(self.active?)
    }

    pub fn view(&self, id: ViewId) -> Option<&F::View> {
        self.entries.find_by_id(id).map(|e| e.view())
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut F::View> {
        self.entries.find_by_id_mut(id).map(|e| e.view_mut())
    }

    /// Find a view for file, without creating one.
    pub fn resolve(&self, fullname: &str) -> Option<ViewId> {
        self.entries.get(fullname).map(|e| e.id())
    }

    /// Title of a view: display name, abbreviated if it is too long.
    pub fn title(&self, id: ViewId) -> Option<Cow<'_, str>> {
        let entry = self.entries.find_by_id(id)?;
        let abbreviator = TitleAbbreviator::new("/", "…", self.config.title_width);
        Some(abbreviator.apply(entry.file()))
    }

    /// Log all entries at debug level.
    pub fn dump_entries(&self) {
        for entry in self.entries.iter() {
            debug!(
                target: "session",
                "{}: fullname: {:?} file: {:?}",
                entry.id(),
                entry.fullname(),
                entry.file()
            );
        }
    }

    /// Handle a single line of debugger output.
    pub fn handle_text(&mut self, text: &str) {
        let record = Record::classify(text);
        mi_trace!("{} <- {text}", record.kind());

        match record {
            Record::Stopped(reason, text) => self.on_stop(reason, text),
            Record::BreakpointTable(text) => self.on_breakpoint_table(text),
            Record::StackFrames(text) => self.on_stack_frames(text),
            Record::NoRegistersError => self.on_no_registers(),
            Record::ConsoleValueResult { text, .. } | Record::ConsoleErrorResult { text, .. } => {
                self.on_console_reply(text)
            }
            Record::Unrecognized => {}
        }

        self.events.flush();
    }

    fn on_stop(&mut self, reason: StopReason, text: &str) {
        let Some(event) = StopEvent::parse(reason, text) else {
            debug!(target: "session", "{reason}: no frame, skip");
            return;
        };

        let frame = &event.frame;
        if frame.fullname.is_empty() || (reason.requires_file() && frame.file.is_empty()) {
            debug!(target: "session", "{reason}: no source file for frame, skip");
            return;
        }

        match self.resolve(&frame.fullname) {
            Some(id) => {
                if self.config.activate_on_stop {
                    self.active = Some(id);
                }
                if let Some(view) = self.view_mut(id) {
                    view.handle_record_text(text);
                }
            }
            None => {
                let created =
                    self.create_for(&frame.fullname, &frame.file, ViewInit::RecordText(text));
                if self.config.activate_on_stop && created.is_some() {
                    self.active = created;
                }
            }
        }

        if event.is_temporary_breakpoint() {
            self.events.push(OutboundEvent::RefreshBreakpointsList);
        }
    }

    fn on_breakpoint_table(&mut self, text: &str) {
        self.entries
            .iter_mut()
            .for_each(|e| e.view_mut().clear_breakpoint_markers());

        for bkpt in extract::breakpoint_table(text) {
            let (Some(number), Some(line)) = (bkpt.number, bkpt.line) else {
                debug!(target: "session", "breakpoint without number or line: {bkpt:?}");
                continue;
            };
            if bkpt.fullname.is_empty() {
                continue;
            }

            if let Some(entry) = self.entries.get_mut(&bkpt.fullname) {
                entry
                    .view_mut()
                    .add_breakpoint_marker(number, line, bkpt.is_enabled());
            }
        }
    }

    fn on_stack_frames(&mut self, text: &str) {
        let Some(frames) = extract::stack(text) else {
            return;
        };

        self.entries
            .iter_mut()
            .for_each(|e| e.view_mut().clear_current_line_markers());

        for frame in frames {
            let Some(line) = frame.line else {
                continue;
            };
            if frame.fullname.is_empty() {
                continue;
            }

            if let Some(entry) = self.entries.get_mut(&frame.fullname) {
                entry.view_mut().add_current_line_marker(line);
            }
        }
    }

    fn on_no_registers(&mut self) {
        self.entries
            .iter_mut()
            .for_each(|e| e.view_mut().set_single_current_line(None));
    }

    fn on_console_reply(&mut self, text: &str) {
        let Some(id) = self.active else {
            debug!(target: "session", "no active view for console reply");
            return;
        };
        if let Some(view) = self.view_mut(id) {
            view.handle_record_text(text);
        }
    }

    /// Create a view for a file. A lone placeholder is removed first.
    /// The new view becomes active only if there is no other active view.
    /// Return `None` for an empty `fullname`, this key belongs to the placeholder.
    pub fn create_for(&mut self, fullname: &str, file: &str, init: ViewInit) -> Option<ViewId> {
        if fullname == PLACEHOLDER {
            debug!(target: "session", "refuse to create a view without fullname");
            return None;
        }

        if self.entries.is_placeholder_only() {
            if let Some(placeholder) = self.entries.remove(PLACEHOLDER) {
                debug!(target: "session", "remove placeholder {}", placeholder.id());
                self.factory.release(placeholder.into_view());
            }
        }

        Some(self.insert_view(fullname, file, init))
    }

    fn create_placeholder(&mut self) -> ViewId {
        self.insert_view(PLACEHOLDER, PLACEHOLDER, ViewInit::Empty)
    }

    fn insert_view(&mut self, fullname: &str, file: &str, init: ViewInit) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;

        let mut view = self
            .factory
            .create(ActionSender::new(id, self.actions_tx.clone()));
        match init {
            ViewInit::RecordText(text) => view.handle_record_text(text),
            ViewInit::LoadFromPath => view.load_from_path(fullname, file),
            ViewInit::Empty => {}
        }

        if let Some(stale) = self.entries.remove(fullname) {
            debug!(target: "session", "replace view {} for {fullname:?}", stale.id());
            self.factory.release(stale.into_view());
        }
        weak_error!(self.entries.insert(Entry::new(fullname, file, id, view)));
        debug!(target: "session", "{id} created for {fullname:?}");

        let active_alive = self
            .active
            .is_some_and(|active| self.entries.find_by_id(active).is_some());
        if !active_alive {
            self.active = Some(id);
        }
        id
    }

    /// Close a view. Closing the placeholder or an unknown view does nothing.
    /// Return true if the view was closed.
    pub fn close(&mut self, id: ViewId) -> bool {
        let Some(position) = self.entries.position(id) else {
            return false;
        };
        if self
            .entries
            .get_index(position)
            .is_some_and(|e| e.is_placeholder())
        {
            return false;
        }

        let Some(entry) = self.entries.remove_by_id(id) else {
            return false;
        };
        debug!(target: "session", "{id} closed for {:?}", entry.fullname());
        self.factory.release(entry.into_view());

        if self.entries.is_empty() {
            self.create_placeholder();
        } else if self.active == Some(id) {
            let next = position.min(self.entries.len() - 1);
            self.active = self.entries.get_index(next).map(|e| e.id());
        }

        true
    }

    /// Open a file on user request and scroll to `line` if it's not zero.
    /// Does nothing if one of names is empty.
    pub fn open_file(&mut self, display_name: &str, fullname: &str, line: u32) {
        if display_name.is_empty() || fullname.is_empty() {
            return;
        }

        let Some(id) = self
            .resolve(fullname)
            .or_else(|| self.create_for(fullname, display_name, ViewInit::LoadFromPath))
        else {
            return;
        };
        self.active = Some(id);

        if line > 0 {
            if let Some(view) = self.view_mut(id) {
                view.scroll_to_line(line);
            }
        }

        if self.config.refresh_on_open {
            self.events.push(OutboundEvent::RefreshBreakpointsList);
            self.events.push(OutboundEvent::RefreshStackFrames);
        }
        self.events.flush();
    }

    /// Open a file by path, relative paths are resolved against current directory.
    pub fn open_path(&mut self, path: &Path, line: u32) -> Result<()> {
        let path = std::path::absolute(path)?;
        let file = path
            .file_name()
            .ok_or_else(|| Error::NoFileName(path.clone()))?
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(path.clone()))?
            .to_string();
        let fullname = path
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(path.clone()))?;

        self.open_file(&file, fullname, line);
        Ok(())
    }

    /// Show a search bar of the active view.
    pub fn show_search(&mut self) {
        if let Some(id) = self.active {
            if let Some(view) = self.view_mut(id) {
                view.show_search_ui(true);
            }
        }
    }

    /// Re-emit actions raised by views. Actions of closed views are dropped.
    pub fn process_view_actions(&mut self) {
        while let Ok((id, action)) = self.actions_rx.try_recv() {
            if self.entries.find_by_id(id).is_none() {
                debug!(target: "session", "drop action of closed {id}: {action:?}");
                continue;
            }
            self.events.push(OutboundEvent::View(action));
        }
        self.events.flush();
    }
}
