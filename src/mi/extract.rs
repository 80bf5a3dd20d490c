use crate::mi::field::{self, Delimiter};
use crate::mi::record::StopReason;

fn opt_string(text: &str, key: &str) -> Option<String> {
    field::first(text, key, Delimiter::Quote).map(|v| v.into_owned())
}

fn number(text: &str, key: &str) -> Option<u32> {
    field::first(text, key, Delimiter::Quote).and_then(|v| v.trim().parse().ok())
}

/// Stack frame description, a `frame={...}` tuple.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub level: Option<u32>,
    pub addr: String,
    pub func: String,
    /// Raw content of `args=[...]` list.
    pub args: String,
    /// Short file name.
    pub file: String,
    /// Absolute file path.
    pub fullname: String,
    pub line: Option<u32>,
    /// Shared library name for frames without debug information.
    pub from: String,
    pub arch: String,
}

impl Frame {
    /// Extract frame attributes from a content of `frame={...}` tuple.
    pub fn parse(frame: &str) -> Self {
        Frame {
            level: number(frame, "level="),
            addr: field::string(frame, "addr=").into_owned(),
            func: field::string(frame, "func=").into_owned(),
            args: field::first(frame, "args=", Delimiter::Bracket)
                .unwrap_or_default()
                .into_owned(),
            file: field::string(frame, "file=").into_owned(),
            fullname: field::string(frame, "fullname=").into_owned(),
            line: number(frame, "line="),
            from: field::string(frame, "from=").into_owned(),
            arch: field::string(frame, "arch=").into_owned(),
        }
    }
}

/// Attributes of a `*stopped` record.
#[derive(Clone, Debug, PartialEq)]
pub struct StopEvent {
    pub reason: StopReason,
    /// Breakpoint disposition (`keep` or `del`), breakpoint hit only.
    pub disp: Option<String>,
    pub bkptno: Option<u32>,
    pub thread_id: Option<String>,
    pub stopped_threads: Option<String>,
    pub core: Option<String>,
    pub signal_name: Option<String>,
    pub signal_meaning: Option<String>,
    pub frame: Frame,
}

impl StopEvent {
    /// Extract stop attributes from a record text.
    /// Return [`None`] if record has no `frame={...}` tuple.
    pub fn parse(reason: StopReason, text: &str) -> Option<Self> {
        let frame = field::first(text, "frame=", Delimiter::Brace)?;

        Some(StopEvent {
            reason,
            disp: opt_string(text, "disp="),
            bkptno: number(text, "bkptno="),
            thread_id: opt_string(text, "thread-id="),
            stopped_threads: opt_string(text, "stopped-threads="),
            core: opt_string(text, "core="),
            signal_name: opt_string(text, "signal-name="),
            signal_meaning: opt_string(text, "signal-meaning="),
            frame: Frame::parse(&frame),
        })
    }

    /// True if stop was caused by a temporary breakpoint, which is deleted by the debugger after hit.
    pub fn is_temporary_breakpoint(&self) -> bool {
        self.reason == StopReason::BreakpointHit && self.disp.as_deref() == Some("del")
    }
}

/// Breakpoint description, a `bkpt={...}` tuple of a breakpoint table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Breakpoint {
    pub number: Option<u32>,
    pub r#type: String,
    pub disp: String,
    /// `y` or `n`.
    pub enabled: String,
    pub addr: String,
    pub func: String,
    pub file: String,
    pub fullname: String,
    pub line: Option<u32>,
    /// Raw content of `thread-groups=[...]` list.
    pub thread_groups: String,
    pub times: Option<u32>,
    pub original_location: String,
}

impl Breakpoint {
    /// Extract breakpoint attributes from a content of `bkpt={...}` tuple.
    pub fn parse(bkpt: &str) -> Self {
        Breakpoint {
            number: number(bkpt, "number="),
            r#type: field::string(bkpt, "type=").into_owned(),
            disp: field::string(bkpt, "disp=").into_owned(),
            enabled: field::string(bkpt, "enabled=").into_owned(),
            addr: field::string(bkpt, "addr=").into_owned(),
            func: field::string(bkpt, "func=").into_owned(),
            file: field::string(bkpt, "file=").into_owned(),
            fullname: field::string(bkpt, "fullname=").into_owned(),
            line: number(bkpt, "line="),
            thread_groups: field::first(bkpt, "thread-groups=", Delimiter::Bracket)
                .unwrap_or_default()
                .into_owned(),
            times: number(bkpt, "times="),
            original_location: field::string(bkpt, "original-location=").into_owned(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled == "y"
    }
}

/// Extract all breakpoints from a `^done,BreakpointTable={...}` record.
/// Return an empty list if the table has no `body=[...]` or the body is empty.
pub fn breakpoint_table(text: &str) -> Vec<Breakpoint> {
    let Some(body) = field::first(text, "body=", Delimiter::Bracket) else {
        return vec![];
    };

    field::all(&body, "bkpt=", Delimiter::Brace)
        .iter()
        .map(|bkpt| Breakpoint::parse(bkpt))
        .collect()
}

/// Extract all frames from a `^done,stack=[...]` record.
/// Return [`None`] if there is no `stack=[...]` list or the list is empty.
pub fn stack(text: &str) -> Option<Vec<Frame>> {
    let stack = field::first(text, "stack=", Delimiter::Bracket)?;
    if stack.is_empty() {
        return None;
    }

    Some(
        field::all(&stack, "frame=", Delimiter::Brace)
            .iter()
            .map(|frame| Frame::parse(frame))
            .collect(),
    )
}
