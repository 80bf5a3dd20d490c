use chumsky::error::Rich;
use chumsky::prelude::{any, choice, just};
use chumsky::{extra, text, Parser};
use std::str::FromStr;
use strum_macros::{Display, EnumString, IntoStaticStr};

pub const STOPPED_PREFIX: &str = "*stopped,reason=";
pub const BREAKPOINT_TABLE_PREFIX: &str = "^done,BreakpointTable={";
pub const STACK_PREFIX: &str = "^done,stack=[";
pub const NO_REGISTERS: &str = "^error,msg=\"No registers.\"";
pub const CONSOLE_VALUE_MARKER: &str = "^done,value=";
pub const CONSOLE_ERROR_MARKER: &str = "^error,msg=";

/// Reason of an `*stopped` async record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
pub enum StopReason {
    #[strum(serialize = "end-stepping-range")]
    EndSteppingRange,
    #[strum(serialize = "breakpoint-hit")]
    BreakpointHit,
    #[strum(serialize = "function-finished")]
    FunctionFinished,
    #[strum(serialize = "location-reached")]
    LocationReached,
    #[strum(serialize = "signal-received")]
    SignalReceived,
}

impl StopReason {
    /// True if a stop with this reason must name a short file name (`file=`) to be shown.
    pub fn requires_file(self) -> bool {
        matches!(self, StopReason::LocationReached | StopReason::SignalReceived)
    }

    /// Reason of a `*stopped` record, `None` for reasons the session doesn't handle.
    fn of_record(text: &str) -> Option<StopReason> {
        let rest = text.strip_prefix(STOPPED_PREFIX)?.strip_prefix('"')?;
        let (reason, _) = rest.split_once('"')?;
        StopReason::from_str(reason).ok()
    }
}

/// Kind of a console reply (a reply to a numbered command).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ReplyClass {
    #[strum(serialize = "value")]
    Value,
    #[strum(serialize = "error")]
    Error,
}

/// Classified MI record. Borrows the raw record text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum Record<'a> {
    /// `*stopped,reason="..."` where reason is one of [`StopReason`].
    Stopped(StopReason, &'a str),
    /// `^done,BreakpointTable={...}`.
    BreakpointTable(&'a str),
    /// `^done,stack=[...]`.
    StackFrames(&'a str),
    /// `^error,msg="No registers."`, debugee is not running.
    NoRegistersError,
    /// `N^done,value=...`. The token is kept as written, it may have leading zeros.
    ConsoleValueResult { token: &'a str, text: &'a str },
    /// `N^error,msg=...`.
    ConsoleErrorResult { token: &'a str, text: &'a str },
    Unrecognized,
}

type Err<'a> = extra::Err<Rich<'a, char>>;

fn console_reply<'a>() -> impl Parser<'a, &'a str, (&'a str, ReplyClass), Err<'a>> {
    text::digits(10)
        .to_slice()
        .then(choice((
            just(CONSOLE_VALUE_MARKER).to(ReplyClass::Value),
            just(CONSOLE_ERROR_MARKER).to(ReplyClass::Error),
        )))
        .then_ignore(any().repeated())
        .labelled("console reply")
}

impl<'a> Record<'a> {
    /// Classify a single line of debugger output.
    /// Trailing line terminators are ignored. Never fails, unknown lines are [`Record::Unrecognized`].
    pub fn classify(line: &'a str) -> Record<'a> {
        let text = line.trim_end_matches(['\r', '\n']);

        if let Some(reason) = StopReason::of_record(text) {
            return Record::Stopped(reason, text);
        }

        if text.starts_with(BREAKPOINT_TABLE_PREFIX) && text.ends_with('}') {
            return Record::BreakpointTable(text);
        }

        if text.starts_with(STACK_PREFIX) && text.ends_with(']') {
            return Record::StackFrames(text);
        }

        if text.starts_with(NO_REGISTERS) {
            return Record::NoRegistersError;
        }

        if text.starts_with(|c: char| c.is_ascii_digit()) {
            if let Ok((token, class)) = console_reply().parse(text).into_result() {
                return match class {
                    ReplyClass::Value => Record::ConsoleValueResult { token, text },
                    ReplyClass::Error => Record::ConsoleErrorResult { token, text },
                };
            }
        }

        Record::Unrecognized
    }

    /// Short record kind name for logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
