//! GDB machine interface (MI) output: field grammar, record classification and extraction.

pub mod extract;
pub mod field;
pub mod record;

pub use extract::{Breakpoint, Frame, StopEvent};
pub use record::{Record, ReplyClass, StopReason};
