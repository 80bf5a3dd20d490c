use std::sync::atomic::{AtomicBool, Ordering};

static TRACE: AtomicBool = AtomicBool::new(false);

/// Return true if raw MI records should be dumped into logs.
#[inline(always)]
pub fn is_trace_enabled() -> bool {
    TRACE.load(Ordering::SeqCst)
}

pub fn disable_trace() {
    TRACE.store(false, Ordering::SeqCst)
}

pub fn enable_trace() {
    TRACE.store(true, Ordering::SeqCst)
}

/// Log a raw record at trace level, only if record tracing is switched on.
#[macro_export]
macro_rules! mi_trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::log::is_trace_enabled() {
            log::trace!(target: $target, $($arg)+)
        }
    };
    ($($arg:tt)+) => {
        if $crate::log::is_trace_enabled() {
            log::trace!(target: "mi", $($arg)+)
        }
    };
}
