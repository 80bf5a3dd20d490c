use crate::error::Error;
use crate::session::view::ViewAction;
use crate::weak_error;
use std::collections::VecDeque;

/// Request or notification sent by the session to the rest of the application.
/// Fire-and-forget: an answer, if any, arrives later as an ordinary MI record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Breakpoint table may be stale, ask debugger for `-break-list`.
    RefreshBreakpointsList,
    /// Stack frames may be stale, ask debugger for `-stack-list-frames`.
    RefreshStackFrames,
    /// User action of a view.
    View(ViewAction),
}

/// Receiver of session outbound events.
pub trait Subscriber {
    fn on_event(&self, event: &OutboundEvent) -> anyhow::Result<()>;
}

impl<F> Subscriber for F
where
    F: Fn(&OutboundEvent) -> anyhow::Result<()>,
{
    fn on_event(&self, event: &OutboundEvent) -> anyhow::Result<()> {
        self(event)
    }
}

/// Outbound events queue and its subscribers.
/// Events are enqueued while a record is handled and delivered after it.
#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<OutboundEvent>,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl EventBus {
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn push(&mut self, event: OutboundEvent) {
        self.queue.push_back(event);
    }

    /// Deliver all queued events to every subscriber in subscription order.
    /// A failed subscriber doesn't prevent delivery to others.
    /// Return number of failed deliveries.
    pub fn flush(&mut self) -> usize {
        let mut failed = 0;
        while let Some(event) = self.queue.pop_front() {
            log::debug!(target: "session", "emit {event:?}");
            for subscriber in &self.subscribers {
                let delivered = subscriber.on_event(&event).map_err(Error::Subscriber);
                if weak_error!(delivered).is_none() {
                    failed += 1;
                }
            }
        }
        failed
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
