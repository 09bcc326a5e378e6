//! Event loop wiring a [`Dispatcher`] to a chat transport.
//!
//! The transport side is split in two: inbound events arrive on a
//! [`crossbeam_channel::Receiver`] fed by whatever client talks to the chat
//! platform, and outbound [`Notification`]s are handed to a [`Transport`].
//! [`run`] drains the channel on the calling thread, so events are handled
//! strictly in arrival order.
//!
//! # Example
//!
//! ```rust
//! use coffeebot::{service, Config, Dispatcher, Event, JsonLinesTransport, Timestamp};
//!
//! let mut bot = Dispatcher::new(Config::default()).unwrap();
//! let (tx, rx) = crossbeam_channel::unbounded();
//! tx.send(Event::Heartbeat { now: Timestamp::from_millis(0) }).unwrap();
//! drop(tx);
//!
//! let mut out = JsonLinesTransport::new(Vec::new());
//! let handled = service::run(&mut bot, rx, &mut out);
//! assert_eq!(handled, 1);
//! ```

use std::io::Write;

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::event::{Event, Notification};

/// Delivers notifications to the chat platform.
pub trait Transport {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered. The
    /// event loop logs it and moves on.
    fn deliver(&mut self, notification: &Notification) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn deliver(&mut self, notification: &Notification) -> Result<()> {
        (**self).deliver(notification)
    }
}

/// Writes each notification as one line of JSON.
///
/// Useful for piping the bot into a separate process that owns the chat
/// connection, and for tests.
#[derive(Debug)]
pub struct JsonLinesTransport<W: Write> {
    writer: W,
    delivered: usize,
}

impl<W: Write> JsonLinesTransport<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            delivered: 0,
        }
    }

    /// Number of notifications written so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn deliver(&mut self, notification: &Notification) -> Result<()> {
        serde_json::to_writer(&mut self.writer, notification)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.delivered += 1;
        Ok(())
    }
}

/// Handles events from `events` until every sender is dropped.
///
/// Delivery failures are logged and skipped; one bad notification never
/// stops the loop. Returns the number of events handled.
pub fn run<T>(dispatcher: &mut Dispatcher, events: Receiver<Event>, mut transport: T) -> usize
where
    T: Transport,
{
    info!("Event loop started");
    let mut handled = 0;

    for event in events.iter() {
        let notifications = dispatcher.handle(&event);
        debug!(
            kind = event.kind(),
            notifications = notifications.len(),
            "Event handled"
        );

        for notification in &notifications {
            if let Err(err) = transport.deliver(notification) {
                warn!(error = %err, "Failed to deliver notification");
            }
        }
        handled += 1;
    }

    info!(events = handled, "Event loop stopped: all senders disconnected");
    handled
}
