//! # coffeebot
//!
//! A chat bot that organizes coffee collectives.
//!
//! People in a chat thread band together to make coffee: someone opens a
//! collective, others join, and once it fills up (or someone closes it, or it
//! times out) coffeebot picks one member at random to make coffee for
//! everyone. The maker then pings the group when coffee is ready.
//!
//! ## Quick Start
//!
//! ```rust
//! use coffeebot::{Config, Dispatcher, Event, LocationKey, MessageId, PublicMessage, UserId};
//!
//! let mut bot = Dispatcher::new(Config::default())?;
//!
//! let said = |id, sender: &str, content: &str| {
//!     Event::PublicMessage(PublicMessage {
//!         id: MessageId(id),
//!         location: LocationKey::new("office", "coffee"),
//!         sender: UserId::new(sender),
//!         sender_is_self: false,
//!         mentions_bot: true,
//!         content: content.to_string(),
//!     })
//! };
//!
//! bot.handle(&said(1, "alice", "@**coffeebot** init"));
//! bot.handle(&said(2, "bob", "@**coffeebot** yes"));
//! let replies = bot.handle(&said(3, "carol", "@**coffeebot** yes"));
//!
//! // Carol filled the collective: an acknowledgement plus the maker announcement
//! assert_eq!(replies.len(), 2);
//! # Ok::<(), coffeebot::CoffeeError>(())
//! ```
//!
//! ## Key Concepts
//!
//! ### Collective
//!
//! A **collective** lives in one stream topic (a [`LocationKey`]). There is
//! at most one per location. It is open until it fills, is closed by a
//! member, or times out; closing elects the maker exactly once.
//!
//! ### Commands
//!
//! Commands are phrases following the bot's mention, e.g.
//! `@**coffeebot** yes`. A command wrapped in quotes or backticks is
//! treated as talk *about* the bot and ignored. See [`COMMAND_TABLE`].
//!
//! ### Dispatch
//!
//! The [`Dispatcher`] turns [`Event`]s into [`Notification`]s. It never
//! fails: refused commands are answered with one explanatory reply.
//!
//! ## Thread Safety
//!
//! `Dispatcher` is `Send` but handles events through `&mut self`; run it on
//! one thread (see [`service::run`]) and feed it through a channel.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod error;
mod types;

pub mod clock;
pub mod election;
pub mod event;

// Domain modules
pub mod collective;
pub mod command;
pub mod dispatch;

/// Event loop and transports.
pub mod service;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main bot interface
pub use dispatch::Dispatcher;

// Configuration
pub use config::{Config, MAX_CAPACITY, MAX_TIMEOUT};

// Error handling
pub use error::{CoffeeError, CollectiveError, Result, ValidationError};

// Core types
pub use types::{CollectiveId, LocationKey, MessageId, Timestamp, UserId};

// Domain types
pub use collective::{
    Closer, Collective, CollectiveRegistry, CollectiveSnapshot, JoinOutcome, LeaveOutcome,
    SnapshotStatus,
};
pub use command::{parse, Command, CommandParser, COMMAND_TABLE};

// Injected behavior
pub use clock::{Clock, ManualClock, SystemClock};
pub use election::{FixedChooser, MakerChooser, RandomChooser};

// Events
pub use event::{Event, Notification, PrivateMessage, PublicMessage};
pub use service::{JsonLinesTransport, Transport};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common coffeebot usage.
///
/// ```rust
/// use coffeebot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dispatch::Dispatcher;
    pub use crate::error::{CoffeeError, Result};
    pub use crate::event::{Event, Notification, PrivateMessage, PublicMessage};
    pub use crate::types::{LocationKey, MessageId, Timestamp, UserId};
}
