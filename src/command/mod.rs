//! Command recognition.
//!
//! coffeebot understands a closed set of [`Command`]s. Free-form chat text is
//! mapped onto them by a [`CommandParser`] compiled from an ordered phrasing
//! table, [`COMMAND_TABLE`].
//!
//! # Precedence
//!
//! The table is tried group by group, phrasing by phrasing, and the first
//! phrasing that matches any line of the message wins. Overlapping phrasings
//! are resolved by table position, never by how specific they are, so the
//! order of [`COMMAND_TABLE`] is part of the bot's observable behavior.
//!
//! # Quoting
//!
//! A phrasing quoted with a backtick, `'` or `"` right against the mention or
//! the keyword doesn't count, so usage examples in documentation never summon
//! the bot:
//!
//! ```rust
//! use coffeebot::{parse, Command};
//!
//! assert_eq!(parse("@**coffeebot** init"), Command::Init);
//! assert_eq!(parse("type `@**coffeebot** init` to start"), Command::Unrecognized);
//! ```

mod parser;

pub use parser::{parse, CommandParser};

use std::fmt;

/// A command addressed to the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Open a collective at the current location.
    Init,
    /// Join the open collective.
    Join,
    /// Leave the open collective.
    Leave,
    /// Close the collective and elect a maker.
    Close,
    /// Maker announces that coffee is ready.
    Ping,
    /// Report the collective's state.
    State,
    /// Show the bot some affection.
    Love,
    /// The bot was mentioned but nothing matched.
    Unrecognized,
}

impl Command {
    /// Returns a short lowercase name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Close => "close",
            Self::Ping => "ping",
            Self::State => "state",
            Self::Love => "love",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered table of commands and the phrasings that trigger them.
///
/// Phrasings are regex fragments matched case-insensitively right after the
/// mention token.
pub type CommandTable = [(Command, &'static [&'static str])];

/// The built-in phrasing table, in precedence order.
///
/// `in` and `out` are not accepted; `in` is a prefix of `init`.
pub const COMMAND_TABLE: &CommandTable = &[
    (Command::Init, &["init", "start"]),
    (Command::Join, &["yes", "join"]),
    (Command::Leave, &["no", "leave"]),
    (Command::State, &["state", "status"]),
    (Command::Ping, &["ping"]),
    (Command::Close, &["close", "done", "stop"]),
    (Command::Love, &["love"]),
];
