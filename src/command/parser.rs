//! Compiles a phrasing table into regexes and matches chat text against it.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{Command, CommandTable, COMMAND_TABLE};
use crate::config::Config;
use crate::error::ValidationError;

/// Characters that disarm a phrasing when placed right against it.
const QUOTES: &str = r#"`'""#;

/// Parser for the default bot name and the built-in table.
static DEFAULT_PARSER: Lazy<CommandParser> = Lazy::new(|| {
    CommandParser::new(&Config::default().mention(), COMMAND_TABLE)
        .expect("built-in command table must compile")
});

/// Parses `text` with the default mention token and [`COMMAND_TABLE`].
///
/// The underlying patterns are compiled once, on first use.
pub fn parse(text: &str) -> Command {
    DEFAULT_PARSER.parse(text)
}

/// A compiled phrasing table bound to one mention token.
///
/// Compilation happens once in [`CommandParser::new`]; [`parse`](Self::parse)
/// is pure and deterministic.
#[derive(Clone, Debug)]
pub struct CommandParser {
    /// Compiled patterns in table order.
    patterns: Vec<(Regex, Command)>,
}

impl CommandParser {
    /// Compiles `table` for messages addressed with `mention`.
    ///
    /// Each phrasing becomes a pattern requiring the mention token, then
    /// whitespace, then the phrasing, with no quote character directly
    /// before the mention or directly after the phrasing. Phrasings are
    /// compiled as written, matching case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if a phrasing is not a valid
    /// regex fragment.
    pub fn new(mention: &str, table: &CommandTable) -> Result<Self, ValidationError> {
        let mention = regex::escape(&mention.to_lowercase());
        let mut patterns = Vec::new();

        for (command, phrasings) in table {
            for phrasing in phrasings.iter() {
                let source = format!(
                    "(?:^|[^{q}]){mention}\\s+(?i:{phrasing})(?:[^{q}]|$)",
                    q = QUOTES,
                    mention = mention,
                    phrasing = phrasing,
                );
                let regex = Regex::new(&source).map_err(|e| {
                    ValidationError::invalid_field(
                        "command_table",
                        format!("phrasing {:?} for {}: {}", phrasing, command, e),
                    )
                })?;
                patterns.push((regex, *command));
            }
        }

        Ok(Self { patterns })
    }

    /// Classifies a message.
    ///
    /// The message is lower-cased and split into lines. Patterns are tried in
    /// table order, each against every line in order; the first hit wins.
    /// Returns [`Command::Unrecognized`] when nothing matches.
    pub fn parse(&self, text: &str) -> Command {
        let downcased = text.to_lowercase();
        let lines: Vec<&str> = downcased.split('\n').collect();

        for (regex, command) in &self.patterns {
            if lines.iter().any(|line| regex.is_match(line)) {
                trace!(command = %command, "matched command");
                return *command;
            }
        }

        Command::Unrecognized
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the table had no phrasings.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
