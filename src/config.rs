//! Configuration types for coffeebot.
//!
//! The [`Config`] struct controls how the bot is addressed and how
//! collectives behave:
//! - Bot name (which determines the mention token commands must start with)
//! - Collective capacity and timeout
//! - Help text sent in reply to private messages
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use coffeebot::Config;
//!
//! // Use defaults (3 members, 15 minute timeout)
//! let config = Config::default();
//!
//! // Bigger pots, more patience
//! let config = Config {
//!     capacity: 6,
//!     timeout: Duration::from_secs(30 * 60),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use crate::dispatch::replies;
use crate::error::ValidationError;

/// Largest collective coffeebot will track.
pub const MAX_CAPACITY: usize = 64;

/// Longest a collective may stay open before timing out.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Bot configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// The bot's name as it appears in mentions (`@**name**`).
    pub bot_name: String,

    /// Maximum number of members per collective, leader included.
    ///
    /// A collective closes itself as soon as it is full.
    /// Default: 3
    pub capacity: usize,

    /// How long a collective may stay open before the heartbeat sweep
    /// closes it.
    /// Default: 15 minutes
    pub timeout: Duration,

    /// Text sent in reply to private messages.
    ///
    /// `None` uses the built-in usage text.
    pub help_text: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_name: "coffeebot".to_string(),
            capacity: 3,
            timeout: Duration::from_secs(15 * 60),
            help_text: None,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `Dispatcher::new()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `bot_name` is empty, contains whitespace or `*`
    /// - `capacity` is below 2 or above [`MAX_CAPACITY`]
    /// - `timeout` is zero or exceeds [`MAX_TIMEOUT`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_name.is_empty() {
            return Err(ValidationError::required_field("bot_name"));
        }

        // The name is embedded in the mention token; these would break it
        if self
            .bot_name
            .chars()
            .any(|c| c.is_whitespace() || c == '*')
        {
            return Err(ValidationError::invalid_field(
                "bot_name",
                "must not contain whitespace or '*'",
            ));
        }

        // A collective of one is full the moment it opens
        if self.capacity < 2 {
            return Err(ValidationError::invalid_field(
                "capacity",
                format!("must be at least 2, got {}", self.capacity),
            ));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ValidationError::invalid_field(
                "capacity",
                format!("must not exceed {}, got {}", MAX_CAPACITY, self.capacity),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ValidationError::invalid_field(
                "timeout",
                "must be greater than 0",
            ));
        }
        if self.timeout > MAX_TIMEOUT {
            return Err(ValidationError::invalid_field(
                "timeout",
                "must not exceed 24 hours",
            ));
        }

        Ok(())
    }

    /// Returns the mention token commands must start with, e.g. `@**coffeebot**`.
    pub fn mention(&self) -> String {
        format!("@**{}**", self.bot_name)
    }

    /// Returns the text sent in reply to private messages.
    pub fn help_text(&self) -> String {
        match self.help_text {
            Some(ref text) => text.clone(),
            None => replies::help(&self.bot_name, self.capacity),
        }
    }
}
