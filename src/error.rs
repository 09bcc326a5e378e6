//! Error types for coffeebot.
//!
//! coffeebot uses a hierarchical error system:
//! - `CoffeeError` is the top-level error returned by fallible public APIs
//! - `CollectiveError` is the domain taxonomy: every variant is an ordinary,
//!   user-facing outcome that the dispatcher turns into a chat reply
//! - `ValidationError` describes bad configuration
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use coffeebot::{Config, Dispatcher, Result};
//!
//! fn example() -> Result<()> {
//!     let dispatcher = Dispatcher::new(Config::default())?;
//!     // ... feed events ...
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::types::{LocationKey, UserId};

/// Result type alias for coffeebot operations.
pub type Result<T> = std::result::Result<T, CoffeeError>;

/// Top-level error enum for coffeebot.
///
/// Domain violations never reach this type from [`Dispatcher::handle`]; they
/// are converted into notifications at the dispatcher boundary.
///
/// [`Dispatcher::handle`]: crate::Dispatcher::handle
#[derive(Debug, Error)]
pub enum CoffeeError {
    /// Collective lifecycle violation.
    #[error("Collective error: {0}")]
    Collective(#[from] CollectiveError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Notification delivery failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoffeeError {
    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Returns true if this is a collective lifecycle error.
    pub fn is_collective(&self) -> bool {
        matches!(self, Self::Collective(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for CoffeeError {
    fn from(err: serde_json::Error) -> Self {
        CoffeeError::Serialization(err.to_string())
    }
}

/// Collective lifecycle errors.
///
/// All of these are recoverable and reported back to the chat.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CollectiveError {
    /// An open collective already exists at this location.
    #[error("A collective is already open at {0}")]
    AlreadyOpen(LocationKey),

    /// No collective is tracked at this location.
    #[error("No collective at {0}")]
    NoCollectiveHere(LocationKey),

    /// The collective is closed and can no longer change membership.
    #[error("Collective is already closed")]
    AlreadyClosed,

    /// The collective hasn't been closed yet.
    #[error("Collective is still open")]
    StillOpen,

    /// The user already belongs to the collective.
    #[error("{0} is already a member")]
    AlreadyMember(UserId),

    /// The user doesn't belong to the collective.
    #[error("{0} is not a member")]
    NotAMember(UserId),

    /// The user may not perform this action.
    #[error("{user} is not allowed to {action}")]
    NotAuthorized {
        /// Who attempted the action.
        user: UserId,
        /// What they attempted.
        action: &'static str,
    },

    /// The message mentioned the bot but no command was recognized.
    #[error("Unrecognized command")]
    Unrecognized,
}

impl CollectiveError {
    /// Creates a not-authorized error.
    pub fn not_authorized(user: &UserId, action: &'static str) -> Self {
        Self::NotAuthorized {
            user: user.clone(),
            action,
        }
    }
}

/// Validation errors for configuration input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }
}
