//! Inbound events and outbound notifications.
//!
//! These are the only shapes that cross the boundary between coffeebot and
//! the chat transport. Both are serializable so a transport can move them
//! as JSON.

use serde::{Deserialize, Serialize};

use crate::types::{LocationKey, MessageId, Timestamp, UserId};

/// Something that happened on the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Periodic tick; drives the timeout sweep.
    Heartbeat {
        /// Time of the tick.
        now: Timestamp,
    },

    /// A direct message to the bot.
    PrivateMessage(PrivateMessage),

    /// A message posted in a stream topic.
    PublicMessage(PublicMessage),
}

impl Event {
    /// Short name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heartbeat { .. } => "heartbeat",
            Self::PrivateMessage(_) => "private_message",
            Self::PublicMessage(_) => "public_message",
        }
    }
}

/// A direct message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessage {
    /// Who sent it.
    pub sender: UserId,

    /// True when the bot sent this message itself.
    #[serde(default)]
    pub sender_is_self: bool,

    /// Message text.
    pub content: String,
}

/// A message in a stream topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMessage {
    /// Platform id, used to react to the message.
    pub id: MessageId,

    /// Stream and topic the message was posted in.
    pub location: LocationKey,

    /// Who sent it.
    pub sender: UserId,

    /// True when the bot sent this message itself.
    #[serde(default)]
    pub sender_is_self: bool,

    /// True when the message mentions the bot.
    pub mentions_bot: bool,

    /// Message text.
    pub content: String,
}

/// Something the transport should do on the bot's behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Post `content` in a stream topic.
    PublicReply {
        /// Where to post.
        location: LocationKey,
        /// What to post.
        content: String,
    },

    /// Send `content` to a single user.
    PrivateReply {
        /// Who to send it to.
        recipient: UserId,
        /// What to send.
        content: String,
    },

    /// React to a message with an emoji.
    Reaction {
        /// The message to react to.
        target: MessageId,
        /// Emoji name, e.g. `thumbs_up`.
        symbol: String,
    },
}

impl Notification {
    /// Creates a public reply.
    pub fn public(location: &LocationKey, content: impl Into<String>) -> Self {
        Self::PublicReply {
            location: location.clone(),
            content: content.into(),
        }
    }

    /// Creates a private reply.
    pub fn private(recipient: &UserId, content: impl Into<String>) -> Self {
        Self::PrivateReply {
            recipient: recipient.clone(),
            content: content.into(),
        }
    }

    /// Creates a reaction.
    pub fn reaction(target: MessageId, symbol: impl Into<String>) -> Self {
        Self::Reaction {
            target,
            symbol: symbol.into(),
        }
    }

    /// Text content, if this notification carries any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::PublicReply { content, .. } | Self::PrivateReply { content, .. } => {
                Some(content)
            }
            Self::Reaction { .. } => None,
        }
    }
}
