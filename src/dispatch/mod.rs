//! Event dispatch.
//!
//! The [`Dispatcher`] is the bot's brain: it takes one [`Event`] at a time,
//! classifies public messages with its [`CommandParser`], applies the
//! command to the collective at the message's location, and returns the
//! [`Notification`]s the transport should deliver.
//!
//! # Error handling
//!
//! [`Dispatcher::handle`] never fails. Every [`CollectiveError`] a command
//! runs into is turned into exactly one reply explaining the problem. A few
//! requests that make no sense are answered with silence instead (leaving or
//! closing where there is no collective, or where the sender isn't a member).
//!
//! # Example
//!
//! ```rust
//! use coffeebot::{Config, Dispatcher, Event, LocationKey, MessageId, PublicMessage, UserId};
//!
//! let mut bot = Dispatcher::new(Config::default()).unwrap();
//! let replies = bot.handle(&Event::PublicMessage(PublicMessage {
//!     id: MessageId(1),
//!     location: LocationKey::new("coffee", "brew"),
//!     sender: UserId::new("alice"),
//!     sender_is_self: false,
//!     mentions_bot: true,
//!     content: "@**coffeebot** init".to_string(),
//! }));
//! assert_eq!(replies.len(), 1);
//! ```

pub mod replies;

use tracing::{debug, info, instrument, trace};

use crate::clock::{Clock, SystemClock};
use crate::collective::{Closer, CollectiveRegistry, JoinOutcome, LeaveOutcome};
use crate::command::{Command, CommandParser, COMMAND_TABLE};
use crate::config::Config;
use crate::election::{MakerChooser, RandomChooser};
use crate::error::{self, CollectiveError};
use crate::event::{Event, Notification, PrivateMessage, PublicMessage};
use crate::types::{Timestamp, UserId};

/// Routes chat events to collectives.
///
/// The dispatcher owns the [`CollectiveRegistry`]; nothing else mutates it.
/// Events must be handled one at a time, in arrival order, which `&mut self`
/// enforces.
pub struct Dispatcher {
    config: Config,
    mention: String,
    help_text: String,
    parser: CommandParser,
    registry: CollectiveRegistry,
    chooser: Box<dyn MakerChooser>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("collectives", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with a random maker election and the system clock.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configuration is invalid (see
    /// [`Config::validate`]).
    pub fn new(config: Config) -> error::Result<Self> {
        config.validate()?;

        let mention = config.mention();
        let parser = CommandParser::new(&mention, COMMAND_TABLE)?;
        let registry = CollectiveRegistry::new(config.capacity, config.timeout);

        info!(
            bot = %config.bot_name,
            capacity = config.capacity,
            timeout_secs = config.timeout.as_secs(),
            "Dispatcher ready"
        );

        Ok(Self {
            help_text: config.help_text(),
            mention,
            parser,
            registry,
            chooser: Box::new(RandomChooser::new()),
            clock: Box::new(SystemClock),
            config,
        })
    }

    /// Replaces the maker election strategy.
    pub fn with_chooser(mut self, chooser: impl MakerChooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    /// Replaces the clock used for `Init` and `State`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The configuration this dispatcher was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the tracked collectives.
    #[inline]
    pub fn registry(&self) -> &CollectiveRegistry {
        &self.registry
    }

    /// Handles one event and returns the notifications to deliver.
    #[instrument(skip_all, fields(kind = event.kind()))]
    pub fn handle(&mut self, event: &Event) -> Vec<Notification> {
        match event {
            Event::Heartbeat { now } => self.handle_heartbeat(*now),
            Event::PrivateMessage(message) => self.handle_private_message(message),
            Event::PublicMessage(message) => self.handle_public_message(message),
        }
    }

    fn handle_heartbeat(&mut self, now: Timestamp) -> Vec<Notification> {
        let timed_out = self.registry.sweep_stale(now, self.chooser.as_mut());
        timed_out
            .into_iter()
            .map(|(location, collective)| {
                Notification::public(
                    location,
                    replies::timed_out(collective.maker(), &self.mention),
                )
            })
            .collect()
    }

    // Coffee is organized in the open; private messages only get the manual.
    fn handle_private_message(&self, message: &PrivateMessage) -> Vec<Notification> {
        if message.sender_is_self {
            trace!("Ignoring own private message");
            return Vec::new();
        }
        vec![Notification::private(&message.sender, self.help_text.clone())]
    }

    fn handle_public_message(&mut self, message: &PublicMessage) -> Vec<Notification> {
        if message.sender_is_self {
            trace!("Ignoring own message");
            return Vec::new();
        }
        if !message.mentions_bot {
            trace!("Ignoring message not addressed to the bot");
            return Vec::new();
        }

        let command = self.parser.parse(&message.content);
        match self.execute(command, message) {
            Ok(notifications) => notifications,
            // Only members may leave or close; anyone else is ignored
            Err(CollectiveError::NotAMember(user)) => {
                debug!(command = %command, user = %user, "Non-member ignored");
                Vec::new()
            }
            Err(err) => {
                debug!(
                    command = %command,
                    user = %message.sender,
                    error = %err,
                    "Command refused"
                );
                vec![self.reply_for(command, &err, message)]
            }
        }
    }

    /// Applies `command`, sent in `message`, to the collective at the
    /// message's location.
    ///
    /// This is the part of [`handle`](Self::handle) that can fail; `handle`
    /// turns the error into a reply, or into silence for `NotAMember`.
    pub(crate) fn execute(
        &mut self,
        command: Command,
        message: &PublicMessage,
    ) -> Result<Vec<Notification>, CollectiveError> {
        match command {
            Command::Init => self.init(message),
            Command::Join => self.join(message),
            Command::Leave => self.leave(message),
            Command::Close => self.close(message),
            Command::Ping => self.ping(message),
            Command::State => self.state(message),
            Command::Love => Ok(self.love(message)),
            Command::Unrecognized => Err(CollectiveError::Unrecognized),
        }
    }

    fn init(&mut self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let now = self.clock.now();
        let collective =
            self.registry
                .try_init(message.location.clone(), message.sender.clone(), now)?;

        Ok(vec![Notification::public(
            &message.location,
            replies::opened(&self.mention, collective.capacity()),
        )])
    }

    fn join(&mut self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let collective = self
            .registry
            .get_mut(&message.location)
            .ok_or_else(|| CollectiveError::NoCollectiveHere(message.location.clone()))?;

        let outcome = collective.join(message.sender.clone(), self.chooser.as_mut())?;
        debug!(
            collective_id = %collective.id(),
            user = %message.sender,
            members = collective.len(),
            "Member joined"
        );

        let mut notifications = vec![Notification::reaction(message.id, replies::ACK_SYMBOL)];
        if let JoinOutcome::Filled { maker } = outcome {
            info!(collective_id = %collective.id(), maker = %maker, "Collective full");
            notifications.push(Notification::public(
                &message.location,
                replies::maker_chosen(Some(&maker), &self.mention),
            ));
        }
        Ok(notifications)
    }

    fn leave(&mut self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let collective = match self.registry.get_mut(&message.location) {
            Some(collective) => collective,
            None => return Ok(Vec::new()),
        };

        let outcome = collective.leave(&message.sender)?;
        debug!(
            collective_id = %collective.id(),
            user = %message.sender,
            members = collective.len(),
            "Member left"
        );

        let mut notifications = vec![Notification::reaction(message.id, replies::ACK_SYMBOL)];
        if outcome == LeaveOutcome::Drained {
            self.registry.evict(&message.location);
            notifications.push(Notification::public(
                &message.location,
                replies::disbanded(),
            ));
        }
        Ok(notifications)
    }

    fn close(&mut self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let collective = match self.registry.get_mut(&message.location) {
            Some(collective) => collective,
            None => return Ok(Vec::new()),
        };

        let maker = collective
            .close(Closer::Member(&message.sender), self.chooser.as_mut())?
            .cloned();
        info!(
            collective_id = %collective.id(),
            closed_by = %message.sender,
            maker = %maker.as_ref().map(UserId::as_str).unwrap_or_default(),
            "Collective closed"
        );

        Ok(vec![Notification::public(
            &message.location,
            replies::maker_chosen(maker.as_ref(), &self.mention),
        )])
    }

    fn ping(&self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let collective = self
            .registry
            .get(&message.location)
            .ok_or_else(|| CollectiveError::NoCollectiveHere(message.location.clone()))?;
        if !collective.is_closed() {
            return Err(CollectiveError::StillOpen);
        }
        if collective.maker() != Some(&message.sender) {
            return Err(CollectiveError::not_authorized(&message.sender, "ping"));
        }

        Ok(vec![Notification::public(
            &message.location,
            replies::coffee_ready(&collective.roster_mentions()),
        )])
    }

    fn state(&self, message: &PublicMessage) -> Result<Vec<Notification>, CollectiveError> {
        let collective = self
            .registry
            .get(&message.location)
            .ok_or_else(|| CollectiveError::NoCollectiveHere(message.location.clone()))?;

        let snapshot = collective.describe(self.clock.now());
        Ok(vec![Notification::public(
            &message.location,
            snapshot.to_string(),
        )])
    }

    // Either a public message or a handful of distinct heart reactions.
    fn love(&mut self, message: &PublicMessage) -> Vec<Notification> {
        let symbols = replies::LOVE_SYMBOLS;

        if self.chooser.choose(2) == 0 {
            let pick = self.chooser.choose(symbols.len() + 1);
            let content = match pick.checked_sub(1) {
                Some(index) => format!(":{}:", symbols[index]),
                None => replies::CHEER.to_string(),
            };
            return vec![Notification::public(&message.location, content)];
        }

        // Partial Fisher-Yates: the first `count` slots end up a uniform sample
        let count = 1 + self.chooser.choose(symbols.len());
        let mut deck = symbols.to_vec();
        for i in 0..count {
            let j = i + self.chooser.choose(deck.len() - i);
            deck.swap(i, j);
        }
        deck.truncate(count);

        deck.into_iter()
            .map(|symbol| Notification::reaction(message.id, symbol))
            .collect()
    }

    /// The single reply explaining why `command` failed with `err`.
    fn reply_for(
        &self,
        command: Command,
        err: &CollectiveError,
        message: &PublicMessage,
    ) -> Notification {
        let maker = self
            .registry
            .get(&message.location)
            .and_then(|collective| collective.maker());

        let content = match (command, err) {
            (_, CollectiveError::AlreadyOpen(_)) => replies::already_open(&self.mention),
            (Command::Ping, CollectiveError::NoCollectiveHere(_)) => replies::nothing_to_ping(),
            (Command::State, CollectiveError::NoCollectiveHere(_)) => replies::nothing_known(),
            (_, CollectiveError::NoCollectiveHere(_)) => replies::nothing_to_join(&self.mention),
            (Command::Join, CollectiveError::AlreadyClosed) => {
                replies::closed_to_joins(&self.mention)
            }
            (Command::Leave, CollectiveError::AlreadyClosed) => {
                replies::closed_to_leaves(maker)
            }
            (_, CollectiveError::AlreadyClosed) => replies::already_closed(),
            (_, CollectiveError::StillOpen) => replies::not_closed_yet(),
            (_, CollectiveError::AlreadyMember(_)) => replies::already_member(),
            (_, CollectiveError::NotAuthorized { .. }) => replies::maker_only(maker),
            // Non-members are filtered out in handle_public_message
            (_, CollectiveError::NotAMember(_)) | (_, CollectiveError::Unrecognized) => {
                replies::not_understood()
            }
        };

        Notification::public(&message.location, content)
    }
}
