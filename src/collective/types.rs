//! Type definitions for collectives.
//!
//! A **collective** is a group of chat users who want coffee. It opens with
//! its leader as the only member, takes joins and leaves while open, and
//! elects a maker from its members when it closes.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::election::MakerChooser;
use crate::error::CollectiveError;
use crate::types::{CollectiveId, Timestamp, UserId};

/// Who is closing a collective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closer<'a> {
    /// A user asked for it; they must be a member.
    Member(&'a UserId),

    /// The bot itself (timeout sweep). No membership check.
    System,
}

/// Result of a successful [`Collective::join`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user joined and there is still room.
    Joined,

    /// The user took the last seat; the collective closed and elected `maker`.
    Filled {
        /// The elected maker.
        maker: UserId,
    },
}

/// Result of a successful [`Collective::leave`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The user left; others remain.
    Left,

    /// The last member left. The collective closed without a maker and
    /// should be evicted from its registry.
    Drained,
}

/// A coffee collective.
///
/// # Invariants
///
/// - `members.len() <= capacity`
/// - an open collective has no maker
/// - membership never changes after closing
/// - the leader, if any, is a member
///
/// Fields are private so these hold by construction.
#[derive(Clone, Debug)]
pub struct Collective {
    id: CollectiveId,
    leader: Option<UserId>,
    members: BTreeSet<UserId>,
    capacity: usize,
    created_at: Timestamp,
    timeout: Duration,
    closed: bool,
    maker: Option<UserId>,
}

impl Collective {
    /// Opens a collective led by `leader`, created now.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`; configuration validation rules this out.
    pub fn new(leader: UserId, capacity: usize, timeout: Duration) -> Self {
        Self::opened_at(leader, capacity, timeout, Timestamp::now())
    }

    /// Opens a collective led by `leader`, created at `now`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`.
    pub fn opened_at(leader: UserId, capacity: usize, timeout: Duration, now: Timestamp) -> Self {
        assert!(capacity >= 2, "collective capacity must be at least 2");
        let mut members = BTreeSet::new();
        members.insert(leader.clone());
        Self {
            id: CollectiveId::new(),
            leader: Some(leader),
            members,
            capacity,
            created_at: now,
            timeout,
            closed: false,
            maker: None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Adds `user` to the collective.
    ///
    /// Closes the collective and elects a maker when this join fills it.
    ///
    /// # Errors
    ///
    /// - `AlreadyClosed` if the collective is closed
    /// - `AlreadyMember` if `user` already belongs to it
    pub fn join(
        &mut self,
        user: UserId,
        chooser: &mut dyn MakerChooser,
    ) -> Result<JoinOutcome, CollectiveError> {
        if self.closed {
            return Err(CollectiveError::AlreadyClosed);
        }
        if self.members.contains(&user) {
            return Err(CollectiveError::AlreadyMember(user));
        }

        self.members.insert(user);

        if self.members.len() >= self.capacity {
            self.seal(chooser);
            let maker = self
                .maker
                .clone()
                .expect("a full collective always elects a maker");
            return Ok(JoinOutcome::Filled { maker });
        }

        Ok(JoinOutcome::Joined)
    }

    /// Removes `user` from the collective.
    ///
    /// If the leader leaves, the collective becomes leaderless. If the last
    /// member leaves, the collective closes with no maker.
    ///
    /// # Errors
    ///
    /// - `AlreadyClosed` if the collective is closed
    /// - `NotAMember` if `user` doesn't belong to it
    pub fn leave(&mut self, user: &UserId) -> Result<LeaveOutcome, CollectiveError> {
        if self.closed {
            return Err(CollectiveError::AlreadyClosed);
        }
        if !self.members.remove(user) {
            return Err(CollectiveError::NotAMember(user.clone()));
        }

        if self.leader.as_ref() == Some(user) {
            self.leader = None;
        }

        if self.members.is_empty() {
            self.mark_closed();
            return Ok(LeaveOutcome::Drained);
        }

        Ok(LeaveOutcome::Left)
    }

    /// Closes the collective, electing a maker if anyone is left in it.
    ///
    /// Returns the elected maker, or `None` if the collective was empty.
    ///
    /// # Errors
    ///
    /// - `AlreadyClosed` if the collective is closed
    /// - `NotAMember` if a [`Closer::Member`] doesn't belong to it
    pub fn close(
        &mut self,
        closer: Closer<'_>,
        chooser: &mut dyn MakerChooser,
    ) -> Result<Option<&UserId>, CollectiveError> {
        if self.closed {
            return Err(CollectiveError::AlreadyClosed);
        }
        if let Closer::Member(user) = closer {
            if !self.members.contains(user) {
                return Err(CollectiveError::NotAMember(user.clone()));
            }
        }

        self.seal(chooser);
        Ok(self.maker.as_ref())
    }

    /// Returns true if the collective is open and has outlived its timeout.
    pub fn is_stale(&self, now: Timestamp) -> bool {
        !self.closed && now.duration_since(self.created_at) >= self.timeout
    }

    fn seal(&mut self, chooser: &mut dyn MakerChooser) {
        if !self.members.is_empty() {
            self.elect_maker(chooser);
        }
        self.mark_closed();
    }

    fn elect_maker(&mut self, chooser: &mut dyn MakerChooser) {
        assert!(
            self.maker.is_none(),
            "collective {} elected a maker twice",
            self.id
        );
        let len = self.members.len();
        let index = chooser.choose(len);
        assert!(index < len, "chooser returned {} for {} members", index, len);
        self.maker = self.members.iter().nth(index).cloned();
    }

    fn mark_closed(&mut self) {
        assert!(!self.closed, "collective {} closed twice", self.id);
        self.closed = true;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Unique identifier of this collective.
    #[inline]
    pub fn id(&self) -> CollectiveId {
        self.id
    }

    /// The user who opened the collective, unless they left.
    #[inline]
    pub fn leader(&self) -> Option<&UserId> {
        self.leader.as_ref()
    }

    /// Current members, in `UserId` order.
    pub fn members(&self) -> impl Iterator<Item = &UserId> {
        self.members.iter()
    }

    /// Returns true if `user` is a member.
    pub fn contains(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nobody is in the collective.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Maximum number of members.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seats still available.
    #[inline]
    pub fn positions_left(&self) -> usize {
        self.capacity - self.members.len()
    }

    /// When the collective was opened.
    #[inline]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// How long the collective may stay open.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true once the collective has closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The elected maker, if the collective closed with members.
    #[inline]
    pub fn maker(&self) -> Option<&UserId> {
        self.maker.as_ref()
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Read-only projection of the collective for state reports.
    pub fn describe(&self, now: Timestamp) -> CollectiveSnapshot {
        let status = if self.closed {
            SnapshotStatus::Closed
        } else {
            let left = self
                .timeout
                .saturating_sub(now.duration_since(self.created_at));
            SnapshotStatus::Open {
                minutes_left: left.as_secs() / 60,
            }
        };

        CollectiveSnapshot {
            members: self.members.iter().cloned().collect(),
            positions_left: self.positions_left(),
            created_at: self.created_at,
            status,
            maker: self.maker.clone(),
        }
    }

    /// Every member as a mention, separated by spaces.
    ///
    /// # Panics
    ///
    /// Panics if the collective is still open.
    pub fn roster_mentions(&self) -> String {
        assert!(
            self.closed,
            "roster of collective {} requested while open",
            self.id
        );
        self.members
            .iter()
            .map(UserId::mention)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Open/closed part of a [`CollectiveSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// Still taking members.
    Open {
        /// Whole minutes until the timeout sweep closes it.
        minutes_left: u64,
    },

    /// Closed for good.
    Closed,
}

/// Point-in-time view of a collective, rendered for `State` requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectiveSnapshot {
    /// Members in `UserId` order.
    pub members: Vec<UserId>,

    /// Seats still available.
    pub positions_left: usize,

    /// When the collective was opened.
    pub created_at: Timestamp,

    /// Open (with time left) or closed.
    pub status: SnapshotStatus,

    /// The elected maker, if any.
    pub maker: Option<UserId>,
}

impl CollectiveSnapshot {
    /// Returns true if the collective was open when the snapshot was taken.
    pub fn is_open(&self) -> bool {
        matches!(self.status, SnapshotStatus::Open { .. })
    }
}

impl fmt::Display for CollectiveSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self.members.iter().map(UserId::as_str).collect();
        writeln!(f, "Members: {}", members.join(", "))?;
        writeln!(f, "Positions left: {}", self.positions_left)?;
        match DateTime::<Utc>::from_timestamp_millis(self.created_at.as_millis()) {
            Some(created) => writeln!(
                f,
                "Time created: {}",
                created.format("%A, %I:%M:%S %p UTC")
            )?,
            None => writeln!(f, "Time created: {}", self.created_at)?,
        }
        match self.status {
            SnapshotStatus::Closed => {
                if let Some(ref maker) = self.maker {
                    writeln!(f, "Maker: {}", maker)?;
                }
                write!(f, "Status: Closed")
            }
            SnapshotStatus::Open { minutes_left: 0 } => write!(f, "Status: Closing soon!"),
            SnapshotStatus::Open { minutes_left } => {
                write!(f, "Until timeout: {} minutes", minutes_left)
            }
        }
    }
}
