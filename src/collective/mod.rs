//! Collective lifecycle.
//!
//! A **collective** is a group of people in one chat thread who want coffee.
//! Each collective has:
//! - A leader (whoever opened it; cleared if they leave)
//! - A set of members, bounded by a capacity
//! - A creation time and a timeout
//! - A maker, elected once when it closes
//!
//! # State machine
//!
//! ```text
//!   init ──► Open ──join (fills)──────────► Closed (maker elected)
//!             │ ▲                             ▲
//!             │ └─ join / leave (non-empty)   │
//!             ├──── close / timeout ──────────┘
//!             └──── leave (last member) ────► Closed, no maker, evicted
//! ```
//!
//! `Closed` is terminal. A closed collective stays in the
//! [`CollectiveRegistry`] until the next `init` at its location replaces it.

pub mod registry;
pub mod types;

pub use registry::CollectiveRegistry;
pub use types::{
    Closer, Collective, CollectiveSnapshot, JoinOutcome, LeaveOutcome, SnapshotStatus,
};
