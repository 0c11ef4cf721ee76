//! Entity store: canonical state plus the CRUD/status API.
//!
//! # Responsibility
//! - Own the board state and route every change through `state::reduce`.
//! - Persist the full rewritten collection after each dispatched change.
//! - Expose add/update/delete per record kind and task status transitions.
//!
//! # Invariants
//! - Ids are unique per collection; `add` refuses a caller id already in use.
//! - `update` can never change `id` or `created_at`.
//! - Deletes never cascade into other collections.
//! - `loading` is reset on every exit path of a mutation.

mod entity_store;
mod shared;

pub use entity_store::EntityStore;
pub use shared::SharedEntityStore;

use crate::model::entity::{EntityId, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Mutation failure surfaced to store callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A caller-supplied id is already taken in that collection.
    DuplicateId { kind: EntityKind, id: EntityId },
    /// A thread panicked while holding the shared store lock.
    Poisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { kind, id } => write!(f, "{kind} already contains id `{id}`"),
            Self::Poisoned => write!(f, "entity store lock poisoned by an earlier panic"),
        }
    }
}

impl Error for StoreError {}
