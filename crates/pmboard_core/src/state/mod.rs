//! In-memory board state and its pure transition function.
//!
//! # Responsibility
//! - Hold the three record collections plus the `loading`/`error` flags.
//! - Define the closed set of state transitions (`Action`).
//!
//! # Invariants
//! - `reduce` performs no I/O and never panics.
//! - Actions are applied strictly in dispatch order.

mod reducer;

pub use reducer::{reduce, Action};

use crate::model::employee::Employee;
use crate::model::project::Project;
use crate::model::task::Task;
use serde::Serialize;

/// Snapshot of everything views render from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityState {
    pub employees: Vec<Employee>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    /// True only while a mutation is in flight.
    pub loading: bool,
    /// Latest mutation failure message; overwritten by the next failure.
    pub error: Option<String>,
}
