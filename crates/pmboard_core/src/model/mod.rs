//! Domain records for the project board.
//!
//! # Responsibility
//! - Define the employee/project/task records and their persisted JSON shape.
//! - Define creation drafts and update patches for each record kind.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId` that never changes.
//! - `created_at` is stamped once; `updated_at` on every create and update.
//! - Cross-record ids are weak references and may dangle.
//!
//! # See also
//! - `crate::reference` for dereferencing weak references.

pub mod employee;
pub mod entity;
pub mod project;
pub mod task;
pub mod timestamp;
pub(crate) mod wire;
