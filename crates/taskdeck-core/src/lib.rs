//! # Taskdeck Core
//!
//! Pure domain logic for the Taskdeck admin core: no I/O, no ambient state.
//! Every resolver takes the acting user (via [`context::ActorContext`]) and
//! the data snapshot it operates on as explicit arguments, so all of it is
//! unit-testable with plain fixtures.
//!
//! - [`hierarchy`]: the assignable-role matrix and reporting-chain traversal
//! - [`visibility`]: which users an actor may see/manage
//! - [`permissions`]: effective permission merge (fail-closed)
//! - [`assignment`]: brand/task-type assignment diffs and constraints
//! - [`company`]: company key normalization and company profiles

pub mod assignment;
pub mod company;
pub mod context;
pub mod hierarchy;
pub mod permissions;
pub mod visibility;

pub use assignment::{AssignmentDiff, AssignmentError, compute_assignment_diff};
pub use company::CompanyProfile;
pub use context::ActorContext;
pub use hierarchy::{assignable_roles, may_assign_role, reporting_chain};
pub use permissions::{effective_permission, merge_template};
pub use visibility::visible_users;
