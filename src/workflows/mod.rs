//! Page workflows.
//!
//! Each workflow mirrors one admin page: it owns the page's loaded snapshot,
//! its in-flight flags, and the operations the page exposes. Workflows are
//! generic over [`taskdeck_api::AccessBackend`] so they run against the HTTP
//! client in production and an in-memory fake in tests.

pub mod access_control;
pub mod assignment;
pub mod events;

pub use access_control::AccessControlPage;
pub use assignment::{AssignPage, PageState};
pub use events::{AssignmentChanged, EventBus};
