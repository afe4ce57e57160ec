//! # Taskdeck Admin
//!
//! The admin core for a task-management web application: role-based access
//! control administration and brand/task-type assignment workflows over a
//! REST backend.
//!
//! ## Architecture
//!
//! The workspace splits the system along its seams:
//!
//! ```text
//! crates/
//! ├── taskdeck-models/   # domain types, typed-parsing boundary
//! ├── taskdeck-core/     # pure resolvers (hierarchy, visibility,
//! │                      # permission merge, assignment diffs)
//! ├── taskdeck-api/      # REST envelope decoding + AccessBackend client
//! └── taskdeck-config/   # environment configuration
//! src/
//! ├── workflows/         # page workflows and in-flight state machines
//! ├── cli/               # clap commands, dialoguer confirmations
//! ├── utils/             # error taxonomy
//! └── logging.rs         # tracing setup
//! ```
//!
//! The backend (permission storage, persistence, validation) is an external
//! collaborator reached through [`taskdeck_api::AccessBackend`]; nothing in
//! this repository owns persistent state. Workflows operate on snapshots
//! fetched per page load and re-fetch last-known-good state whenever a
//! mutation fails.
//!
//! ## Visibility model
//!
//! Two parallel reporting hierarchies are supported:
//!
//! ```text
//! admin ─► md_manager / ob_manager ─► manager ─► assistant
//! admin ─► sbm ─► rm ─► am
//! ```
//!
//! Which users an actor may see and manage is decided entirely by
//! [`taskdeck_core::visibility`]; permission checks are fail-closed
//! (no override means deny) in [`taskdeck_core::permissions`].

pub mod cli;
pub mod logging;
pub mod utils;
pub mod workflows;

// Re-export workspace crates for convenience
pub use taskdeck_api;
pub use taskdeck_config;
pub use taskdeck_core;
pub use taskdeck_models;
