//! # Taskdeck API
//!
//! The REST boundary of the admin core. The backend is an external
//! collaborator; this crate decodes its `{ success, data, message? }`
//! envelope into typed models exactly once and exposes the result behind the
//! [`backend::AccessBackend`] trait so workflows never touch HTTP directly.
//!
//! - [`envelope`]: response envelope decoding
//! - [`error`]: API error surface
//! - [`dto`]: request payloads
//! - [`backend`]: the `AccessBackend` trait seam
//! - [`client`]: the `reqwest`-based implementation

pub mod backend;
pub mod client;
pub mod dto;
pub mod envelope;
pub mod error;

pub use backend::AccessBackend;
pub use client::ApiClient;
pub use dto::ManagerTier;
pub use envelope::ApiEnvelope;
pub use error::{ApiError, ApiErrorKind};
