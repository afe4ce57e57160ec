//! # Taskdeck Config
//!
//! Configuration types for the Taskdeck admin tools, loaded from environment
//! variables:
//!
//! - [`api`]: backend API connection settings
//! - [`session`]: operator session settings (acting user)
//!
//! # Example
//!
//! ```ignore
//! use taskdeck_config::{ApiConfig, SessionConfig};
//!
//! let api_config = ApiConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! ```

pub mod api;
pub mod session;

// Re-export commonly used types at crate root
pub use api::ApiConfig;
pub use session::SessionConfig;
