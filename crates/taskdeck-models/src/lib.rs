//! # Taskdeck Models
//!
//! Domain types for the Taskdeck admin core. Everything the backend sends
//! crosses into these types exactly once, at the API boundary; internal logic
//! never re-derives optional fields from loose JSON.
//!
//! - [`ids`]: strongly-typed ID newtypes (opaque backend strings)
//! - [`value_types`]: validated value types (email)
//! - [`roles`]: role keys, role records, role-key validation
//! - [`permissions`]: permission values (fail-closed) and access modules
//! - [`users`]: the user entity
//! - [`catalog`]: companies, brands, task types, and brand assignments

pub mod catalog;
pub mod ids;
pub mod permissions;
pub mod roles;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root
pub use catalog::{Brand, BrandAssignment, Company, TaskType};
pub use ids::{BrandId, CompanyId, ModuleId, TaskTypeId, UserId};
pub use permissions::{AccessModule, PermissionSet, PermissionValue, RoleDefaults};
pub use roles::{Role, RoleKey};
pub use users::User;
pub use value_types::Email;
