//! Strongly-typed ID newtypes for domain entities.
//!
//! The backend hands out opaque string identifiers. These newtypes prevent
//! accidental misuse (e.g., passing a `BrandId` where a `UserId` is expected)
//! while staying transparent on the wire.
//!
//! # Example
//!
//! ```ignore
//! use taskdeck_models::ids::{UserId, BrandId};
//!
//! fn load_user(id: &UserId) { /* ... */ }
//!
//! let user_id = UserId::new("u-100");
//! let brand_id = BrandId::new("b-7");
//!
//! load_user(&user_id);   // OK
//! // load_user(&brand_id); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a strongly-typed ID newtype over the backend's string ids.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a backend identifier.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner String.
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier for a user.
    UserId
);

define_id!(
    /// Identifier for a permission module.
    ModuleId
);

define_id!(
    /// Identifier for a brand.
    BrandId
);

define_id!(
    /// Identifier for a task type.
    TaskTypeId
);

define_id!(
    /// Identifier for a company. Companies are keyed by name in most of the
    /// backend, so this frequently carries a name rather than a surrogate id.
    CompanyId
);
