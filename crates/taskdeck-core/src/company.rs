//! Company key normalization and company profiles.
//!
//! Two company profiles carry special behavior: an "Impex"-style company
//! restricts the visible role set to the MD/OB management chain, and a
//! "Speed E Com"-style company restricts it to the SBM/RM/AM chain. The
//! normalized key `speedecom` additionally bypasses the task-type allow-list
//! and enables the bulk brand-creation flow.

use taskdeck_models::RoleKey;

/// Normalized company key used by the `speedecom` special cases.
pub const SPEEDECOM_KEY: &str = "speedecom";

/// The three task types auto-assigned by the bulk brand-creation flow when a
/// company has no configured allow-list.
pub const BULK_FALLBACK_TASK_TYPE_NAMES: [&str; 3] =
    ["Meeting Pending", "CP Pending", "Recharge Negative"];

/// Normalize a company name into a comparison key: lowercase, all whitespace
/// stripped. `"Speed E Com "` and `"speedecom"` normalize identically.
pub fn normalize_company_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Domain-specific company profiles that restrict which roles appear on the
/// assignment and access pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyProfile {
    /// "Impex" companies: MD/OB management chain only.
    Impex,
    /// "Speed E Com" / "Speed Eom" companies: SBM/RM/AM chain only.
    SpeedEcom,
    /// No role restriction.
    Other,
}

impl CompanyProfile {
    pub fn detect(company_name: &str) -> Self {
        let key = normalize_company_key(company_name);
        if key.contains("impex") {
            Self::Impex
        } else if key.contains("speed") && (key.contains("com") || key.contains("eom")) {
            Self::SpeedEcom
        } else {
            Self::Other
        }
    }

    /// The roles shown for this profile, or `None` when unrestricted.
    pub fn role_filter(&self) -> Option<&'static [RoleKey]> {
        match self {
            Self::Impex => Some(&[
                RoleKey::MdManager,
                RoleKey::ObManager,
                RoleKey::Manager,
                RoleKey::Assistant,
            ]),
            Self::SpeedEcom => Some(&[RoleKey::Sbm, RoleKey::Rm, RoleKey::Am]),
            Self::Other => None,
        }
    }
}

/// Whether a company bypasses the task-type allow-list entirely.
pub fn is_task_type_bypass(company_name: &str) -> bool {
    normalize_company_key(company_name) == SPEEDECOM_KEY
}
