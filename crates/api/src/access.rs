//! Role-based route access.
//!
//! A declarative table of the route prefixes each role may reach. Handlers
//! still gate themselves with the `AuthUser` / `StaffUser` extractors; this
//! table is the outer fence applied by the auth middleware.

use lingkod_db::entities::user::UserRole;

/// Route prefixes reachable by barangay secretaries.
const SECRETARY_PREFIXES: &[&str] = &[
    "/auth",
    "/profile",
    "/reports",
    "/notifications",
    "/dashboard",
    "/barangays",
    "/settings",
];

/// Whether a role may reach a path at all.
///
/// Staff can reach every route; secretaries only the prefixes above.
#[must_use]
pub fn is_allowed(role: UserRole, path: &str) -> bool {
    match role {
        UserRole::MlgooStaff => true,
        UserRole::BarangaySecretary => SECRETARY_PREFIXES
            .iter()
            .any(|prefix| matches_prefix(path, prefix)),
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_reaches_everything() {
        assert!(is_allowed(UserRole::MlgooStaff, "/users"));
        assert!(is_allowed(UserRole::MlgooStaff, "/logs"));
        assert!(is_allowed(UserRole::MlgooStaff, "/reports/abc"));
    }

    #[test]
    fn test_secretary_reaches_own_routes() {
        assert!(is_allowed(UserRole::BarangaySecretary, "/reports"));
        assert!(is_allowed(UserRole::BarangaySecretary, "/reports/abc/comments"));
        assert!(is_allowed(UserRole::BarangaySecretary, "/profile"));
        assert!(is_allowed(UserRole::BarangaySecretary, "/dashboard"));
    }

    #[test]
    fn test_secretary_blocked_from_admin_routes() {
        assert!(!is_allowed(UserRole::BarangaySecretary, "/users"));
        assert!(!is_allowed(UserRole::BarangaySecretary, "/users/abc/approve"));
        assert!(!is_allowed(UserRole::BarangaySecretary, "/logs"));
    }

    #[test]
    fn test_prefix_match_is_segment_aware() {
        // "/reportsx" must not match the "/reports" prefix
        assert!(!is_allowed(UserRole::BarangaySecretary, "/reportsx"));
        assert!(!is_allowed(UserRole::BarangaySecretary, "/usersx"));
    }
}
