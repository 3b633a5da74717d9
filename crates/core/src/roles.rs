//! Well-known role name constants.
//!
//! These must match the seed values accepted by the `users.role` check
//! constraint in the initial migration.

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Staff roles are exempt from all penalty effects. Their incomplete
/// transaction count still increments for audit visibility.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPER_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_SUPER_ADMIN));
        assert!(!is_staff(ROLE_USER));
        assert!(!is_staff("moderator"));
    }
}
