//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20260801000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "platform_admin";
pub const ROLE_USER: &str = "USER";

/// Whether a role string grants platform-administrator capabilities.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
