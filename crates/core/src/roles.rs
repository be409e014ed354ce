//! Well-known role name constants.
//!
//! Roles are issued by the external identity provider and carried in the
//! access token's `role` claim.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SCOUT: &str = "scout";
pub const ROLE_COMPANY: &str = "company";
