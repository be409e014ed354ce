//! Request middleware: authentication and role extraction.

pub mod auth;
pub mod rbac;
