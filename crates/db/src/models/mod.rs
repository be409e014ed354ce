//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes that resource supports

pub mod company;
pub mod credit_transaction;
pub mod lead;
pub mod moderation_log;
pub mod notification;
pub mod payout;
pub mod purchase;
pub mod scout;
