//! Query layer. Every function takes `&impl ConnectionTrait`, so the same
//! code runs against the pooled `DatabaseConnection` for plain reads and
//! against a `DatabaseTransaction` inside a coordinated write.

pub mod association;
pub mod menu;
pub mod role;
pub mod user;
