//! Embedded SQLite store.
//!
//! One table per record kind, every row carrying the owning `user_id`. All
//! statements run on a dedicated worker thread (see [`Database`]); the
//! per-table modules under `repositories` add query methods to `Database` and
//! implement [`crate::records::RecordStore`] on top of them.

mod connection;
pub mod helpers;
pub(crate) mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
