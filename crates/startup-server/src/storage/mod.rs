//! Storage layer
//!
//! Uses SQLite (embedded) so the whole catalog lives in one file.

pub mod db;

pub use db::Database;
