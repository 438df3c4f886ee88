//! SQLite database module for the Shea Store engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
