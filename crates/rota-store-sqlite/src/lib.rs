//! SQLite backend for the rota roster store.
//!
//! Database calls run on the [`tokio_rusqlite`] connection thread, off the
//! async runtime. Each year's snapshot is one row holding the roster as JSON.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
