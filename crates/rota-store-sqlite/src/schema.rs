//! SQL schema for the rota SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Safe to run against an existing database.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One roster window per year. Saving replaces the row.
CREATE TABLE IF NOT EXISTS snapshots (
    year          INTEGER PRIMARY KEY,
    snapshot_json TEXT NOT NULL,   -- RosterSnapshot without saved_at
    saved_at      TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

PRAGMA user_version = 1;
";
