//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `rota-store-sqlite`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::snapshot::RosterSnapshot;

/// Persistence for roster snapshots, one per year.
///
/// Snapshots are opaque to the store: whatever is saved must come back from
/// [`load`](RosterStore::load) unchanged apart from `saved_at`.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace the snapshot for `snapshot.year`. Returns the snapshot as stored,
  /// with `saved_at` set by the store.
  fn save(
    &self,
    snapshot: RosterSnapshot,
  ) -> impl Future<Output = Result<RosterSnapshot, Self::Error>> + Send + '_;

  /// The stored snapshot for `year`, or `None` if nothing was ever saved.
  fn load(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Option<RosterSnapshot>, Self::Error>> + Send + '_;

  /// Years with a stored snapshot, ascending.
  fn years(&self) -> impl Future<Output = Result<Vec<i32>, Self::Error>> + Send + '_;
}
