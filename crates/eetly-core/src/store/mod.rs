// ── Snapshot store ──
//
// Single-writer publication point for assembled snapshots.

mod snapshot_store;

pub use snapshot_store::{Published, SnapshotStore};
