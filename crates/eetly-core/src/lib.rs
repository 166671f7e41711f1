// eetly-core: Polling and projection engine between eetly-api and consumers (CLI).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod normalize;
pub mod projection;
pub mod query;
pub mod roster;
pub mod store;
pub mod stream;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CycleEvent, CycleOutcome, CycleState};
pub use error::CoreError;
pub use query::{FORECAST_WINDOW, QueryFamily, QuerySet};
pub use roster::{Roster, RosterCheck, RosterDiff};
pub use store::{Published, SnapshotStore};
pub use stream::SnapshotStream;
pub use transport::QueryTransport;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AttendanceRecord, DayProjection, ForecastView, HouseholdInfoView, PrimaryCook, Resident,
    ResidentId, ShoppingListView, Snapshot, StatusToken, TODAY_LABEL, TodayView,
};
