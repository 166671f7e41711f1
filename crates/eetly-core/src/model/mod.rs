// ── Domain model ──
//
// Flat records produced by the normalizer and the views derived from
// them. None of these types know about the wire format.

pub mod attendance;
pub mod resident;
pub mod views;

pub use attendance::{AttendanceRecord, StatusToken};
pub use resident::{Resident, ResidentId};
pub use views::{
    DayProjection, ForecastView, HouseholdInfoView, PrimaryCook, ShoppingListView, Snapshot,
    TODAY_LABEL, TodayView,
};
