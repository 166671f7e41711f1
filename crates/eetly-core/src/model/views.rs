// ── Derived views ──
//
// Everything a consumer reads. Rebuilt from scratch every cycle and
// published together as one `Snapshot`.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::attendance::StatusToken;
use super::resident::ResidentId;

/// Label used for the cycle's own date in a forecast.
pub const TODAY_LABEL: &str = "Today";

/// Lower and upper bound of the display bucket range.
pub const BUCKET_MIN: i32 = -5;
pub const BUCKET_MAX: i32 = 5;

/// One resident's derived state for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayProjection {
    pub resident_id: ResidentId,
    pub date: NaiveDate,
    pub status: Option<StatusToken>,
    /// Signed attendance signal; `None` means "no answer yet", which is
    /// different from `Some(0)` ("not attending").
    pub status_code: Option<i32>,
    /// Raw status token; `None` for `dont_know_yet` and missing answers.
    pub text: Option<String>,
    /// `text` with the guest count appended (`"cook + 2"`) when the
    /// resident brings guests.
    pub guest_text: Option<String>,
    pub guests: u32,
}

impl DayProjection {
    /// Status code saturated to the `[-5, 5]` display range.
    pub fn display_bucket(&self) -> Option<i32> {
        self.status_code.map(|c| c.clamp(BUCKET_MIN, BUCKET_MAX))
    }
}

/// The next seven days for one resident, in date order, keyed by day
/// label (`"Today"`, then weekday names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastView {
    pub resident_id: ResidentId,
    pub name: String,
    pub days: IndexMap<String, DayProjection>,
}

impl ForecastView {
    /// Today's projection, if the schedule has an event for today.
    pub fn today(&self) -> Option<&DayProjection> {
        self.days.get(TODAY_LABEL)
    }
}

/// Household-level cook for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryCook {
    Nobody,
    Resident(String),
    Multiple,
}

impl fmt::Display for PrimaryCook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nobody => f.write_str("Nobody"),
            Self::Resident(name) => f.write_str(name),
            Self::Multiple => f.write_str("Multiple People"),
        }
    }
}

impl Serialize for PrimaryCook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Aggregate over all residents for the current date.
///
/// Names in `eating` and `shopping` carry a `" + n"` suffix when the
/// resident brings guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub cook: PrimaryCook,
    pub eating: Vec<String>,
    pub shopping: Vec<String>,
    pub not_eating: Vec<String>,
    pub unknown: Vec<String>,
    /// Everyone at the table, guests included.
    pub total_eaters: u32,
    pub food: Option<String>,
    pub open: bool,
}

/// Unchecked, active shopping-list items in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingListView {
    pub items: Vec<String>,
}

impl ShoppingListView {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Static household attributes plus the current resident list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseholdInfoView {
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub default_status: Option<String>,
    pub residents: Vec<String>,
    /// Balance per resident, in cents.
    pub balances: IndexMap<ResidentId, i64>,
}

/// The unit of publication: every view from one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub info: HouseholdInfoView,
    pub today: TodayView,
    pub shopping_list: ShoppingListView,
    /// One forecast per roster resident, in roster order.
    pub forecasts: IndexMap<ResidentId, ForecastView>,
}

impl Snapshot {
    pub fn forecast(&self, id: &ResidentId) -> Option<&ForecastView> {
        self.forecasts.get(id)
    }

    /// Find a forecast by resident name (case-insensitive).
    pub fn forecast_by_name(&self, name: &str) -> Option<&ForecastView> {
        self.forecasts
            .values()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}
