// ── Attendance records ──
//
// Flat per-resident, per-day attendance as produced by the normalizer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use strum::EnumString;

use super::resident::ResidentId;

/// A resident's answer for one day.
///
/// Tokens the API may add later parse as [`Unknown`](Self::Unknown)
/// instead of failing, carrying the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum StatusToken {
    Cook,
    EatOnly,
    GotGroceries,
    NotAttending,
    DontKnowYet,
    #[strum(default)]
    Unknown(String),
}

impl StatusToken {
    /// Parse a wire token. Never fails; unrecognized text becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match Self::from_str(raw) {
            Ok(token) => token,
            Err(_) => Self::Unknown(raw.to_owned()),
        }
    }

    /// The wire spelling of this token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cook => "cook",
            Self::EatOnly => "eat_only",
            Self::GotGroceries => "got_groceries",
            Self::NotAttending => "not_attending",
            Self::DontKnowYet => "dont_know_yet",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this status means the resident is at the table.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Cook | Self::EatOnly | Self::GotGroceries)
    }
}

impl fmt::Display for StatusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One resident's attendance for one date.
///
/// `status` is `None` when the API returned `null` (no answer yet).
/// `guests` is always non-negative; missing or non-integer counts are 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub resident_id: ResidentId,
    pub resident_name: String,
    pub date: NaiveDate,
    pub status: Option<StatusToken>,
    pub guests: u32,
}
