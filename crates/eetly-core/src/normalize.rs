// ── Response normalizer ──
//
// Turns each family's nested `data` object into flat records. Each
// function only knows its own family. Empty result lists are valid;
// a missing key is a malformed response.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use eetly_api::types::{Attendee, FutureData, InfoData, ListData, TodayData};

use crate::error::CoreError;
use crate::model::{AttendanceRecord, Resident, ResidentId, StatusToken};
use crate::query::QueryFamily;
use crate::roster::Roster;

/// Household attributes from the info query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Household {
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub default_status: Option<String>,
    /// Balance per resident in cents, in API order.
    pub balances: IndexMap<ResidentId, i64>,
}

/// Normalized info query: household attributes and the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRecords {
    pub household: Household,
    pub roster: Roster,
}

/// Today's event, if the schedule has one for the requested date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayRecords {
    pub date: NaiveDate,
    pub event: Option<TodayEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayEvent {
    pub open: bool,
    pub description: Option<String>,
    pub attendance: Vec<AttendanceRecord>,
}

/// A shopping-list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub text: String,
    pub checked: bool,
}

/// Attendance for every day in the forecast window, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FutureRecords {
    pub days: Vec<DayRecords>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecords {
    pub date: NaiveDate,
    pub attendance: Vec<AttendanceRecord>,
}

fn decode<T: DeserializeOwned>(family: QueryFamily, data: serde_json::Value) -> Result<T, CoreError> {
    serde_json::from_value(data).map_err(|e| CoreError::malformed(family, e.to_string()))
}

/// Normalize the info query into household attributes and a roster.
pub fn normalize_info(data: serde_json::Value) -> Result<InfoRecords, CoreError> {
    let parsed: InfoData = decode(QueryFamily::Info, data)?;
    let group = parsed
        .eetschema_group
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::malformed(QueryFamily::Info, "no household group in response"))?;

    let residents = group
        .users_in_groups
        .into_iter()
        .map(|m| Resident {
            id: ResidentId::from(&m.user.id),
            name: m.user.name,
            ordinal: m.order.unwrap_or_default(),
        })
        .collect();

    let balances = group
        .summary
        .into_iter()
        .map(|b| (ResidentId::from(&b.user_id), b.payed_total.unwrap_or_default()))
        .collect();

    Ok(InfoRecords {
        household: Household {
            name: group.name,
            city: group.city,
            address: group.address,
            active: group.active,
            default_status: group.default_status,
            balances,
        },
        roster: Roster::new(residents),
    })
}

/// Normalize the today query for `date`.
///
/// Zero events is valid (nothing scheduled). When the API returns more
/// than one event for the day, the first one wins.
pub fn normalize_today(date: NaiveDate, data: serde_json::Value) -> Result<TodayRecords, CoreError> {
    let parsed: TodayData = decode(QueryFamily::Today, data)?;
    let event_count = parsed.eetschema_event.len();
    if event_count > 1 {
        debug!(event_count, "multiple events today, using the first");
    }

    let event = parsed.eetschema_event.into_iter().next().map(|ev| TodayEvent {
        // `open` is nullable; only an explicit `true` opens the list.
        open: ev.open.unwrap_or(false),
        description: ev.description,
        attendance: attendance_records(date, ev.event_attendees_all_users),
    });

    Ok(TodayRecords { date, event })
}

/// Normalize the shopping-list query.
pub fn normalize_list(data: serde_json::Value) -> Result<Vec<ShoppingItem>, CoreError> {
    let parsed: ListData = decode(QueryFamily::List, data)?;
    Ok(parsed
        .eetschema_list
        .into_iter()
        .map(|item| ShoppingItem {
            text: item.text,
            checked: item.checked,
        })
        .collect())
}

/// Normalize the future query into per-day attendance.
pub fn normalize_future(data: serde_json::Value) -> Result<FutureRecords, CoreError> {
    let parsed: FutureData = decode(QueryFamily::Future, data)?;
    let days = parsed
        .eetschema_event
        .into_iter()
        .map(|ev| {
            let date = parse_event_date(&ev.start_date).ok_or_else(|| {
                CoreError::malformed(
                    QueryFamily::Future,
                    format!("unparseable start_date {:?}", ev.start_date),
                )
            })?;
            Ok(DayRecords {
                date,
                attendance: attendance_records(date, ev.event_attendees_all_users),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    Ok(FutureRecords { days })
}

fn attendance_records(date: NaiveDate, attendees: Vec<Attendee>) -> Vec<AttendanceRecord> {
    attendees
        .into_iter()
        .map(|a| AttendanceRecord {
            resident_id: ResidentId::from(&a.user.id),
            resident_name: a.user.name,
            date,
            status: a.status.as_deref().map(StatusToken::parse),
            guests: a
                .number_guests
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
        })
        .collect()
}

/// Accepts RFC 3339 timestamps, naive timestamps, and bare dates.
fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
