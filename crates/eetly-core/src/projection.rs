// ── Status projection ──
//
// Pure derivation of per-resident day projections, the today aggregate,
// and the assembled snapshot. No I/O; the same records always give the
// same snapshot.

use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::{
    AttendanceRecord, DayProjection, ForecastView, HouseholdInfoView, PrimaryCook, ResidentId,
    ShoppingListView, Snapshot, StatusToken, TODAY_LABEL, TodayView,
};
use crate::normalize::{FutureRecords, Household, ShoppingItem, TodayRecords};
use crate::roster::Roster;

/// Signed attendance signal for one status and guest count.
///
/// `cook` is `1 + guests`, `eat_only` and `got_groceries` are
/// `-1 - guests`, `not_attending` is `0`. No answer, `dont_know_yet`,
/// and unrecognized tokens give `None`.
pub fn status_code(status: Option<&StatusToken>, guests: u32) -> Option<i32> {
    let guests = i32::try_from(guests).unwrap_or(i32::MAX);
    match status? {
        StatusToken::Cook => Some(1_i32.saturating_add(guests)),
        StatusToken::EatOnly | StatusToken::GotGroceries => Some((-1_i32).saturating_sub(guests)),
        StatusToken::NotAttending => Some(0),
        StatusToken::DontKnowYet | StatusToken::Unknown(_) => None,
    }
}

/// Display text for a status: the raw token, or `None` when there is no answer.
pub fn day_text(status: Option<&StatusToken>) -> Option<String> {
    match status? {
        StatusToken::DontKnowYet => None,
        other => Some(other.as_str().to_owned()),
    }
}

/// `text` with `" + n"` appended when a present resident brings guests.
fn with_guests(text: &str, status: Option<&StatusToken>, guests: u32) -> String {
    if guests > 0 && status.is_some_and(StatusToken::is_present) {
        format!("{text} + {guests}")
    } else {
        text.to_owned()
    }
}

/// Project one resident's day. A missing record counts as no answer.
pub fn project_day(
    resident_id: &ResidentId,
    date: NaiveDate,
    record: Option<&AttendanceRecord>,
) -> DayProjection {
    let status = record.and_then(|r| r.status.clone());
    let guests = record.map_or(0, |r| r.guests);
    let text = day_text(status.as_ref());
    let guest_text = text
        .as_deref()
        .map(|t| with_guests(t, status.as_ref(), guests));

    DayProjection {
        resident_id: resident_id.clone(),
        date,
        status_code: status_code(status.as_ref(), guests),
        status,
        text,
        guest_text,
        guests,
    }
}

/// Build the today aggregate over every roster resident.
///
/// Residents without a record for today land in `unknown`. When nothing
/// is scheduled the view is closed and everyone is unknown.
pub fn project_today(roster: &Roster, today: &TodayRecords) -> TodayView {
    let records = today
        .event
        .as_ref()
        .map(|ev| index_by_resident(&ev.attendance))
        .unwrap_or_default();

    let mut view = TodayView {
        date: today.date,
        cook: PrimaryCook::Nobody,
        eating: Vec::new(),
        shopping: Vec::new(),
        not_eating: Vec::new(),
        unknown: Vec::new(),
        total_eaters: 0,
        food: today.event.as_ref().and_then(|ev| ev.description.clone()),
        open: today.event.as_ref().is_some_and(|ev| ev.open),
    };

    let mut cooks = Vec::new();
    for resident in roster.residents() {
        let record = records.get(&resident.id).copied();
        let status = record.and_then(|r| r.status.as_ref());
        let guests = record.map_or(0, |r| r.guests);
        let label = with_guests(&resident.name, status, guests);

        match status {
            Some(StatusToken::Cook) => {
                cooks.push(resident.name.clone());
                view.eating.push(label);
                view.total_eaters = view.total_eaters.saturating_add(guests.saturating_add(1));
            }
            Some(StatusToken::EatOnly) => {
                view.eating.push(label);
                view.total_eaters = view.total_eaters.saturating_add(guests.saturating_add(1));
            }
            Some(StatusToken::GotGroceries) => {
                view.shopping.push(label);
                view.total_eaters = view.total_eaters.saturating_add(guests.saturating_add(1));
            }
            Some(StatusToken::NotAttending) => view.not_eating.push(resident.name.clone()),
            Some(StatusToken::DontKnowYet | StatusToken::Unknown(_)) | None => {
                view.unknown.push(resident.name.clone());
            }
        }
    }

    view.cook = match cooks.len() {
        0 => PrimaryCook::Nobody,
        1 => cooks
            .pop()
            .map_or(PrimaryCook::Nobody, PrimaryCook::Resident),
        _ => PrimaryCook::Multiple,
    };
    view
}

/// Build one forecast per roster resident over the future window.
///
/// `today` is labelled [`TODAY_LABEL`], other dates by weekday name. If
/// two events share a label, the earlier one is kept.
pub fn project_forecasts(
    roster: &Roster,
    future: &FutureRecords,
    today: NaiveDate,
) -> IndexMap<ResidentId, ForecastView> {
    let days: Vec<(String, NaiveDate, HashMap<&ResidentId, &AttendanceRecord>)> = future
        .days
        .iter()
        .map(|d| (day_label(d.date, today), d.date, index_by_resident(&d.attendance)))
        .collect();

    roster
        .residents()
        .iter()
        .map(|resident| {
            let mut projections = IndexMap::new();
            for (label, date, records) in &days {
                if projections.contains_key(label) {
                    continue;
                }
                let record = records.get(&resident.id).copied();
                projections.insert(label.clone(), project_day(&resident.id, *date, record));
            }
            let view = ForecastView {
                resident_id: resident.id.clone(),
                name: resident.name.clone(),
                days: projections,
            };
            (resident.id.clone(), view)
        })
        .collect()
}

/// Assemble every view for one cycle.
pub fn assemble_snapshot(
    date: NaiveDate,
    roster: &Roster,
    household: &Household,
    today: &TodayRecords,
    list: &[ShoppingItem],
    future: &FutureRecords,
) -> Snapshot {
    let info = HouseholdInfoView {
        name: household.name.clone(),
        city: household.city.clone(),
        address: household.address.clone(),
        active: household.active,
        default_status: household.default_status.clone(),
        residents: roster.names(),
        balances: household.balances.clone(),
    };

    let shopping_list = ShoppingListView {
        items: list
            .iter()
            .filter(|item| !item.checked)
            .map(|item| item.text.clone())
            .collect(),
    };

    Snapshot {
        date,
        info,
        today: project_today(roster, today),
        shopping_list,
        forecasts: project_forecasts(roster, future, date),
    }
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        TODAY_LABEL.to_owned()
    } else {
        date.format("%A").to_string()
    }
}

/// First record per resident wins.
fn index_by_resident(records: &[AttendanceRecord]) -> HashMap<&ResidentId, &AttendanceRecord> {
    let mut map = HashMap::with_capacity(records.len());
    for r in records {
        map.entry(&r.resident_id).or_insert(r);
    }
    map
}
