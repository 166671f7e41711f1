// Wire types for the Eetlijst GraphQL schema.
//
// One struct tree per query family, matching the selection sets the
// core sends. Field order never matters; missing required keys fail
// deserialization so the core can report a malformed response.

use std::fmt;

use serde::{Deserialize, Deserializer};

// ── Shared ───────────────────────────────────────────────────────────

/// A user id as the API sends it. Older groups use integers, newer ones
/// strings; both are accepted and rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// One row of `event_attendees_all_users`.
#[derive(Debug, Clone, Deserialize)]
pub struct Attendee {
    pub user: User,
    /// Status token; `null` when the resident has not answered.
    #[serde(deserialize_with = "nullable")]
    pub status: Option<String>,
    /// Anything that is not an integer (usually `null`) decodes as `None`.
    #[serde(deserialize_with = "lenient_count")]
    pub number_guests: Option<i64>,
}

/// A selected key that may be `null` but must be present.
///
/// Plain `Option` fields treat a missing key as `None`; going through
/// `deserialize_with` makes serde report it as missing instead.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

// ── info ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct InfoData {
    pub eetschema_group: Vec<Group>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub city: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub address: Option<String>,
    pub active: bool,
    #[serde(deserialize_with = "nullable")]
    pub default_status: Option<String>,
    pub summary: Vec<BalanceEntry>,
    pub users_in_groups: Vec<Membership>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    pub user_id: UserId,
    /// Amount in cents.
    #[serde(deserialize_with = "nullable")]
    pub payed_total: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    #[serde(deserialize_with = "nullable")]
    pub order: Option<i64>,
    pub user: User,
}

/// The token check only selects the household header.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeData {
    pub eetschema_group: Vec<GroupHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupHeader {
    pub name: String,
    pub active: bool,
}

// ── today / future ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TodayData {
    pub eetschema_event: Vec<TodayEvent>,
}

/// The event for one day, as selected by the today query.
#[derive(Debug, Clone, Deserialize)]
pub struct TodayEvent {
    /// Timestamp such as `2024-06-15T00:00:00+00:00`.
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub open: Option<bool>,
    /// What is for dinner.
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    pub event_attendees_all_users: Vec<Attendee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FutureData {
    pub eetschema_event: Vec<FutureEvent>,
}

/// One day of the forecast window.
#[derive(Debug, Clone, Deserialize)]
pub struct FutureEvent {
    pub start_date: String,
    pub event_attendees_all_users: Vec<Attendee>,
}

// ── list ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    pub eetschema_list: Vec<ListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    pub text: String,
    pub checked: bool,
}
