// ── Query builder ──
//
// Pure construction of the four GraphQL documents fetched every cycle.
// The date is always passed in; nothing here reads the clock.

use chrono::NaiveDate;
use serde::Serialize;
use strum::{Display, EnumIter};

/// Number of events the future query returns, today included.
pub const FORECAST_WINDOW: usize = 7;

/// The four query families fetched in one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QueryFamily {
    Info,
    Today,
    List,
    Future,
}

/// A ready-to-send query document tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    pub family: QueryFamily,
    pub body: String,
}

/// All four documents for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    pub info: QueryDocument,
    pub today: QueryDocument,
    pub list: QueryDocument,
    pub future: QueryDocument,
}

impl QuerySet {
    /// Build every document for `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            info: info_query(),
            today: today_query(date),
            list: list_query(),
            future: future_query(date),
        }
    }
}

/// Events are stored at midnight UTC; filters match that timestamp.
fn day_filter(date: NaiveDate) -> String {
    format!("{}T00:00:00+00:00", date.format("%Y-%m-%d"))
}

/// Household attributes, balances, and the active roster.
pub fn info_query() -> QueryDocument {
    QueryDocument {
        family: QueryFamily::Info,
        body: r"query MyQuery {
  eetschema_group {
    city
    address
    active
    default_status
    name
    summary(order_by: {}) {
      payed_total
      user_id
    }
    users_in_groups(where: {active: {_eq: true}}) {
      order
      user {
        name
        id
      }
    }
  }
}"
        .to_owned(),
    }
}

/// The event for `date` with every active resident's answer.
pub fn today_query(date: NaiveDate) -> QueryDocument {
    let filter = day_filter(date);
    QueryDocument {
        family: QueryFamily::Today,
        body: format!(
            r#"query MyQuery {{
  eetschema_event(where: {{start_date: {{_eq: "{filter}"}}}}) {{
    start_date
    open
    description
    event_attendees_all_users(where: {{active: {{_eq: true}}}}, order_by: {{order: asc}}) {{
      status
      number_guests
      user {{
        name
        id
      }}
    }}
  }}
}}"#
        ),
    }
}

/// Unchecked, active shopping-list items.
pub fn list_query() -> QueryDocument {
    QueryDocument {
        family: QueryFamily::List,
        body: r"query MyQuery {
  eetschema_list(where: {checked: {_eq: false}, active: {_eq: true}}) {
    text
    checked
  }
}"
        .to_owned(),
    }
}

/// The next [`FORECAST_WINDOW`] events from `date` inclusive, ascending.
pub fn future_query(date: NaiveDate) -> QueryDocument {
    let filter = day_filter(date);
    QueryDocument {
        family: QueryFamily::Future,
        body: format!(
            r#"query MyQuery {{
  eetschema_event(
    order_by: {{start_date: asc}}
    where: {{start_date: {{_gte: "{filter}"}}}}
    limit: {FORECAST_WINDOW}
  ) {{
    start_date
    event_attendees_all_users(where: {{active: {{_eq: true}}}}, order_by: {{order: asc}}) {{
      user {{
        name
        id
      }}
      status
      number_guests
    }}
  }}
}}"#
        ),
    }
}
