//! `eetly forecast`: the seven-day grid per resident.

use eetly_core::{DayProjection, ForecastView, ResidentId, Snapshot, StatusToken};

use crate::error::CliError;
use crate::output;

use super::ViewContext;

fn cell(day: &DayProjection, ctx: &ViewContext) -> String {
    let text = day.guest_text.clone().unwrap_or_else(|| "-".into());
    match day.display_bucket() {
        Some(bucket) if ctx.display.custom_pictures => format!("{text} ({bucket})"),
        _ => text,
    }
}

/// Resident column: with `resident_units`, today's guests follow the name.
fn resident_label(forecast: &ForecastView, ctx: &ViewContext) -> String {
    let guests = forecast
        .today()
        .filter(|d| d.status.as_ref().is_some_and(StatusToken::is_present))
        .map_or(0, |d| d.guests);
    if ctx.display.resident_units && guests > 0 {
        format!("{} + {guests}", forecast.name)
    } else {
        forecast.name.clone()
    }
}

fn grid(forecasts: &[&ForecastView], ctx: &ViewContext) -> String {
    let mut header = vec!["Resident".to_owned()];
    if let Some(first) = forecasts.first() {
        header.extend(first.days.keys().cloned());
    }
    let rows = forecasts
        .iter()
        .map(|f| {
            let mut row = vec![resident_label(f, ctx)];
            row.extend(f.days.values().map(|d| cell(d, ctx)));
            row
        })
        .collect();
    output::render_grid(header, rows)
}

fn plain(forecasts: &[&ForecastView]) -> String {
    forecasts
        .iter()
        .flat_map(|f| {
            f.days.iter().map(move |(label, day)| {
                format!(
                    "{}\t{label}\t{}",
                    f.name,
                    day.text.as_deref().unwrap_or("-")
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the forecasts to show: everyone, or one resident by name or id.
fn select<'a>(
    snapshot: &'a Snapshot,
    resident: Option<&str>,
) -> Result<Vec<&'a ForecastView>, CliError> {
    let Some(wanted) = resident else {
        return Ok(snapshot.forecasts.values().collect());
    };
    snapshot
        .forecast_by_name(wanted)
        .or_else(|| snapshot.forecast(&ResidentId::from(wanted)))
        .map(|f| vec![f])
        .ok_or_else(|| CliError::ResidentNotFound {
            name: wanted.to_owned(),
            known: snapshot
                .forecasts
                .values()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

pub fn render(
    snapshot: &Snapshot,
    resident: Option<&str>,
    ctx: &ViewContext,
) -> Result<String, CliError> {
    let forecasts = select(snapshot, resident)?;
    Ok(output::render_single(
        ctx.format,
        forecasts.as_slice(),
        |f| grid(f, ctx),
        plain,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use eetly_config::DisplayOptions;
    use eetly_core::{HouseholdInfoView, PrimaryCook, ShoppingListView, TodayView};

    use super::*;
    use crate::cli::OutputFormat;

    fn day(date: NaiveDate, status: StatusToken, code: i32, guests: u32) -> DayProjection {
        let text = status.as_str().to_owned();
        DayProjection {
            resident_id: ResidentId::from("1"),
            date,
            status: Some(status),
            status_code: Some(code),
            guest_text: Some(if guests > 0 {
                format!("{text} + {guests}")
            } else {
                text.clone()
            }),
            text: Some(text),
            guests,
        }
    }

    fn snapshot() -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut anna = ForecastView {
            resident_id: ResidentId::from("1"),
            name: "Anna".into(),
            days: Default::default(),
        };
        anna.days
            .insert("Today".into(), day(date, StatusToken::EatOnly, 8, 7));
        anna.days.insert(
            "Tuesday".into(),
            day(date.succ_opt().unwrap(), StatusToken::Cook, 1, 0),
        );

        let mut snapshot = Snapshot {
            date,
            info: HouseholdInfoView {
                name: "Huize".into(),
                city: None,
                address: None,
                active: true,
                default_status: None,
                residents: vec!["Anna".into()],
                balances: Default::default(),
            },
            today: TodayView {
                date,
                cook: PrimaryCook::Nobody,
                eating: vec!["Anna + 7".into()],
                shopping: vec![],
                not_eating: vec![],
                unknown: vec![],
                total_eaters: 8,
                food: None,
                open: true,
            },
            shopping_list: ShoppingListView::default(),
            forecasts: Default::default(),
        };
        snapshot.forecasts.insert(anna.resident_id.clone(), anna);
        snapshot
    }

    fn ctx(format: OutputFormat, display: DisplayOptions) -> ViewContext {
        ViewContext {
            format,
            color: false,
            display,
        }
    }

    #[test]
    fn grid_has_a_column_per_day() {
        let out = render(
            &snapshot(),
            None,
            &ctx(OutputFormat::Table, DisplayOptions::default()),
        )
        .unwrap();
        assert!(out.contains("Today"));
        assert!(out.contains("Tuesday"));
        assert!(out.contains("eat_only + 7"));
        assert!(!out.contains("Anna + 7"));
    }

    #[test]
    fn display_options_add_units_and_buckets() {
        let display = DisplayOptions {
            show_balance: false,
            custom_pictures: true,
            resident_units: true,
        };
        let out = render(&snapshot(), None, &ctx(OutputFormat::Table, display)).unwrap();
        assert!(out.contains("Anna + 7"));
        assert!(out.contains("eat_only + 7 (5)"));
        assert!(out.contains("cook (1)"));
    }

    #[test]
    fn resident_lookup_is_case_insensitive_or_by_id() {
        let fmt = ctx(OutputFormat::Plain, DisplayOptions::default());
        let by_name = render(&snapshot(), Some("anna"), &fmt).unwrap();
        let by_id = render(&snapshot(), Some("1"), &fmt).unwrap();
        assert_eq!(by_name, by_id);
        assert!(by_name.starts_with("Anna\tToday\teat_only"));
    }

    #[test]
    fn unknown_resident_lists_known_names() {
        let fmt = ctx(OutputFormat::Plain, DisplayOptions::default());
        let err = render(&snapshot(), Some("Zoe"), &fmt).unwrap_err();
        match err {
            CliError::ResidentNotFound { name, known } => {
                assert_eq!(name, "Zoe");
                assert_eq!(known, "Anna");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
