//! `eetly info`: household attributes and residents.

use eetly_core::{HouseholdInfoView, Snapshot};

use crate::output;

use super::ViewContext;

fn detail(info: &HouseholdInfoView, snapshot: &Snapshot, ctx: &ViewContext) -> String {
    let mut lines = vec![
        format!("{}  {}", output::heading("Household:", ctx.color), info.name),
        format!("City:       {}", info.city.as_deref().unwrap_or("-")),
        format!("Address:    {}", info.address.as_deref().unwrap_or("-")),
        format!("Active:     {}", if info.active { "yes" } else { "no" }),
        format!(
            "Default:    {}",
            info.default_status.as_deref().unwrap_or("-")
        ),
        String::new(),
    ];

    let mut header = vec!["ID".to_owned(), "Resident".to_owned()];
    if ctx.display.show_balance {
        header.push("Balance".into());
    }
    let rows = snapshot
        .forecasts
        .values()
        .map(|f| {
            let mut row = vec![f.resident_id.to_string(), f.name.clone()];
            if ctx.display.show_balance {
                row.push(
                    info.balances
                        .get(&f.resident_id)
                        .map_or_else(|| "-".into(), |cents| output::format_euros(*cents)),
                );
            }
            row
        })
        .collect();
    lines.push(output::render_grid(header, rows));
    lines.join("\n")
}

/// Render the household view. Balances only leave the process when the
/// `show_balance` option is on.
pub fn render(snapshot: &Snapshot, ctx: &ViewContext) -> String {
    let mut info = snapshot.info.clone();
    if !ctx.display.show_balance {
        info.balances.clear();
    }
    output::render_single(
        ctx.format,
        &info,
        |i| detail(i, snapshot, ctx),
        |i| i.name.clone(),
    )
}
