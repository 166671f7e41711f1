//! `eetly today`: cook, attendance buckets, and dinner.

use eetly_core::TodayView;

use crate::output;

use super::ViewContext;

fn bucket(names: &[String], color: bool) -> String {
    if names.is_empty() {
        output::muted(&output::names_or_nobody(names), color)
    } else {
        output::names_or_nobody(names)
    }
}

fn detail(today: &TodayView, color: bool) -> String {
    let state = if today.open { "open" } else { "closed" };
    [
        format!(
            "{} {} ({state})",
            output::heading("Today:", color),
            today.date.format("%A %-d %B")
        ),
        format!("Cook:        {}", today.cook),
        format!("Eating:      {}", bucket(&today.eating, color)),
        format!("Shopping:    {}", bucket(&today.shopping, color)),
        format!("Not eating:  {}", bucket(&today.not_eating, color)),
        format!("Unknown:     {}", bucket(&today.unknown, color)),
        format!("Eaters:      {}", today.total_eaters),
        format!("Food:        {}", today.food.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub fn render(today: &TodayView, ctx: &ViewContext) -> String {
    output::render_single(
        ctx.format,
        today,
        |t| detail(t, ctx.color),
        |t| t.cook.to_string(),
    )
}
