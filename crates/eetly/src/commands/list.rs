//! `eetly list`: unchecked shopping-list items.

use tabled::Tabled;

use eetly_core::ShoppingListView;

use crate::cli::OutputFormat;
use crate::output;

use super::ViewContext;

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Item")]
    item: String,
}

pub fn render(list: &ShoppingListView, ctx: &ViewContext) -> String {
    match ctx.format {
        OutputFormat::Table if list.is_empty() => {
            output::muted("Shopping list is empty", ctx.color)
        }
        OutputFormat::Table => {
            let rows: Vec<ItemRow> = list
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| ItemRow {
                    position: i + 1,
                    item: item.clone(),
                })
                .collect();
            output::render_table(&rows)
        }
        OutputFormat::Plain => list.items.join("\n"),
        _ => output::render_single(ctx.format, list, |_| String::new(), |_| String::new()),
    }
}
