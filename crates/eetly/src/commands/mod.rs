//! Command handlers, one module per subcommand.

pub mod check;
pub mod config_cmd;
pub mod forecast;
pub mod info;
pub mod list;
pub mod today;
pub mod watch;

use eetly_config::DisplayOptions;
use eetly_core::Coordinator;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

/// Rendering settings shared by every view.
pub struct ViewContext {
    pub format: OutputFormat,
    pub color: bool,
    pub display: DisplayOptions,
}

impl ViewContext {
    pub fn new(global: &GlobalOpts, display: DisplayOptions) -> Self {
        Self {
            format: global.output,
            color: output::should_color(global.color),
            display,
        }
    }
}

/// Dispatch a command that needs the household.
pub async fn dispatch(cmd: Command, resolved: Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = ViewContext::new(global, resolved.display);

    match cmd {
        Command::Check => check::handle(&resolved, global).await,
        Command::Watch(args) => watch::handle(args, resolved, &ctx, global).await,
        view => {
            let snapshot =
                Coordinator::oneshot(resolved.coordinator, |snapshot| async move { Ok(snapshot) })
                    .await?;

            let rendered = match view {
                Command::Info => info::render(&snapshot, &ctx),
                Command::Today => today::render(&snapshot.today, &ctx),
                Command::List => list::render(&snapshot.shopping_list, &ctx),
                Command::Forecast(args) => forecast::render(&snapshot, args.resident.as_deref(), &ctx)?,
                Command::Check
                | Command::Watch(_)
                | Command::Config(_)
                | Command::Completions(_) => return Ok(()),
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
