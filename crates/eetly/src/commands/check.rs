//! `eetly check`: one probe round trip to validate the token.

use tracing::debug;

use eetly_api::{GraphqlClient, TransportConfig};
use eetly_core::{CoreError, QueryFamily};

use crate::cli::GlobalOpts;
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

pub async fn handle(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = &resolved.coordinator;
    let transport = TransportConfig::default().with_timeout(cfg.timeout);
    let client = GraphqlClient::new(cfg.endpoint.as_str(), &cfg.token, &transport)
        .map_err(CoreError::Setup)?;

    debug!(profile = %resolved.profile_name, endpoint = %client.endpoint(), "probing token");
    let household = client.probe().await.map_err(|source| CoreError::Transport {
        family: QueryFamily::Info,
        source,
    })?;

    output::print_output(
        &format!("Token OK for household '{household}'"),
        global.quiet,
    );
    Ok(())
}
