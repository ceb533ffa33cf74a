//! Ping command handler.

use magicly_core::Adapter;
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PingResult {
    server: String,
    latency_ms: u64,
}

pub async fn handle(adapter: &Adapter, global: &GlobalOpts) -> Result<(), CliError> {
    let latency_ms = adapter.ping().await?;
    let result = PingResult {
        server: adapter.config().url.to_string(),
        latency_ms,
    };
    let out = output::render_single(
        &global.output,
        &result,
        |r| format!("{}: {} ms", r.server, r.latency_ms),
        |r| r.latency_ms.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
