//! Command dispatch: bridges CLI args -> adapter calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod ping;
pub mod stats;
pub mod util;
pub mod watch;

use magicly_core::Adapter;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    adapter: &Adapter,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Stats => stats::handle(adapter, global).await,
        Command::Devices(args) => devices::handle(adapter, args, global).await,
        Command::Control(args) => control::handle(adapter, args, global).await,
        Command::ControlBatch(args) => control::handle_batch(adapter, &args, global).await,
        Command::Watch(args) => watch::handle(adapter, &args, global).await,
        Command::Ping => ping::handle(adapter, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
