//! Watch command: repeated listings that keep the refresh worker alive.

use chrono::Local;
use magicly_core::Adapter;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::devices::DeviceRow;
use super::util;

pub async fn handle(
    adapter: &Adapter,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let period = util::interval_secs(args.interval);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut shown = 0u32;
    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {}
        }

        let devices = if shown == 0 {
            util::listing(adapter).await?
        } else {
            adapter.list_aggregated().await?
        };
        let body = output::render_list(
            &global.output,
            &devices,
            |d| DeviceRow::from(d),
            |d| d.id.to_string(),
        )?;

        if !global.quiet {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let paused = if adapter.is_paused().await { " (paused)" } else { "" };
            let line = format!("{stamp}  {} devices{paused}", devices.len());
            eprintln!("{}", output::heading(&line, color));
        }
        output::print_output(&body, global.quiet);

        shown += 1;
        if args.count != 0 && shown >= args.count {
            break;
        }
    }
    Ok(())
}
