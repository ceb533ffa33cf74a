//! Control command handlers.

use magicly_core::{Adapter, ControlEntry, DeviceId};
use tracing::info;

use crate::cli::{ControlArgs, ControlBatchArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    adapter: &Adapter,
    args: ControlArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Controls are applied against cached records.
    util::listing(adapter).await?;

    let device = DeviceId::from(args.device);
    adapter
        .apply_control(&device, &args.property, &args.value)
        .await?;

    // The dirty view already carries the confirmed value.
    let updated = adapter
        .list_aggregated_by_ids(std::slice::from_ref(&device))
        .await?;
    let suffix = format!("#{}", args.property);
    let shown = updated
        .first()
        .and_then(|d| {
            d.controls
                .iter()
                .find(|c| c.name == args.property || c.name.ends_with(&suffix))
        })
        .map_or_else(|| args.value.clone(), |c| c.value.clone());

    let entry = ControlEntry::new(device, args.property, shown);
    let out = output::render_single(
        &global.output,
        &entry,
        |e| format!("✓ {} = {} on {}", e.property, e.value, e.device_id),
        |e| e.value.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_batch(
    adapter: &Adapter,
    args: &ControlBatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = util::read_control_file(&args.file)?;
    if entries.is_empty() {
        return Ok(());
    }

    util::listing(adapter).await?;
    let applied = adapter.apply_controls(&entries).await;
    info!(applied, total = entries.len(), "batch finished");

    if applied < entries.len() {
        return Err(CliError::BatchIncomplete {
            applied,
            total: entries.len(),
        });
    }
    if !global.quiet {
        eprintln!("✓ Applied {applied} control changes");
    }
    Ok(())
}
