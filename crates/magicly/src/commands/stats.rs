//! Statistics command handler.

use std::collections::BTreeMap;

use magicly_core::Adapter;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Statistic")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn render(stats: &BTreeMap<String, String>, format: &OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<StatRow> = stats
                .iter()
                .map(|(name, value)| StatRow {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect();
            Ok(output::render_table(&rows))
        }
        OutputFormat::Plain => Ok(stats
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => output::render_json_pretty(stats),
        OutputFormat::JsonCompact => output::render_json_compact(stats),
        OutputFormat::Yaml => output::render_yaml(stats),
    }
}

pub async fn handle(adapter: &Adapter, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = adapter.get_statistics().await?;
    let out = render(&stats, &global.output)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
