//! Device command handlers.

use magicly_core::{Adapter, ControlKind, DeviceId, DeviceType, PresentedDevice};
use tabled::Tabled;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Temp")]
    temperature: String,
}

#[derive(Tabled)]
struct DeviceTypeRow {
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Full Type")]
    full_type: String,
}

fn property(d: &PresentedDevice, name: &str) -> String {
    d.properties
        .get(name)
        .or_else(|| d.dynamic.get(name))
        .cloned()
        .unwrap_or_else(|| "-".into())
}

fn control_value(d: &PresentedDevice, name: &str) -> String {
    d.control(name)
        .map_or_else(|| "-".into(), |c| c.value.clone())
}

impl From<&PresentedDevice> for DeviceRow {
    fn from(d: &PresentedDevice) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            dtype: property(d, "DeviceType"),
            ip: property(d, "IP"),
            power: control_value(d, "DisplayControls#Power"),
            source: control_value(d, "DisplayControls#Source"),
            temperature: property(d, "Temperature"),
        }
    }
}

impl From<&DeviceType> for DeviceTypeRow {
    fn from(t: &DeviceType) -> Self {
        Self {
            device_type: t.device_type.clone().unwrap_or_default(),
            version: t.device_type_version.clone().unwrap_or_default(),
            full_type: t.device_full_type.clone().unwrap_or_default(),
        }
    }
}

fn describe_kind(kind: &ControlKind) -> String {
    match kind {
        ControlKind::Switch => "switch".into(),
        ControlKind::Numeric { min, max } => format!("{min}..={max}"),
        ControlKind::Dropdown { options } => options.join(" | "),
        ControlKind::Text => "text".into(),
        ControlKind::Button { label } => format!("[{label}]"),
    }
}

pub(crate) fn detail(d: &PresentedDevice, color: bool) -> String {
    let mut lines = vec![
        format!("ID:     {}", d.id),
        format!("Name:   {}", d.name),
        format!("State:  {}", output::online_label(d.online, color)),
    ];

    lines.push(String::new());
    lines.push(output::heading("Properties", color));
    let width = d.properties.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in &d.properties {
        lines.push(format!("  {name:<width$}  {value}"));
    }

    if !d.dynamic.is_empty() {
        lines.push(String::new());
        lines.push(output::heading("Statistics", color));
        for (name, value) in &d.dynamic {
            lines.push(format!("  {name}  {value}"));
        }
    }

    if !d.controls.is_empty() {
        lines.push(String::new());
        lines.push(output::heading("Controls", color));
        let width = d.controls.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for c in &d.controls {
            lines.push(format!(
                "  {:<width$}  {}  ({})",
                c.name,
                c.value,
                describe_kind(&c.kind)
            ));
        }
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    adapter: &Adapter,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = match args.command {
        DevicesCommand::List { ids } => {
            let all = util::listing(adapter).await?;
            let devices = if ids.is_empty() {
                all
            } else {
                let wanted: Vec<DeviceId> = ids.into_iter().map(DeviceId::from).collect();
                adapter.list_aggregated_by_ids(&wanted).await?
            };
            output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?
        }

        DevicesCommand::Get { device } => {
            let devices = util::listing(adapter).await?;
            let found = util::find_device(&devices, &device)?;
            output::render_single(
                &global.output,
                found,
                |d| detail(d, color),
                |d| d.id.to_string(),
            )?
        }

        DevicesCommand::Types => {
            // The catalog is loaded alongside the fleet counters.
            adapter.get_statistics().await?;
            let types = adapter.device_types().await;
            output::render_list(
                &global.output,
                &types,
                |t| DeviceTypeRow::from(t),
                |t| t.device_type.clone().unwrap_or_default(),
            )?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use magicly_core::ControlAffordance;

    use super::*;

    fn device() -> PresentedDevice {
        let mut properties = BTreeMap::new();
        properties.insert("IP".to_owned(), "10.0.0.5".to_owned());
        properties.insert("DeviceType".to_owned(), "SIGNAGE".to_owned());
        let mut dynamic = BTreeMap::new();
        dynamic.insert("Temperature".to_owned(), "41".to_owned());
        PresentedDevice {
            id: DeviceId::from("aa-bb"),
            name: "Lobby".into(),
            online: true,
            properties,
            controls: vec![
                ControlAffordance {
                    name: "DisplayControls#Power".into(),
                    kind: ControlKind::Switch,
                    value: "1".into(),
                },
                ControlAffordance {
                    name: "Sound#Volume".into(),
                    kind: ControlKind::Numeric { min: 0, max: 100 },
                    value: "20".into(),
                },
            ],
            dynamic,
        }
    }

    #[test]
    fn row_pulls_temperature_from_dynamic_values() {
        let row = DeviceRow::from(&device());
        assert_eq!(row.ip, "10.0.0.5");
        assert_eq!(row.power, "1");
        assert_eq!(row.source, "-");
        assert_eq!(row.temperature, "41");
    }

    #[test]
    fn detail_lists_controls_with_ranges() {
        let text = detail(&device(), false);
        assert!(text.contains("State:  online"));
        assert!(text.contains("Sound#Volume"));
        assert!(text.contains("0..=100"));
        assert!(text.contains("Temperature  41"));
    }
}
