// ── Presentation derivation ──
//
// Projects a raw `DeviceRecord` into the host-facing `PresentedDevice`:
// general information formatted for display, one control affordance per
// visible registry property, and numeric time-series values split out into
// the dynamic map.

use std::collections::BTreeMap;

use crate::format;
use crate::model::{ControlAffordance, ControlKind, DeviceRecord, PresentedDevice};
use crate::registry::{self, PropertyKind, PropertySpec, WriteGroup};
use crate::tables;

/// Presented name of the monitored panel temperature.
pub const TEMPERATURE: &str = "Temperature";
const TEMPERATURE_FIELD: &str = "diagnosisMonitorTemperature";

#[derive(Clone, Copy)]
enum Render {
    Plain,
    Epoch,
    Memory,
}

/// General information: presented name, raw field, rendering.
static GENERAL_INFO: &[(&str, &str, Render)] = &[
    ("DeviceName", "deviceName", Render::Plain),
    ("MACAddress", "deviceId", Render::Plain),
    ("IP", "ipAddress", Render::Plain),
    ("Location", "location", Render::Plain),
    ("DeviceType", "deviceType", Render::Plain),
    ("DeviceTypeVersion", "deviceTypeVersion", Render::Plain),
    ("MapLocation", "mapLocation", Render::Plain),
    ("LastConnectionTime", "lastConnectionTime", Render::Epoch),
    ("FirmwareVersion", "firmwareVersion", Render::Plain),
    ("OSImageVersion", "osImageVersion", Render::Plain),
    ("PlayerVersion", "playerVersion", Render::Plain),
    ("CPU", "cpuType", Render::Plain),
    ("MemorySize(byte)", "memSize", Render::Plain),
    ("StorageSize(byte)", "hddSize", Render::Plain),
    ("VideoCard", "videoAdapter", Render::Plain),
    ("VideoMemory", "videoMemory", Render::Plain),
    ("VideoDriver", "videoDriver", Render::Plain),
    ("DiskSpaceUsage", "diskSpaceUsage", Render::Memory),
    ("AvailableCapacity", "diskSpaceAvailable", Render::Memory),
    ("ApprovalDate", "createDate", Render::Epoch),
    ("ScreenSize", "screenSize", Render::Plain),
    ("Resolution", "resolution", Render::Plain),
    ("Code", "code", Render::Plain),
    ("SerialKey", "serialDecimal", Render::Plain),
];

/// Derive the host view of one device.
pub fn present(record: &DeviceRecord, historical: &[String]) -> PresentedDevice {
    let mut properties = BTreeMap::new();
    let mut dynamic = BTreeMap::new();

    for &(name, field, render) in GENERAL_INFO {
        let value = match (render, record.field(field)) {
            (_, None) => format::NONE.to_owned(),
            (Render::Plain, Some(v)) => v.trim().to_owned(),
            (Render::Epoch, Some(v)) => format::epoch_millis(v),
            (Render::Memory, Some(v)) => format::memory(v),
        };
        properties.insert(name.to_owned(), format::or_none(Some(&value)));
    }

    let temperature = record.field(TEMPERATURE_FIELD);
    let is_historical = historical.iter().any(|h| h == TEMPERATURE);
    match temperature {
        Some(t) if is_historical && t.trim().parse::<f64>().is_ok() => {
            dynamic.insert(TEMPERATURE.to_owned(), t.trim().to_owned());
        }
        _ => {
            properties.insert(TEMPERATURE.to_owned(), format::or_none(temperature));
        }
    }

    let mut controls = Vec::new();
    for spec in registry::REGISTRY {
        if !is_visible(spec, record) {
            continue;
        }
        if let Some(control) = affordance(spec, record) {
            properties.insert(control.name.clone(), control.value.clone());
            controls.push(control);
        }
    }

    PresentedDevice {
        id: record.id.clone(),
        name: record
            .field("deviceName")
            .map_or_else(|| record.id.to_string(), ToOwned::to_owned),
        online: record.online,
        properties,
        controls,
        dynamic,
    }
}

/// Whether a two-state field currently reads as on.
pub fn switch_is_on(kind: &PropertyKind, raw: &str) -> bool {
    let raw = raw.trim();
    match kind {
        PropertyKind::Switch { on, .. } => {
            raw == *on || (*on == "1" && raw.eq_ignore_ascii_case("true"))
        }
        _ => false,
    }
}

fn field_is_on(record: &DeviceRecord, field: &str) -> bool {
    record.field(field).is_some_and(|raw| switch_is_on(&SWITCH_ON_ONE, raw))
}

const SWITCH_ON_ONE: PropertyKind = PropertyKind::Switch { on: "1", off: "0" };

fn is_visible(spec: &PropertySpec, record: &DeviceRecord) -> bool {
    if spec.field.is_empty() || spec.name == "Power" {
        return true;
    }
    if record.field(spec.field).is_none() {
        return false;
    }

    match spec.group {
        Some(WriteGroup::WebBrowser) => record
            .field("basicSource")
            .and_then(|code| tables::SOURCE.label_of(code))
            == Some("WebBrowser"),
        Some(WriteGroup::AutoSource) => {
            spec.field == "autoSourceSwitching" || field_is_on(record, "autoSourceSwitching")
        }
        Some(WriteGroup::Maintenance) => {
            spec.field == "mntAutoIsEnable" || field_is_on(record, "mntAutoIsEnable")
        }
        Some(WriteGroup::PixelShift) => {
            spec.field == "pixelShiftEnable" || field_is_on(record, "pixelShiftEnable")
        }
        Some(WriteGroup::ScreenSaverTimer) => {
            let timer = record.field("scrSafeTimer");
            spec.field == "scrSafeTimer"
                || WriteGroup::ScreenSaverTimer
                    .fields(timer)
                    .contains(&spec.field)
        }
        None => true,
    }
}

fn affordance(spec: &PropertySpec, record: &DeviceRecord) -> Option<ControlAffordance> {
    let raw = record.field(spec.field);
    let (kind, value) = match spec.kind {
        PropertyKind::Switch { .. } => {
            let on = match raw {
                Some(raw) => switch_is_on(&spec.kind, raw),
                // Power without a reported state follows reachability.
                None => record.online,
            };
            (ControlKind::Switch, if on { "1" } else { "0" }.to_owned())
        }
        PropertyKind::Numeric { min, max } => {
            (ControlKind::Numeric { min, max }, raw?.trim().to_owned())
        }
        PropertyKind::Dropdown(table) => {
            let label = table.label_of(raw?)?;
            (
                ControlKind::Dropdown {
                    options: table.labels().map(String::from).collect(),
                },
                label.to_owned(),
            )
        }
        PropertyKind::Text => (ControlKind::Text, raw.unwrap_or_default().to_owned()),
        PropertyKind::Button { label, .. } => (
            ControlKind::Button {
                label: label.to_owned(),
            },
            label.to_owned(),
        ),
        PropertyKind::ClockHour => {
            let (hour, _) = format::parse_clock_12h(raw?)?;
            (ControlKind::Numeric { min: 0, max: 23 }, hour.to_string())
        }
        PropertyKind::ClockMinute => {
            let (_, minute) = format::parse_clock_12h(raw?)?;
            (ControlKind::Numeric { min: 0, max: 59 }, minute.to_string())
        }
    };

    Some(ControlAffordance {
        name: spec.grouped_name(),
        kind,
        value,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DeviceId, RawProperties};

    fn record(fields: &[(&str, &str)]) -> DeviceRecord {
        let raw: RawProperties = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        DeviceRecord::new(DeviceId::from("aa-bb-cc-dd-ee-ff"), raw)
    }

    fn value<'a>(p: &'a PresentedDevice, name: &str) -> Option<&'a str> {
        p.control(name).map(|c| c.value.as_str())
    }

    #[test]
    fn general_info_is_formatted() {
        let p = present(
            &record(&[
                ("deviceName", "Lobby"),
                ("deviceId", "aa-bb-cc-dd-ee-ff"),
                ("lastConnectionTime", "1709820300000"),
                ("diskSpaceUsage", "C:2097152"),
            ]),
            &[],
        );
        assert_eq!(p.name, "Lobby");
        assert_eq!(p.properties["LastConnectionTime"], "Mar 07, 2024, 2:05 PM");
        assert_eq!(p.properties["DiskSpaceUsage"], "C: 2 GB");
        assert_eq!(p.properties["Location"], "None");
        assert_eq!(p.properties["ApprovalDate"], "None");
    }

    #[test]
    fn name_falls_back_to_id() {
        let p = present(&record(&[]), &[]);
        assert_eq!(p.name, "aa-bb-cc-dd-ee-ff");
    }

    #[test]
    fn temperature_goes_dynamic_when_historical_and_numeric() {
        let historical = vec![TEMPERATURE.to_owned()];
        let p = present(&record(&[(TEMPERATURE_FIELD, "41")]), &historical);
        assert_eq!(p.dynamic.get(TEMPERATURE).map(String::as_str), Some("41"));
        assert!(!p.properties.contains_key(TEMPERATURE));

        let p = present(&record(&[(TEMPERATURE_FIELD, "41")]), &[]);
        assert_eq!(p.properties[TEMPERATURE], "41");
        assert!(p.dynamic.is_empty());

        let p = present(&record(&[(TEMPERATURE_FIELD, "n/a")]), &historical);
        assert_eq!(p.properties[TEMPERATURE], "n/a");
    }

    #[test]
    fn panel_switch_is_inverted() {
        let p = present(&record(&[("basicPanelStatus", "0")]), &[]);
        assert_eq!(value(&p, "DisplayControls#DisplayPanel"), Some("1"));
        let p = present(&record(&[("basicPanelStatus", "1")]), &[]);
        assert_eq!(value(&p, "DisplayControls#DisplayPanel"), Some("0"));
    }

    #[test]
    fn mute_accepts_boolean_text() {
        let p = present(&record(&[("basicMute", "true")]), &[]);
        assert_eq!(value(&p, "DisplayControls#Mute"), Some("1"));
    }

    #[test]
    fn dropdown_translates_code() {
        let p = present(&record(&[("basicSource", "33")]), &[]);
        let source = p.control("DisplayControls#Source").unwrap();
        assert_eq!(source.value, "HDMI1");
        assert!(matches!(&source.kind, ControlKind::Dropdown { options } if options.contains(&"DVI".to_owned())));
        assert_eq!(p.properties["DisplayControls#Source"], "HDMI1");
    }

    #[test]
    fn absent_fields_are_skipped_except_power_and_restart() {
        let p = present(&record(&[]), &[]);
        assert!(p.control("DisplayControls#Volume").is_none());
        assert_eq!(value(&p, "DisplayControls#Power"), Some("1"));
        assert_eq!(value(&p, "DisplayControls#Restart"), Some("Restart"));
    }

    #[test]
    fn web_browser_fields_follow_source() {
        let fields = [("webBrowserZoom", "100"), ("webBrowserHomepage", "https://x")];
        let mut with_hdmi = fields.to_vec();
        with_hdmi.push(("basicSource", "33"));
        let p = present(&record(&with_hdmi), &[]);
        assert!(p.control("DisplayControls#WebBrowserZoom").is_none());

        let mut with_web = fields.to_vec();
        with_web.push(("basicSource", "101"));
        let p = present(&record(&with_web), &[]);
        assert_eq!(value(&p, "DisplayControls#WebBrowserZoom"), Some("100 %"));
        assert_eq!(
            value(&p, "DisplayControls#WebBrowserHomePage"),
            Some("https://x")
        );
    }

    #[test]
    fn lamp_schedule_splits_clock_when_enabled() {
        let fields = [
            ("mntAutoIsEnable", "1"),
            ("mntAutoMaxTime", "01:30PM"),
            ("mntAutoMaxValue", "80"),
        ];
        let p = present(&record(&fields), &[]);
        assert_eq!(value(&p, "Maintenance#MaxTime(hour)"), Some("13"));
        assert_eq!(value(&p, "Maintenance#MaxTime(minute)"), Some("30"));
        assert_eq!(value(&p, "Maintenance#MaxValue"), Some("80"));

        let p = present(
            &record(&[("mntAutoIsEnable", "0"), ("mntAutoMaxTime", "01:30PM")]),
            &[],
        );
        assert_eq!(value(&p, "Maintenance#ScreenLampSchedule"), Some("0"));
        assert!(p.control("Maintenance#MaxTime(hour)").is_none());
    }

    #[test]
    fn timer_mode_selects_visible_schedule() {
        let base = [
            ("scrSafeMode", "131"),
            ("scrSafePeriod", "2"),
            ("scrSafeTime", "20"),
            ("scrSafeStartTime", "12:00AM"),
            ("scrSafeEndTime", "06:00AM"),
        ];

        let mut repeat = base.to_vec();
        repeat.push(("scrSafeTimer", "1"));
        let p = present(&record(&repeat), &[]);
        assert!(p.control("ScreenBurnProtection#TimerPeriod(hour)").is_some());
        assert!(p.control("ScreenBurnProtection#TimerStartTime(hour)").is_none());

        let mut interval = base.to_vec();
        interval.push(("scrSafeTimer", "2"));
        let p = present(&record(&interval), &[]);
        assert!(p.control("ScreenBurnProtection#TimerPeriod(hour)").is_none());
        assert_eq!(
            value(&p, "ScreenBurnProtection#TimerStartTime(hour)"),
            Some("0")
        );

        let mut off = base.to_vec();
        off.push(("scrSafeTimer", "0"));
        let p = present(&record(&off), &[]);
        assert_eq!(value(&p, "ScreenBurnProtection#Timer"), Some("Off"));
        assert!(p.control("ScreenBurnProtection#TimerMode").is_none());
    }

    #[test]
    fn unknown_dropdown_code_hides_control() {
        let p = present(&record(&[("soundMode", "99")]), &[]);
        assert!(p.control("Sound#Mode").is_none());
    }
}
