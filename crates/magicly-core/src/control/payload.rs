// Host value → vendor write payload

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::format;
use crate::model::DeviceRecord;
use crate::registry::{PropertyKind, PropertySpec, WriteGroup};

/// A validated write, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePlan {
    /// Wire value for the edited field.
    pub value: String,
    /// Field → value pairs written (group siblings included, flags excluded).
    pub fields: Vec<(String, String)>,
}

impl WritePlan {
    /// `displayInfo` body: written fields plus every group's change flag,
    /// true only for the edited group.
    pub fn display_info(&self, group: Option<WriteGroup>) -> Map<String, Value> {
        let mut body: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        for g in WriteGroup::ALL {
            body.insert(g.changed_flag().to_owned(), Value::Bool(Some(g) == group));
        }
        body
    }
}

/// Validate host input and build the write for `spec` on `record`.
pub fn plan(spec: &PropertySpec, record: &DeviceRecord, input: &str) -> Result<WritePlan, CoreError> {
    let value = encode(spec, record, input)?;

    let fields = match spec.group {
        None => vec![(spec.field.to_owned(), value.clone())],
        Some(group) => {
            let timer = if spec.field == "scrSafeTimer" {
                Some(value.as_str())
            } else {
                record.field("scrSafeTimer")
            };
            group
                .fields(timer)
                .iter()
                .filter_map(|&field| {
                    if field == spec.field {
                        Some((field.to_owned(), value.clone()))
                    } else {
                        record
                            .field(field)
                            .map(|current| (field.to_owned(), current.to_owned()))
                    }
                })
                .collect()
        }
    };

    Ok(WritePlan { value, fields })
}

/// Wire value for the edited field.
pub fn encode(spec: &PropertySpec, record: &DeviceRecord, input: &str) -> Result<String, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidValue {
        property: spec.grouped_name(),
        value: input.to_owned(),
        reason: reason.to_owned(),
    };
    let trimmed = input.trim();

    match spec.kind {
        PropertyKind::Switch { on, off } => match trimmed.to_ascii_lowercase().as_str() {
            "1" | "true" | "on" => Ok(on.to_owned()),
            "0" | "false" | "off" => Ok(off.to_owned()),
            _ => Err(invalid("expected 1 or 0")),
        },
        PropertyKind::Numeric { min, max } => Ok(format::clamp_input(trimmed, min, max).to_string()),
        PropertyKind::Dropdown(table) => table
            .code_of(trimmed)
            .map(|code| code.to_string())
            .ok_or_else(|| invalid(&format!("not a {} option", table.name))),
        PropertyKind::Text => Ok(input.to_owned()),
        PropertyKind::Button { value, .. } => Ok(value.to_owned()),
        PropertyKind::ClockHour | PropertyKind::ClockMinute => {
            let (hour, minute) = record
                .field(spec.field)
                .and_then(format::parse_clock_12h)
                .unwrap_or((0, 0));
            let (hour, minute) = if matches!(spec.kind, PropertyKind::ClockHour) {
                (clamp_u32(trimmed, 23), minute)
            } else {
                (hour, clamp_u32(trimmed, 59))
            };
            Ok(format::format_clock_12h(hour, minute))
        }
    }
}

fn clamp_u32(input: &str, max: u32) -> u32 {
    let clamped = format::clamp_input(input, 0, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DeviceId, RawProperties};
    use crate::registry::lookup;

    fn record(fields: &[(&str, &str)]) -> DeviceRecord {
        let raw: RawProperties = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        DeviceRecord::new(DeviceId::from("aa"), raw)
    }

    fn plan_for(name: &str, rec: &DeviceRecord, input: &str) -> Result<WritePlan, CoreError> {
        plan(lookup(name).unwrap(), rec, input)
    }

    #[test]
    fn numeric_is_clamped() {
        let rec = record(&[("basicVolume", "10")]);
        let p = plan_for("Volume", &rec, "150").unwrap();
        assert_eq!(p.value, "100");
        assert_eq!(p.fields, vec![("basicVolume".to_owned(), "100".to_owned())]);

        let p = plan_for("TemperatureControl(C)", &rec, "-x").unwrap();
        assert_eq!(p.value, "75");
    }

    #[test]
    fn panel_switch_writes_inverted_code() {
        let rec = record(&[]);
        assert_eq!(plan_for("DisplayPanel", &rec, "1").unwrap().value, "0");
        assert_eq!(plan_for("DisplayPanel", &rec, "0").unwrap().value, "1");
        assert!(matches!(
            plan_for("Mute", &rec, "maybe"),
            Err(CoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn dropdown_unknown_label_is_invalid() {
        let rec = record(&[]);
        assert_eq!(plan_for("Source", &rec, "HDMI2").unwrap().value, "35");
        assert!(matches!(
            plan_for("Source", &rec, "HDMI9"),
            Err(CoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn group_write_carries_siblings() {
        let rec = record(&[
            ("pixelShiftEnable", "1"),
            ("pixelShiftH", "2"),
            ("pixelShiftV", "3"),
            ("pixelShiftTime", "1"),
        ]);
        let p = plan_for("PixelShiftVertical", &rec, "9").unwrap();
        assert_eq!(
            p.fields,
            vec![
                ("pixelShiftEnable".to_owned(), "1".to_owned()),
                ("pixelShiftH".to_owned(), "2".to_owned()),
                ("pixelShiftV".to_owned(), "4".to_owned()),
                ("pixelShiftTime".to_owned(), "1".to_owned()),
            ]
        );

        let body = p.display_info(Some(WriteGroup::PixelShift));
        assert_eq!(body["pixelShiftChanged"], Value::Bool(true));
        assert_eq!(body["mntAutoChanged"], Value::Bool(false));
        assert_eq!(body["pixelShiftV"], Value::String("4".into()));
    }

    #[test]
    fn clock_subcontrol_rewrites_one_half() {
        let rec = record(&[("mntAutoIsEnable", "1"), ("mntAutoMaxTime", "01:30PM")]);
        let p = plan_for("MaxTime(hour)", &rec, "9").unwrap();
        assert_eq!(p.value, "09:30AM");
        let p = plan_for("MaxTime(minute)", &rec, "75").unwrap();
        assert_eq!(p.value, "01:59PM");
    }

    #[test]
    fn timer_switch_selects_sibling_set() {
        let rec = record(&[
            ("scrSafeTimer", "1"),
            ("scrSafeMode", "131"),
            ("scrSafePeriod", "2"),
            ("scrSafeTime", "20"),
            ("scrSafeStartTime", "12:00AM"),
            ("scrSafeEndTime", "06:00AM"),
        ]);
        let p = plan_for("Timer", &rec, "Interval").unwrap();
        let names: Vec<&str> = p.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["scrSafeTimer", "scrSafeMode", "scrSafeStartTime", "scrSafeEndTime"]
        );
    }

    #[test]
    fn non_group_body_clears_every_flag() {
        let rec = record(&[]);
        let body = plan_for("Volume", &rec, "5").unwrap().display_info(None);
        for g in WriteGroup::ALL {
            assert_eq!(body[g.changed_flag()], Value::Bool(false));
        }
    }
}
