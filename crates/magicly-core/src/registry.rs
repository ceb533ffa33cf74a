// ── Controllable property registry ──
//
// One row per host-visible control: the vendor field it reads and writes,
// how its value is validated and presented, and which composite settings
// object (if any) it must be written through. Presentation and the control
// protocol are both driven from this table.

use crate::tables::{self, LookupTable};

/// Host-facing section a control is listed under (`Section#Name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr, strum::EnumIter)]
pub enum Section {
    DisplayControls,
    FanAndTemperature,
    #[strum(serialize = "Picture(VIDEO)")]
    Picture,
    Sound,
    AdvancedSetting,
    Maintenance,
    ScreenBurnProtection,
}

impl Section {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Composite settings object the server only accepts as a whole.
///
/// Writing any member requires sending every sibling too, plus the group's
/// `*Changed` flag set and every other group's flag cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGroup {
    WebBrowser,
    AutoSource,
    Maintenance,
    ScreenSaverTimer,
    PixelShift,
}

impl WriteGroup {
    pub const ALL: [Self; 5] = [
        Self::WebBrowser,
        Self::AutoSource,
        Self::Maintenance,
        Self::ScreenSaverTimer,
        Self::PixelShift,
    ];

    pub fn changed_flag(self) -> &'static str {
        match self {
            Self::WebBrowser => "webBrowserChanged",
            Self::AutoSource => "autoSourceChanged",
            Self::Maintenance => "mntAutoChanged",
            Self::ScreenSaverTimer => "scrSafeChanged",
            Self::PixelShift => "pixelShiftChanged",
        }
    }

    /// Member fields to send. The screen-saver timer's members depend on its
    /// mode code (`scrSafeTimer`): repeat and interval timers carry different
    /// schedules, and an off timer carries none.
    pub fn fields(self, timer_code: Option<&str>) -> &'static [&'static str] {
        match self {
            Self::WebBrowser => &[
                "webBrowserInterval",
                "webBrowserZoom",
                "webBrowserHomepage",
                "webBrowserPageurl",
            ],
            Self::AutoSource => &[
                "autoSourceSwitching",
                "autoSourceRecovery",
                "autoSourcePrimary",
                "autoSourceSecondary",
            ],
            Self::Maintenance => &[
                "mntAutoIsEnable",
                "mntAutoMaxTime",
                "mntAutoMaxValue",
                "mntAutoMinTime",
                "mntAutoMinValue",
            ],
            Self::ScreenSaverTimer => match timer_code.and_then(|c| tables::TIMER.label_of(c)) {
                Some("Repeat") => &["scrSafeTimer", "scrSafeMode", "scrSafePeriod", "scrSafeTime"],
                Some("Interval") => &[
                    "scrSafeTimer",
                    "scrSafeMode",
                    "scrSafeStartTime",
                    "scrSafeEndTime",
                ],
                _ => &["scrSafeTimer"],
            },
            Self::PixelShift => &[
                "pixelShiftEnable",
                "pixelShiftH",
                "pixelShiftV",
                "pixelShiftTime",
            ],
        }
    }
}

/// How a property is validated on write and rendered on read.
#[derive(Debug, Clone, Copy)]
pub enum PropertyKind {
    /// Two-state; `on`/`off` are the vendor codes.
    Switch { on: &'static str, off: &'static str },
    /// Integer clamped into `[min, max]`.
    Numeric { min: i64, max: i64 },
    /// Label ↔ code through a lookup table.
    Dropdown(&'static LookupTable),
    /// Free text, written verbatim.
    Text,
    /// Momentary action writing a fixed vendor value.
    Button { label: &'static str, value: &'static str },
    /// 24-hour hour of a `"hh:mmAM"` field.
    ClockHour,
    /// Minute of a `"hh:mmAM"` field.
    ClockMinute,
}

/// Which endpoint a write goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePath {
    /// `PUT current-display-info`, confirmed by polling.
    Display,
    /// `PUT quick-control` with the given menu; not confirmed.
    QuickControl(&'static str),
}

/// One controllable property.
#[derive(Debug)]
pub struct PropertySpec {
    pub name: &'static str,
    pub section: Section,
    pub field: &'static str,
    pub kind: PropertyKind,
    pub group: Option<WriteGroup>,
    pub path: WritePath,
}

impl PropertySpec {
    /// `Section#Name`, the form the host addresses controls by.
    pub fn grouped_name(&self) -> String {
        format!("{}#{}", self.section.label(), self.name)
    }

    /// Whether a write waits for the server to report the device applied it.
    pub fn needs_confirmation(&self) -> bool {
        self.path == WritePath::Display && !matches!(self.kind, PropertyKind::Button { .. })
    }
}

const fn display(
    name: &'static str,
    section: Section,
    field: &'static str,
    kind: PropertyKind,
) -> PropertySpec {
    PropertySpec {
        name,
        section,
        field,
        kind,
        group: None,
        path: WritePath::Display,
    }
}

const fn grouped(
    name: &'static str,
    section: Section,
    field: &'static str,
    kind: PropertyKind,
    group: WriteGroup,
) -> PropertySpec {
    PropertySpec {
        name,
        section,
        field,
        kind,
        group: Some(group),
        path: WritePath::Display,
    }
}

const SWITCH: PropertyKind = PropertyKind::Switch { on: "1", off: "0" };
const PERCENT: PropertyKind = PropertyKind::Numeric { min: 0, max: 100 };

pub static REGISTRY: &[PropertySpec] = &[
    // ── Display controls ──
    // Panel status is inverted on the wire: 0 means the panel is on.
    display(
        "DisplayPanel",
        Section::DisplayControls,
        "basicPanelStatus",
        PropertyKind::Switch { on: "0", off: "1" },
    ),
    display(
        "Source",
        Section::DisplayControls,
        "basicSource",
        PropertyKind::Dropdown(&tables::SOURCE),
    ),
    grouped(
        "WebBrowserRefreshInterval",
        Section::DisplayControls,
        "webBrowserInterval",
        PropertyKind::Dropdown(&tables::WEB_BROWSER_INTERVAL),
        WriteGroup::WebBrowser,
    ),
    grouped(
        "WebBrowserZoom",
        Section::DisplayControls,
        "webBrowserZoom",
        PropertyKind::Dropdown(&tables::WEB_BROWSER_ZOOM),
        WriteGroup::WebBrowser,
    ),
    grouped(
        "WebBrowserHomePage",
        Section::DisplayControls,
        "webBrowserHomepage",
        PropertyKind::Text,
        WriteGroup::WebBrowser,
    ),
    grouped(
        "WebBrowserPageURL",
        Section::DisplayControls,
        "webBrowserPageurl",
        PropertyKind::Text,
        WriteGroup::WebBrowser,
    ),
    display("Volume", Section::DisplayControls, "basicVolume", PERCENT),
    display("Mute", Section::DisplayControls, "basicMute", SWITCH),
    PropertySpec {
        name: "Power",
        section: Section::DisplayControls,
        field: "power",
        kind: SWITCH,
        group: None,
        path: WritePath::QuickControl("power"),
    },
    PropertySpec {
        name: "Restart",
        section: Section::DisplayControls,
        field: "",
        kind: PropertyKind::Button {
            label: "Restart",
            value: "1",
        },
        group: None,
        path: WritePath::QuickControl("restart"),
    },
    // ── Fan & temperature ──
    display(
        "TemperatureControl(C)",
        Section::FanAndTemperature,
        "diagnosisAlarmTemperature",
        PropertyKind::Numeric { min: 75, max: 124 },
    ),
    // ── Picture ──
    display("LampControl(%)", Section::Picture, "mntManual", PERCENT),
    display("Contrast(%)", Section::Picture, "pvContrast", PERCENT),
    display("Brightness(%)", Section::Picture, "pvBrightness", PERCENT),
    display("Sharpness(%)", Section::Picture, "pvSharpness", PERCENT),
    display("Color(%)", Section::Picture, "pvColor", PERCENT),
    display("Tint(G/R)(%)", Section::Picture, "pvTint", PERCENT),
    display(
        "ColorTone",
        Section::Picture,
        "pvColortone",
        PropertyKind::Dropdown(&tables::COLOR_TONE),
    ),
    display(
        "ColorTemperature",
        Section::Picture,
        "pvColorTemperature",
        PropertyKind::Dropdown(&tables::COLOR_TEMPERATURE),
    ),
    display(
        "PictureSize",
        Section::Picture,
        "pvSize",
        PropertyKind::Dropdown(&tables::PICTURE_SIZE),
    ),
    display(
        "LEDPictureSize",
        Section::Picture,
        "ledPictureSize",
        PropertyKind::Dropdown(&tables::LED_PICTURE_SIZE),
    ),
    display(
        "DigitalCleanView",
        Section::Picture,
        "pvDigitalnr",
        PropertyKind::Dropdown(&tables::DIGITAL_CLEAN_VIEW),
    ),
    display(
        "FilmMode",
        Section::Picture,
        "pvFilmmode",
        PropertyKind::Dropdown(&tables::FILM_MODE),
    ),
    display(
        "HDMIBlackLevel",
        Section::Picture,
        "pvHdmiBlackLevel",
        PropertyKind::Dropdown(&tables::HDMI_BLACK_LEVEL),
    ),
    display(
        "ResetPicture",
        Section::Picture,
        "advancedReset",
        PropertyKind::Button {
            label: "Reset",
            value: "0",
        },
    ),
    // ── Sound ──
    display(
        "Mode",
        Section::Sound,
        "soundMode",
        PropertyKind::Dropdown(&tables::SOUND_MODE),
    ),
    display(
        "ResetSound",
        Section::Sound,
        "advancedReset",
        PropertyKind::Button {
            label: "Reset",
            value: "1",
        },
    ),
    // ── Advanced settings ──
    display(
        "PictureEnhancer",
        Section::AdvancedSetting,
        "pictureEnhancer",
        SWITCH,
    ),
    display(
        "MaxPowerSaving",
        Section::AdvancedSetting,
        "maxPowerSaving",
        SWITCH,
    ),
    display(
        "AutoPowerOn",
        Section::AdvancedSetting,
        "advancedAutoPower",
        SWITCH,
    ),
    display(
        "RemoteConfiguration",
        Section::AdvancedSetting,
        "networkStandbyMode",
        SWITCH,
    ),
    grouped(
        "AutoSourceSwitching",
        Section::AdvancedSetting,
        "autoSourceSwitching",
        SWITCH,
        WriteGroup::AutoSource,
    ),
    grouped(
        "RestorePrimarySource",
        Section::AdvancedSetting,
        "autoSourceRecovery",
        SWITCH,
        WriteGroup::AutoSource,
    ),
    grouped(
        "PrimarySource",
        Section::AdvancedSetting,
        "autoSourcePrimary",
        PropertyKind::Dropdown(&tables::SOURCE),
        WriteGroup::AutoSource,
    ),
    grouped(
        "SecondarySource",
        Section::AdvancedSetting,
        "autoSourceSecondary",
        PropertyKind::Dropdown(&tables::SOURCE),
        WriteGroup::AutoSource,
    ),
    // ── Maintenance (lamp schedule) ──
    grouped(
        "ScreenLampSchedule",
        Section::Maintenance,
        "mntAutoIsEnable",
        SWITCH,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MaxTime(hour)",
        Section::Maintenance,
        "mntAutoMaxTime",
        PropertyKind::ClockHour,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MaxTime(minute)",
        Section::Maintenance,
        "mntAutoMaxTime",
        PropertyKind::ClockMinute,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MaxValue",
        Section::Maintenance,
        "mntAutoMaxValue",
        PERCENT,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MinTime(hour)",
        Section::Maintenance,
        "mntAutoMinTime",
        PropertyKind::ClockHour,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MinTime(minute)",
        Section::Maintenance,
        "mntAutoMinTime",
        PropertyKind::ClockMinute,
        WriteGroup::Maintenance,
    ),
    grouped(
        "MinValue",
        Section::Maintenance,
        "mntAutoMinValue",
        PERCENT,
        WriteGroup::Maintenance,
    ),
    // ── Screen burn protection ──
    display(
        "ImmediateDisplay",
        Section::ScreenBurnProtection,
        "mntSafetyScreenRun",
        PropertyKind::Dropdown(&tables::IMMEDIATE_DISPLAY),
    ),
    grouped(
        "Timer",
        Section::ScreenBurnProtection,
        "scrSafeTimer",
        PropertyKind::Dropdown(&tables::TIMER),
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerMode",
        Section::ScreenBurnProtection,
        "scrSafeMode",
        PropertyKind::Dropdown(&tables::INTERVAL_MODE),
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerPeriod(hour)",
        Section::ScreenBurnProtection,
        "scrSafePeriod",
        PropertyKind::Numeric { min: 0, max: 10 },
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerTime(sec)",
        Section::ScreenBurnProtection,
        "scrSafeTime",
        PropertyKind::Numeric { min: 10, max: 50 },
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerStartTime(hour)",
        Section::ScreenBurnProtection,
        "scrSafeStartTime",
        PropertyKind::ClockHour,
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerStartTime(minute)",
        Section::ScreenBurnProtection,
        "scrSafeStartTime",
        PropertyKind::ClockMinute,
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerEndTime(hour)",
        Section::ScreenBurnProtection,
        "scrSafeEndTime",
        PropertyKind::ClockHour,
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "TimerEndTime(minute)",
        Section::ScreenBurnProtection,
        "scrSafeEndTime",
        PropertyKind::ClockMinute,
        WriteGroup::ScreenSaverTimer,
    ),
    grouped(
        "PixelShift",
        Section::ScreenBurnProtection,
        "pixelShiftEnable",
        SWITCH,
        WriteGroup::PixelShift,
    ),
    grouped(
        "PixelShiftVertical",
        Section::ScreenBurnProtection,
        "pixelShiftV",
        PropertyKind::Numeric { min: 0, max: 4 },
        WriteGroup::PixelShift,
    ),
    grouped(
        "PixelShiftHorizontal",
        Section::ScreenBurnProtection,
        "pixelShiftH",
        PropertyKind::Numeric { min: 0, max: 4 },
        WriteGroup::PixelShift,
    ),
    grouped(
        "PixelShiftTime(minute)",
        Section::ScreenBurnProtection,
        "pixelShiftTime",
        PropertyKind::Numeric { min: 1, max: 4 },
        WriteGroup::PixelShift,
    ),
];

/// Find a property by bare (`Volume`) or grouped (`DisplayControls#Volume`) name.
///
/// A grouped name whose section does not match the property is rejected.
pub fn lookup(name: &str) -> Option<&'static PropertySpec> {
    let (section, bare) = match name.split_once('#') {
        Some((section, bare)) => (Some(section), bare),
        None => (None, name),
    };
    REGISTRY
        .iter()
        .find(|p| p.name == bare)
        .filter(|p| section.is_none_or(|s| s == p.section.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_bare_and_grouped_name() {
        assert_eq!(lookup("Volume").map(|p| p.field), Some("basicVolume"));
        assert_eq!(
            lookup("Picture(VIDEO)#Contrast(%)").map(|p| p.field),
            Some("pvContrast")
        );
        assert!(lookup("Sound#Contrast(%)").is_none());
        assert!(lookup("Brightness").is_none());
    }

    #[test]
    fn every_section_has_controls() {
        use strum::IntoEnumIterator;
        for section in Section::iter() {
            assert!(REGISTRY.iter().any(|p| p.section == section), "{}", section.label());
        }
        assert_eq!(Section::Picture.label(), "Picture(VIDEO)");
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = REGISTRY.iter().map(|p| p.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn grouped_fields_belong_to_their_group() {
        for spec in REGISTRY {
            if let Some(group) = spec.group {
                let all: Vec<&str> = [None, Some("1"), Some("2")]
                    .into_iter()
                    .flat_map(|mode| group.fields(mode).iter().copied())
                    .collect();
                assert!(
                    all.contains(&spec.field),
                    "{} ({}) missing from {:?}",
                    spec.name,
                    spec.field,
                    group
                );
            }
        }
    }

    #[test]
    fn timer_fields_follow_mode() {
        let repeat = WriteGroup::ScreenSaverTimer.fields(Some("1"));
        assert!(repeat.contains(&"scrSafePeriod"));
        assert!(!repeat.contains(&"scrSafeStartTime"));

        let interval = WriteGroup::ScreenSaverTimer.fields(Some("2"));
        assert!(interval.contains(&"scrSafeEndTime"));

        assert_eq!(WriteGroup::ScreenSaverTimer.fields(Some("0")), &["scrSafeTimer"]);
    }

    #[test]
    fn quick_control_and_buttons_skip_confirmation() {
        assert!(!lookup("Power").is_some_and(PropertySpec::needs_confirmation));
        assert!(!lookup("ResetSound").is_some_and(PropertySpec::needs_confirmation));
        assert!(lookup("Volume").is_some_and(PropertySpec::needs_confirmation));
    }
}
