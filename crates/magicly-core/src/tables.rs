// ── Label ↔ code lookup tables ──
//
// MagicInfo reports and accepts most display settings as small integer
// codes. Each table pairs the human label shown to the host with the
// server's code. Labels are unique within a table; codes are too.

/// A static, ordered label ↔ code table.
#[derive(Debug)]
pub struct LookupTable {
    pub name: &'static str,
    entries: &'static [(&'static str, i32)],
}

impl LookupTable {
    const fn new(name: &'static str, entries: &'static [(&'static str, i32)]) -> Self {
        Self { name, entries }
    }

    /// Label for a server code. Accepts the code as text, since raw bags are stringly typed.
    pub fn label_of(&self, code: &str) -> Option<&'static str> {
        let code: i32 = code.trim().parse().ok()?;
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(label, _)| *label)
    }

    /// Server code for a label (exact match).
    pub fn code_of(&self, label: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, code)| *code)
    }

    /// Labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }
}

// ── General ──────────────────────────────────────────────────────────

pub static SOURCE: LookupTable = LookupTable::new(
    "Source",
    &[
        ("PC", 20),
        ("BNC", 30),
        ("DVI", 24),
        ("AV", 12),
        ("S-Video", 4),
        ("Component", 8),
        ("MagicInfo", 32),
        ("MagicInfo-Lite/S", 96),
        ("Plug In Module", 80),
        ("HDMI1", 33),
        ("HDMI2", 35),
        ("HDMI3", 49),
        ("HDMI4", 51),
        ("HDMI1_PC", 34),
        ("HDMI2_PC", 36),
        ("HDMI3_PC", 50),
        ("HDMI4_PC", 52),
        ("Display_Port", 37),
        ("Display_Port2", 38),
        ("ATV", 48),
        ("DTV", 64),
        ("DVI_VIDEO", 31),
        ("AV2", 13),
        ("Ext", 14),
        ("HDBaseT", 85),
        ("WiDi", 97),
        ("WebBrowser", 101),
        ("URL Launcher", 99),
        ("KIOSK", 103),
    ],
);

pub static WEB_BROWSER_INTERVAL: LookupTable = LookupTable::new(
    "WebBrowserRefreshInterval",
    &[
        ("Off", 0),
        ("5 min", 300),
        ("10 min", 600),
        ("15 min", 900),
        ("30 min", 1800),
    ],
);

pub static WEB_BROWSER_ZOOM: LookupTable = LookupTable::new(
    "WebBrowserZoom",
    &[
        ("50 %", 50),
        ("75 %", 75),
        ("100 %", 100),
        ("125 %", 125),
        ("150 %", 150),
        ("200 %", 200),
        ("300 %", 300),
    ],
);

/// Filter-only table: function labels map to the server's function keys,
/// so it is kept apart from the numeric tables.
pub static FUNCTION_FILTER: &[(&str, &str)] = &[("Video Wall", "is_videowall")];

/// Server function key for a function filter label.
pub fn function_key(label: &str) -> Option<&'static str> {
    FUNCTION_FILTER
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, key)| *key)
}

// ── Picture ──────────────────────────────────────────────────────────

pub static COLOR_TEMPERATURE: LookupTable = LookupTable::new(
    "ColorTemperature",
    &[
        ("2800", 253),
        ("3000", 254),
        ("3500", 35),
        ("4000", 255),
        ("4500", 45),
        ("5000", 0),
        ("5500", 55),
        ("6000", 1),
        ("6500", 65),
        ("7000", 2),
        ("7500", 75),
        ("8000", 3),
        ("8500", 85),
        ("9000", 4),
        ("9500", 95),
        ("10000", 5),
        ("10500", 105),
        ("11000", 6),
        ("11500", 115),
        ("12000", 7),
        ("12500", 125),
        ("13000", 8),
        ("13500", 135),
        ("14000", 9),
        ("14500", 145),
        ("15000", 16),
        ("15500", 155),
        ("16000", 160),
    ],
);

pub static COLOR_TONE: LookupTable = LookupTable::new(
    "ColorTone",
    &[
        ("Off", 80),
        ("Cool", 1),
        ("Standard", 2),
        ("Warm 1", 3),
        ("Warm 2", 4),
        ("Natural", 5),
    ],
);

pub static DIGITAL_CLEAN_VIEW: LookupTable = LookupTable::new(
    "DigitalCleanView",
    &[
        ("Off", 0),
        ("On", 1),
        ("Medium", 2),
        ("High", 3),
        ("Auto", 4),
        ("Auto Visualization", 5),
    ],
);

pub static FILM_MODE: LookupTable = LookupTable::new(
    "FilmMode",
    &[("Off", 0), ("Auto1", 1), ("Auto2", 2), ("Cinema Smooth", 3)],
);

pub static HDMI_BLACK_LEVEL: LookupTable = LookupTable::new(
    "HDMIBlackLevel",
    &[("Normal", 0), ("Low", 1), ("Auto", 2)],
);

pub static LED_PICTURE_SIZE: LookupTable =
    LookupTable::new("LEDPictureSize", &[("Original", 0), ("Custom", 1)]);

pub static PICTURE_SIZE: LookupTable = LookupTable::new(
    "PictureSize",
    &[
        ("16:9 Standard", 1),
        ("Zoom", 4),
        ("Zoom 1", 5),
        ("Zoom 2", 6),
        ("Fill to screen", 9),
        ("4:3", 11),
        ("Wide Fit", 12),
        ("Custom", 13),
        ("Smart View 1", 14),
        ("Smart View 2", 15),
        ("Original Ratio", 32),
        ("Wide Zoom", 49),
    ],
);

// ── Screen burn protection ───────────────────────────────────────────

pub static IMMEDIATE_DISPLAY: LookupTable = LookupTable::new(
    "ImmediateDisplay",
    &[
        ("Off", 0),
        ("Signal Pattern", 1),
        ("All White", 2),
        ("Scroll", 3),
        ("Bar", 4),
        ("Eraser", 6),
        ("Pixel", 7),
        ("Rolling Bar", 16),
        ("Fading Screen", 17),
    ],
);

pub static INTERVAL_MODE: LookupTable = LookupTable::new(
    "TimerMode",
    &[
        ("Scroll", 131),
        ("Pixel", 132),
        ("Bar", 133),
        ("Eraser", 134),
        ("Rolling Bar", 144),
        ("Fading Screen", 145),
    ],
);

pub static TIMER: LookupTable =
    LookupTable::new("Timer", &[("Off", 0), ("Repeat", 1), ("Interval", 2)]);

// ── Sound ────────────────────────────────────────────────────────────

pub static SOUND_MODE: LookupTable = LookupTable::new(
    "SoundMode",
    &[
        ("Standard", 0),
        ("Music", 1),
        ("Movie", 2),
        ("Clear Voice", 3),
        ("Custom", 4),
        ("Amplify", 5),
        ("Adaptive Sound", 7),
    ],
);
