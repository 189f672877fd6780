//! Static field table for [`ComboConfig`](super::ComboConfig).
//!
//! Every setting has one row here: its storage key, display label, section,
//! value kind and (for integers) an inclusive range with step and unit.
//! The table is walked once on load and save; nothing is looked up by
//! reflection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Horizontal anchor the widget keeps fixed when its width changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left edge fixed, expands right.
    Left,
    #[default]
    Center,
    /// Right edge fixed, expands left.
    Right,
}

impl Alignment {
    pub const ALL: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Alignment::Left => "Align Left (Expand Right)",
            Alignment::Center => "Align Center",
            Alignment::Right => "Align Right (Expand Left)",
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            Alignment::Left => 0,
            Alignment::Center => 1,
            Alignment::Right => 2,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl FromStr for Alignment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(Alignment::from_index)
                .ok_or(()),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host operating system, injected at construction for platform defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Int,
    Text,
    Alignment,
    /// Multi-line color milestone text.
    ColorTable,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "a boolean",
            FieldKind::Int => "an integer",
            FieldKind::Text => "text",
            FieldKind::Alignment => "left, center or right",
            FieldKind::ColorTable => "color table text",
        }
    }
}

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Alignment(Alignment),
    Text(String),
}

impl FieldValue {
    /// Whether this value can be stored in a field of `kind`.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Bool(_), FieldKind::Bool)
                | (FieldValue::Int(_), FieldKind::Int)
                | (FieldValue::Alignment(_), FieldKind::Alignment)
                | (FieldValue::Text(_), FieldKind::Text | FieldKind::ColorTable)
        )
    }

    /// Parse user-typed text into a value for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the text is not a valid value
    /// of the field's kind. Range is not checked here.
    pub fn parse_for(field: Field, text: &str) -> Result<Self, ConfigError> {
        let spec = field.spec();
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: spec.key.to_string(),
            value: text.to_string(),
            message: message.to_string(),
        };

        match spec.kind {
            FieldKind::Bool => text
                .trim()
                .parse::<bool>()
                .map(FieldValue::Bool)
                .map_err(|_| invalid("expected true or false")),
            FieldKind::Int => text
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| invalid("expected an integer")),
            FieldKind::Alignment => text
                .parse::<Alignment>()
                .map(FieldValue::Alignment)
                .map_err(|_| invalid("expected left, center or right")),
            // Escaped newlines let a color table be typed on one line.
            FieldKind::ColorTable => Ok(FieldValue::Text(text.replace("\\n", "\n"))),
            FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Alignment(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

/// Inclusive numeric range with input granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub unit: Option<&'static str>,
}

impl FieldRange {
    const fn new(min: i64, max: i64, step: i64, unit: Option<&'static str>) -> Self {
        Self {
            min,
            max,
            step,
            unit,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// For callers that prefer clamping over rejecting.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

/// Settings group, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Persisted but not user-editable.
    Hidden,
    Combo,
    Display,
    Font,
    Animation,
    Colors,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Hidden => "Internal",
            Section::Combo => "Combo Settings",
            Section::Display => "Display Settings",
            Section::Font => "Font Settings (Requires Restart)",
            Section::Animation => "Animation Settings",
            Section::Colors => "Combo Colors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Highscore,
    ResetOnUndo,
    CooldownDuration,
    DarkMode,
    ForceRepaint,
    BgOpacity,
    TopMargin,
    BottomMargin,
    HorzMargin,
    BarWidth,
    ZoomScalePercent,
    Alignment,
    FontName,
    TitleFontSize,
    SubtitleFontSize,
    CounterFontSize,
    ShadowXOffset,
    ShadowYOffset,
    ShakeEnabled,
    ShakeOnAll,
    ShakeDuration,
    ShakeCount,
    ShakeIntensity,
    CounterAnimDuration,
    ComboColors,
}

impl Field {
    pub fn spec(self) -> &'static FieldSpec {
        // FIELDS is declared in the same order as the enum.
        &FIELDS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    pub fn range(self) -> Option<FieldRange> {
        self.spec().range
    }

    pub fn from_key(key: &str) -> Option<Self> {
        FIELDS.iter().find(|s| s.key == key).map(|s| s.field)
    }

    pub fn all() -> impl Iterator<Item = Field> {
        FIELDS.iter().map(|s| s.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the field table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub key: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
    pub range: Option<FieldRange>,
}

const fn spec(
    field: Field,
    key: &'static str,
    label: &'static str,
    section: Section,
    kind: FieldKind,
    range: Option<FieldRange>,
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        label,
        section,
        kind,
        range,
    }
}

const PX: Option<&str> = Some("px");
const MS: Option<&str> = Some("ms");

#[rustfmt::skip]
pub static FIELDS: [FieldSpec; 25] = [
    spec(Field::Highscore, "highscore", "High Score", Section::Hidden, FieldKind::Int,
        Some(FieldRange::new(0, u32::MAX as i64, 1, None))),
    spec(Field::ResetOnUndo, "reset_on_undo", "Reset Combo on Undo", Section::Combo, FieldKind::Bool, None),
    spec(Field::CooldownDuration, "cooldown_duration", "Cooldown Duration", Section::Combo, FieldKind::Int,
        Some(FieldRange::new(100, 30_000, 100, MS))),
    spec(Field::DarkMode, "dark_mode", "Dark Mode", Section::Display, FieldKind::Bool, None),
    spec(Field::ForceRepaint, "force_repaint", "Force Repaint (macOS)", Section::Display, FieldKind::Bool, None),
    spec(Field::BgOpacity, "bg_opacity", "Background Opacity (0-255)", Section::Display, FieldKind::Int,
        Some(FieldRange::new(0, 255, 1, None))),
    spec(Field::TopMargin, "top_margin", "Counter Top Margin", Section::Display, FieldKind::Int,
        Some(FieldRange::new(-300, 300, 1, PX))),
    spec(Field::BottomMargin, "bottom_margin", "Counter Bottom Margin", Section::Display, FieldKind::Int,
        Some(FieldRange::new(-300, 300, 1, PX))),
    spec(Field::HorzMargin, "horz_margin", "Counter Horizontal Margin", Section::Display, FieldKind::Int,
        Some(FieldRange::new(-300, 300, 1, PX))),
    spec(Field::BarWidth, "bar_width", "Cooldown Bar Thickness", Section::Display, FieldKind::Int,
        Some(FieldRange::new(1, 300, 1, PX))),
    spec(Field::ZoomScalePercent, "zoom_scale_percent", "Counter Normal to Enlarged Ratio", Section::Display,
        FieldKind::Int, Some(FieldRange::new(1, 100, 1, Some("%")))),
    spec(Field::Alignment, "alignment", "Widget Alignment", Section::Display, FieldKind::Alignment, None),
    spec(Field::FontName, "font_name", "Font Name", Section::Font, FieldKind::Text, None),
    spec(Field::TitleFontSize, "title_font_size", "Title Font Size", Section::Font, FieldKind::Int,
        Some(FieldRange::new(1, 300, 1, None))),
    spec(Field::SubtitleFontSize, "subtitle_font_size", "High Score Font Size", Section::Font, FieldKind::Int,
        Some(FieldRange::new(1, 300, 1, None))),
    spec(Field::CounterFontSize, "counter_font_size", "Counter Font Size", Section::Font, FieldKind::Int,
        Some(FieldRange::new(1, 300, 1, None))),
    spec(Field::ShadowXOffset, "shadow_x_offset", "Title Shadow Horizontal (X) Offset", Section::Font,
        FieldKind::Int, Some(FieldRange::new(-100, 100, 1, PX))),
    spec(Field::ShadowYOffset, "shadow_y_offset", "Title Shadow Vertical (Y) Offset", Section::Font,
        FieldKind::Int, Some(FieldRange::new(-100, 100, 1, PX))),
    spec(Field::ShakeEnabled, "shake_enabled", "Enable Shake Animation", Section::Animation, FieldKind::Bool, None),
    spec(Field::ShakeOnAll, "shake_on_all", "Shake on Every Stroke", Section::Animation, FieldKind::Bool, None),
    spec(Field::ShakeDuration, "shake_duration", "Shake Animation Duration", Section::Animation, FieldKind::Int,
        Some(FieldRange::new(10, 500, 10, MS))),
    spec(Field::ShakeCount, "shake_count", "Shake Speed", Section::Animation, FieldKind::Int,
        Some(FieldRange::new(1, 100, 1, None))),
    spec(Field::ShakeIntensity, "shake_intensity", "Shake Intensity", Section::Animation, FieldKind::Int,
        Some(FieldRange::new(1, 100, 1, PX))),
    spec(Field::CounterAnimDuration, "counter_anim_duration", "Counter Animation Duration", Section::Animation,
        FieldKind::Int, Some(FieldRange::new(10, 500, 10, MS))),
    spec(Field::ComboColors, "combo_colors", "Combo Colors", Section::Colors, FieldKind::ColorTable, None),
];
