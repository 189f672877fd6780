//! Typed combo settings record.
//!
//! A [`ComboConfig`] always has a value for every field. It is built once from
//! a [`SettingsStore`] overlaid on the static defaults, replaced wholesale when
//! settings are committed, and written back on shutdown.
//!
//! The record never clamps. Values read from storage are kept as-is and
//! [`ComboConfig::validate`] reports the first out-of-range field.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::fields::{Alignment, Field, FieldKind, FieldValue, Platform, FIELDS};
use super::store::SettingsStore;
use crate::colors::{ColorMilestoneTable, DEFAULT_COLOR_TEXT};
use crate::error::ConfigError;

/// Combo counter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboConfig {
    pub highscore: i64,
    pub reset_on_undo: bool,
    /// Inactivity window in milliseconds.
    pub cooldown_duration: i64,
    pub dark_mode: bool,
    pub force_repaint: bool,
    pub bg_opacity: i64,
    pub top_margin: i64,
    pub bottom_margin: i64,
    pub horz_margin: i64,
    pub bar_width: i64,
    pub zoom_scale_percent: i64,
    pub alignment: Alignment,
    pub font_name: String,
    pub title_font_size: i64,
    pub subtitle_font_size: i64,
    pub counter_font_size: i64,
    pub shadow_x_offset: i64,
    pub shadow_y_offset: i64,
    pub shake_enabled: bool,
    /// Request a shake on every stroke, in addition to milestone and record shakes.
    pub shake_on_all: bool,
    pub shake_duration: i64,
    pub shake_count: i64,
    pub shake_intensity: i64,
    pub counter_anim_duration: i64,
    pub combo_colors: String,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            highscore: 0,
            reset_on_undo: true,
            cooldown_duration: 2000,
            dark_mode: false,
            force_repaint: false,
            bg_opacity: 0,
            top_margin: 10,
            bottom_margin: 10,
            horz_margin: 30,
            bar_width: 12,
            zoom_scale_percent: 84,
            alignment: Alignment::Center,
            font_name: "Plover Retro".into(),
            title_font_size: 15,
            subtitle_font_size: 12,
            counter_font_size: 65,
            shadow_x_offset: 2,
            shadow_y_offset: 2,
            shake_enabled: true,
            shake_on_all: false,
            shake_duration: 250,
            shake_count: 20,
            shake_intensity: 3,
            counter_anim_duration: 180,
            combo_colors: DEFAULT_COLOR_TEXT.into(),
        }
    }
}

/// A partial set of field values applied with [`ComboConfig::with_overrides`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    values: BTreeMap<Field, FieldValue>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: FieldValue) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

impl ComboConfig {
    /// Default values for the given platform.
    pub fn defaults_for(platform: Platform) -> Self {
        Self {
            force_repaint: platform == Platform::MacOs,
            ..Self::default()
        }
    }

    /// Build from storage overlaid on the platform defaults.
    ///
    /// A field is taken from `store` only if it holds a value of the field's
    /// kind; anything else falls back to the default.
    pub fn load(store: &dyn SettingsStore, platform: Platform) -> Self {
        let mut config = Self::defaults_for(platform);
        for spec in &FIELDS {
            let Some(value) = store.get(spec.key, spec.kind) else {
                continue;
            };
            if let Err(e) = config.set(spec.field, value) {
                tracing::warn!("ignoring stored value: {e}");
            }
        }
        config
    }

    /// Write every field to `store`.
    pub fn save(&self, store: &mut dyn SettingsStore) {
        for field in Field::all() {
            store.set(field.key(), self.get(field));
        }
    }

    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::Highscore => FieldValue::Int(self.highscore),
            Field::ResetOnUndo => FieldValue::Bool(self.reset_on_undo),
            Field::CooldownDuration => FieldValue::Int(self.cooldown_duration),
            Field::DarkMode => FieldValue::Bool(self.dark_mode),
            Field::ForceRepaint => FieldValue::Bool(self.force_repaint),
            Field::BgOpacity => FieldValue::Int(self.bg_opacity),
            Field::TopMargin => FieldValue::Int(self.top_margin),
            Field::BottomMargin => FieldValue::Int(self.bottom_margin),
            Field::HorzMargin => FieldValue::Int(self.horz_margin),
            Field::BarWidth => FieldValue::Int(self.bar_width),
            Field::ZoomScalePercent => FieldValue::Int(self.zoom_scale_percent),
            Field::Alignment => FieldValue::Alignment(self.alignment),
            Field::FontName => FieldValue::Text(self.font_name.clone()),
            Field::TitleFontSize => FieldValue::Int(self.title_font_size),
            Field::SubtitleFontSize => FieldValue::Int(self.subtitle_font_size),
            Field::CounterFontSize => FieldValue::Int(self.counter_font_size),
            Field::ShadowXOffset => FieldValue::Int(self.shadow_x_offset),
            Field::ShadowYOffset => FieldValue::Int(self.shadow_y_offset),
            Field::ShakeEnabled => FieldValue::Bool(self.shake_enabled),
            Field::ShakeOnAll => FieldValue::Bool(self.shake_on_all),
            Field::ShakeDuration => FieldValue::Int(self.shake_duration),
            Field::ShakeCount => FieldValue::Int(self.shake_count),
            Field::ShakeIntensity => FieldValue::Int(self.shake_intensity),
            Field::CounterAnimDuration => FieldValue::Int(self.counter_anim_duration),
            Field::ComboColors => FieldValue::Text(self.combo_colors.clone()),
        }
    }

    /// Copy of this config with `overrides` applied. `self` is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] if a value does not fit its
    /// field's kind. Ranges are not checked; see [`ComboConfig::validate`].
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        for (field, value) in overrides.iter() {
            next.set(field, value.clone())?;
        }
        Ok(next)
    }

    /// Check every integer field against its range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in &FIELDS {
            let (Some(range), FieldValue::Int(value)) = (spec.range, self.get(spec.field)) else {
                continue;
            };
            if !range.contains(value) {
                return Err(ConfigError::OutOfRange {
                    key: spec.key.to_string(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Counter zoom ratio, `zoom_scale_percent / 100`.
    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale_percent as f64 / 100.0
    }

    /// Cooldown as a duration. Negative values read as zero.
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.cooldown_duration).unwrap_or(0))
    }

    /// Stored high score as a counter value. Negative values read as zero.
    pub fn high_score(&self) -> u32 {
        u32::try_from(self.highscore.max(0)).unwrap_or(u32::MAX)
    }

    /// Parse `combo_colors` into a milestone table.
    pub fn color_table(&self) -> ColorMilestoneTable {
        ColorMilestoneTable::parse(&self.combo_colors)
    }

    fn set(&mut self, field: Field, value: FieldValue) -> Result<(), ConfigError> {
        let mismatch = || ConfigError::TypeMismatch {
            key: field.key().to_string(),
            expected: field.kind().name(),
        };
        if !value.fits(field.kind()) {
            return Err(mismatch());
        }

        match (field, value) {
            (Field::ResetOnUndo, FieldValue::Bool(v)) => self.reset_on_undo = v,
            (Field::DarkMode, FieldValue::Bool(v)) => self.dark_mode = v,
            (Field::ForceRepaint, FieldValue::Bool(v)) => self.force_repaint = v,
            (Field::ShakeEnabled, FieldValue::Bool(v)) => self.shake_enabled = v,
            (Field::ShakeOnAll, FieldValue::Bool(v)) => self.shake_on_all = v,
            (Field::Alignment, FieldValue::Alignment(v)) => self.alignment = v,
            (Field::FontName, FieldValue::Text(v)) => self.font_name = v,
            (Field::ComboColors, FieldValue::Text(v)) => self.combo_colors = v,
            (field, FieldValue::Int(v)) => *self.int_slot(field).ok_or_else(mismatch)? = v,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn int_slot(&mut self, field: Field) -> Option<&mut i64> {
        let slot = match field {
            Field::Highscore => &mut self.highscore,
            Field::CooldownDuration => &mut self.cooldown_duration,
            Field::BgOpacity => &mut self.bg_opacity,
            Field::TopMargin => &mut self.top_margin,
            Field::BottomMargin => &mut self.bottom_margin,
            Field::HorzMargin => &mut self.horz_margin,
            Field::BarWidth => &mut self.bar_width,
            Field::ZoomScalePercent => &mut self.zoom_scale_percent,
            Field::TitleFontSize => &mut self.title_font_size,
            Field::SubtitleFontSize => &mut self.subtitle_font_size,
            Field::CounterFontSize => &mut self.counter_font_size,
            Field::ShadowXOffset => &mut self.shadow_x_offset,
            Field::ShadowYOffset => &mut self.shadow_y_offset,
            Field::ShakeDuration => &mut self.shake_duration,
            Field::ShakeCount => &mut self.shake_count,
            Field::ShakeIntensity => &mut self.shake_intensity,
            Field::CounterAnimDuration => &mut self.counter_anim_duration,
            _ => return None,
        };
        Some(slot)
    }
}
