use clap::Subcommand;
use stenocombo_core::config::FIELDS;
use stenocombo_core::{
    ColorMilestoneTable, ComboConfig, ConfigError, ConfigOverrides, Field, FieldKind, FieldValue,
    Platform,
};

use super::{load_settings, save_settings};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "cooldown_duration", "alignment")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value. Color tables may use "\n" between lines.
        value: String,
    },
    /// List all config values
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults, keeping the high score
    Reset,
    /// Describe every config field
    Fields {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn field(key: &str) -> Result<Field, ConfigError> {
    Field::from_key(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

/// One-line rendering; color tables are shown with escaped newlines.
fn inline(value: &FieldValue) -> String {
    value.to_string().replace('\n', "\\n")
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let field = field(&key)?;
            let (_, config) = load_settings()?;
            println!("{}", config.get(field));
        }
        ConfigAction::Set { key, value } => {
            let field = field(&key)?;
            let parsed = FieldValue::parse_for(field, &value)?;
            let (mut store, config) = load_settings()?;
            let next = config.with_overrides(&ConfigOverrides::new().with(field, parsed))?;
            if let Some(range) = field.range() {
                if let FieldValue::Int(v) = next.get(field) {
                    if !range.contains(v) {
                        return Err(ConfigError::OutOfRange {
                            key,
                            value: v,
                            min: range.min,
                            max: range.max,
                        }
                        .into());
                    }
                }
            }
            if field.kind() == FieldKind::ColorTable {
                let (_, skipped) = ColorMilestoneTable::parse_with_diagnostics(&next.combo_colors);
                for line in &skipped {
                    eprintln!(
                        "warning: line {} ignored ({}): {}",
                        line.line_no,
                        line.reason.description(),
                        line.text
                    );
                }
            }
            save_settings(&mut store, &next)?;
            tracing::info!(key = field.key(), "setting updated");
            println!("ok");
        }
        ConfigAction::List { json } => {
            let (_, config) = load_settings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for field in Field::all() {
                    println!("{} = {}", field.key(), inline(&config.get(field)));
                }
            }
        }
        ConfigAction::Reset => {
            let (mut store, config) = load_settings()?;
            let defaults = ComboConfig {
                highscore: config.highscore,
                ..ComboConfig::defaults_for(Platform::current())
            };
            store.clear();
            save_settings(&mut store, &defaults)?;
            println!("config reset to defaults");
        }
        ConfigAction::Fields { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&FIELDS)?);
                return Ok(());
            }
            for spec in &FIELDS {
                let range = match spec.range {
                    Some(r) => format!(
                        "{}..={} step {}{}",
                        r.min,
                        r.max,
                        r.step,
                        r.unit.map(|u| format!(" {u}")).unwrap_or_default()
                    ),
                    None => String::new(),
                };
                println!("{:<22} {:<28} {}", spec.key, range, spec.label);
            }
        }
    }
    Ok(())
}
