use clap::Subcommand;
use std::path::PathBuf;
use stenocombo_core::{ColorEntry, ColorMilestoneTable};

use super::load_settings;

#[derive(Subcommand)]
pub enum ColorsAction {
    /// Print the configured color tiers
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report lines of color text that would be ignored
    Check {
        /// Read color text from a file instead of the settings
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the tier a combo count falls in
    Lookup {
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
}

fn print_entry(entry: &ColorEntry) {
    println!(
        "{:>6}  {}  {}",
        entry.milestone,
        entry.primary.to_hex(),
        entry.secondary.to_hex()
    );
}

pub fn run(action: ColorsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ColorsAction::Show { json } => {
            let (_, config) = load_settings()?;
            let table = config.color_table();
            if json {
                println!("{}", serde_json::to_string_pretty(table.entries())?);
            } else {
                for entry in table.entries() {
                    print_entry(entry);
                }
            }
        }
        ColorsAction::Check { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => load_settings()?.1.combo_colors,
            };
            let (table, skipped) = ColorMilestoneTable::parse_with_diagnostics(&text);
            for line in &skipped {
                println!(
                    "line {}: {} ({})",
                    line.line_no,
                    line.text,
                    line.reason.description()
                );
            }
            println!("{} tiers, {} lines skipped", table.len(), skipped.len());
        }
        ColorsAction::Lookup { count } => {
            let (_, config) = load_settings()?;
            print_entry(config.color_table().lookup(count));
        }
    }
    Ok(())
}
