use clap::Args;
use std::path::PathBuf;
use stenocombo_core::simulation::{load_script, parse_script, SimulationHarness};

use super::load_settings;

#[derive(Args)]
pub struct SimulateArgs {
    /// Script, e.g. "stroke:9 wait 1500 s undo"
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    script: Option<String>,
    /// Read the script from a file
    #[arg(long)]
    file: Option<PathBuf>,
    /// Print only the final snapshot
    #[arg(long)]
    summary: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let steps = match (&args.script, &args.file) {
        (Some(script), _) => parse_script(script)?,
        (None, Some(path)) => load_script(path)?,
        (None, None) => return Err("no script given".into()),
    };

    // Settings are read but never written back.
    let (_, config) = load_settings()?;
    config.validate()?;
    let (report, _) = SimulationHarness::new(config).run(&steps)?;

    print!("{}", report.to_json_lines(!args.summary)?);
    Ok(())
}
