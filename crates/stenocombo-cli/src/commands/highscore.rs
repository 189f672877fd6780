use clap::Subcommand;

use super::{load_settings, save_settings};

#[derive(Subcommand)]
pub enum HighscoreAction {
    /// Print the stored high score
    Show,
    /// Set the stored high score back to zero
    Reset,
}

pub fn run(action: HighscoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, mut config) = load_settings()?;
    match action {
        HighscoreAction::Show => {
            println!("{}", config.high_score());
        }
        HighscoreAction::Reset => {
            let previous = config.high_score();
            config.highscore = 0;
            save_settings(&mut store, &config)?;
            tracing::info!(previous, "high score cleared");
            println!("high score reset (was {previous})");
        }
    }
    Ok(())
}
