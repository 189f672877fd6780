use stenocombo_core::{ComboDriver, ComboInput, ComboStateMachine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{load_settings, save_settings};

/// Map one stdin line to an input. Blank lines are ignored.
fn input_for(line: &str) -> Option<ComboInput> {
    match line.trim() {
        "" => None,
        "*" | "undo" => Some(ComboInput::Correction),
        _ => Some(ComboInput::Stroke),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, config) = load_settings()?;
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let machine = runtime.block_on(drive(ComboStateMachine::new(config)))?;

    save_settings(&mut store, &machine.config_for_save())?;
    tracing::info!(high_score = machine.high_score(), "session saved");
    Ok(())
}

async fn drive(machine: ComboStateMachine) -> Result<ComboStateMachine, Box<dyn std::error::Error>> {
    let (input_tx, input_rx) = mpsc::channel(64);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let driver = tokio::spawn(ComboDriver::new(machine).run(input_rx, event_tx));
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!("cannot serialize event: {e}"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(input) = input_for(&line) else {
            continue;
        };
        if input_tx.send(input).await.is_err() {
            break;
        }
    }
    drop(input_tx);

    let machine = driver.await?;
    printer.await?;
    Ok(machine)
}
