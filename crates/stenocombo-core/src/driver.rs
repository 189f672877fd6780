//! Real-time event loop around [`ComboStateMachine`].
//!
//! Inputs and cooldown expiry are handled on one task, in arrival order. The
//! pending cooldown is a single `sleep_until` on the machine's current
//! deadline, rebuilt every iteration, so a restarted cooldown replaces the old
//! sleep and a cancelled one never fires. An input handled after the deadline
//! still sees the expiry first, since the machine delivers it on the input.

use std::time::Instant;
use tokio::sync::mpsc;

use crate::events::ComboEvent;
use crate::machine::{ComboInput, ComboStateMachine};

pub struct ComboDriver {
    machine: ComboStateMachine,
}

impl ComboDriver {
    pub fn new(machine: ComboStateMachine) -> Self {
        Self { machine }
    }

    pub fn machine(&self) -> &ComboStateMachine {
        &self.machine
    }

    /// Process inputs until the input channel closes, forwarding every event
    /// to `events`. Returns the machine so the caller can persist it.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<ComboInput>,
        events: mpsc::UnboundedSender<ComboEvent>,
    ) -> ComboStateMachine {
        loop {
            let deadline = self
                .machine
                .cooldown_deadline()
                .map(tokio::time::Instant::from_std);

            tokio::select! {
                // Inputs first; the machine delivers any expiry already due.
                biased;

                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    let produced = self.machine.handle(input, now());
                    forward(&events, produced);
                }
                _ = sleep_until(deadline) => {
                    let produced = self.machine.tick(now());
                    forward(&events, produced);
                }
            }
        }

        tracing::debug!("input channel closed, driver stopping");
        self.machine
    }
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn forward(events: &mpsc::UnboundedSender<ComboEvent>, produced: Vec<ComboEvent>) {
    for event in produced {
        if events.send(event).is_err() {
            tracing::debug!("event receiver dropped");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComboConfig;
    use crate::events::ResetReason;
    use std::time::Duration;

    fn spawn_driver() -> (
        mpsc::Sender<ComboInput>,
        mpsc::UnboundedReceiver<ComboEvent>,
        tokio::task::JoinHandle<ComboStateMachine>,
    ) {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let machine = ComboStateMachine::new(ComboConfig::default());
        let handle = tokio::spawn(ComboDriver::new(machine).run(input_rx, event_tx));
        (input_tx, event_rx, handle)
    }

    async fn next_reset(events: &mut mpsc::UnboundedReceiver<ComboEvent>) -> (ResetReason, u32) {
        while let Some(event) = events.recv().await {
            if let ComboEvent::ComboReset {
                reason,
                final_count,
                ..
            } = event
            {
                return (reason, final_count);
            }
        }
        panic!("event stream ended without a reset");
    }

    #[tokio::test(start_paused = true)]
    async fn idle_combo_decays_after_cooldown() {
        let start = tokio::time::Instant::now();
        let (tx, mut events, handle) = spawn_driver();
        for _ in 0..3 {
            tx.send(ComboInput::Stroke).await.unwrap();
        }

        let (reason, final_count) = next_reset(&mut events).await;
        assert_eq!(reason, ResetReason::CooldownExpired);
        assert_eq!(final_count, 3);
        assert!(start.elapsed() >= Duration::from_millis(2000));

        drop(tx);
        let machine = handle.await.unwrap();
        assert_eq!(machine.counter(), 0);
        assert_eq!(machine.high_score(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restarted_cooldown_fires_once_from_second_start() {
        let start = tokio::time::Instant::now();
        let (tx, mut events, handle) = spawn_driver();

        tx.send(ComboInput::Stroke).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tx.send(ComboInput::Stroke).await.unwrap();

        let (reason, final_count) = next_reset(&mut events).await;
        assert_eq!(reason, ResetReason::CooldownExpired);
        assert_eq!(final_count, 2);
        assert!(start.elapsed() >= Duration::from_millis(3500));

        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(tx);
        handle.await.unwrap();

        let mut resets = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, ComboEvent::ComboReset { .. }) {
                resets += 1;
            }
        }
        assert_eq!(resets, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stroke_queued_after_deadline_starts_new_combo() {
        let (tx, mut events, handle) = spawn_driver();
        tx.send(ComboInput::Stroke).await.unwrap();
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(3000)).await;
        tx.try_send(ComboInput::Stroke).unwrap();
        drop(tx);
        let machine = handle.await.unwrap();

        assert_eq!(machine.counter(), 1);
        let mut resets = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ComboEvent::ComboReset {
                reason,
                final_count,
                ..
            } = event
            {
                resets.push((reason, final_count));
            }
        }
        assert_eq!(resets, vec![(ResetReason::CooldownExpired, 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn correction_cancels_pending_expiry() {
        let (tx, mut events, handle) = spawn_driver();
        tx.send(ComboInput::Stroke).await.unwrap();
        tx.send(ComboInput::Correction).await.unwrap();

        let (reason, final_count) = next_reset(&mut events).await;
        assert_eq!(reason, ResetReason::Correction);
        assert_eq!(final_count, 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(tx);
        handle.await.unwrap();
        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, ComboEvent::ComboReset { .. }));
        }
    }
}
