//! Cooperative poll loop.
//!
//! ```text
//! ┌──────────┐
//! │ Buttons  │──forward_buttons──┐
//! └──────────┘                   ▼
//! ┌──────────┐           ┌───────────────┐        ┌──────────────────┐
//! │ Console  │──────────►│ Event Channel │──run──►│ AccessController │
//! └──────────┘           │ (mpsc)        │   ▲    └──────────────────┘
//!                        └───────────────┘   │
//!                          tick interval ────┘
//! ```
//!
//! Events are handled one at a time in arrival order. The controller is
//! ticked before and after every event and on every interval tick, so the
//! auto-relock deadline is checked on each iteration of the loop.

use crate::controller::AccessController;
use crate::event::{EventReport, LockEvent};
use lockin_hardware::{ButtonSource, LockActuator};
use lockin_network::{NetworkLink, RemoteAuthority};
use lockin_storage::CredentialStore;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Drive `controller` until the event channel closes.
///
/// Each handled event produces one [`EventReport`] on `reports`. A dropped
/// report receiver does not stop the loop.
pub async fn run<A, S, L, N>(
    controller: &mut AccessController<A, S, L, N>,
    mut events: mpsc::Receiver<LockEvent>,
    reports: mpsc::Sender<EventReport>,
) where
    A: RemoteAuthority,
    S: CredentialStore,
    L: LockActuator,
    N: NetworkLink,
{
    let mut ticker = time::interval(controller.config().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Control loop started");
    loop {
        tokio::select! {
            biased;

            event = events.recv() => {
                let Some(event) = event else {
                    info!("Event channel closed, control loop stopping");
                    break;
                };
                trace!("Handling event");

                controller.tick(Instant::now()).await;
                let report = controller.handle(event, Instant::now()).await;
                controller.tick(Instant::now()).await;

                if reports.send(report).await.is_err() {
                    debug!("Report receiver dropped");
                }
            }
            _ = ticker.tick() => {
                let report = controller.tick(Instant::now()).await;
                if !report.is_idle() {
                    debug!(?report, "Tick");
                }
            }
        }
    }
}

/// Translate button presses into events until either side closes.
pub async fn forward_buttons<B: ButtonSource>(mut buttons: B, events: mpsc::Sender<LockEvent>) {
    loop {
        let press = match buttons.next_press().await {
            Ok(press) => press,
            Err(e) => {
                debug!(error = %e, "Button source closed");
                break;
            }
        };

        debug!(?press, "Button pressed");
        if events.send(LockEvent::from(press)).await.is_err() {
            debug!("Event channel closed, no longer forwarding buttons");
            break;
        }
    }
}
