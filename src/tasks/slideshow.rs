pub mod state;

use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::collection::Collection;
use crate::config::SlideshowOptions;
use crate::events::{SlideFrame, SlideshowCommand};
use state::SlideshowState;

/// Drives one collection's slideshow until cancelled or the command side hangs up.
///
/// Rules:
/// - One frame is sent for the initial slide and one per state-changing
///   command or deadline; nothing is sent for an empty collection.
/// - Keyboard and pointer commands are only honoured while this task runs,
///   and every deadline dies with it.
pub async fn run(
    collection: Arc<Collection>,
    options: SlideshowOptions,
    mut commands: Receiver<SlideshowCommand>,
    frames: Sender<SlideFrame>,
    cancel: CancellationToken,
) -> Result<()> {
    if collection.is_empty() {
        debug!(owner = %collection.owner, "empty collection; nothing to present");
        return Ok(());
    }

    let mut state = SlideshowState::new(collection.len(), &options, now());
    if !emit(&state, &collection, &frames).await {
        return Ok(());
    }

    loop {
        let deadline = state.next_deadline();
        let changed = select! {
            _ = cancel.cancelled() => break,

            maybe_cmd = commands.recv() => {
                let Some(cmd) = maybe_cmd else {
                    debug!("slideshow command channel closed");
                    break;
                };
                match cmd {
                    SlideshowCommand::Key(key) => {
                        let outcome = state.handle_key(key, now());
                        trace!(?key, handled = outcome.handled, changed = outcome.changed, prevent_default = outcome.prevent_default, "key");
                        outcome.changed
                    }
                    other => {
                        trace!(command = ?other, "slideshow command");
                        state.apply(other, now())
                    }
                }
            }

            _ = wait_until(deadline) => state.on_tick(now()),
        };

        if changed && !emit(&state, &collection, &frames).await {
            break;
        }
    }

    Ok(())
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

async fn wait_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(at) => sleep_until(Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

async fn emit(state: &SlideshowState, collection: &Collection, frames: &Sender<SlideFrame>) -> bool {
    let Some(frame) = state.frame(&collection.items) else {
        return true;
    };
    if frames.send(frame).await.is_err() {
        warn!("viewer channel closed");
        return false;
    }
    true
}
