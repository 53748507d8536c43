use std::fmt::Write as _;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;

use crate::address::WalletId;
use crate::collection::Collection;
use crate::config::Speed;
use crate::events::SlideFrame;
use crate::session::ViewState;

pub const EMPTY_MESSAGE: &str = "This wallet doesn't contain any NFTs yet.";

/// Text for a non-slideshow session state; `None` when a slideshow owns the screen.
pub fn render_view(view: &ViewState) -> Option<String> {
    match view {
        ViewState::Idle => Some("Enter a wallet address or ENS name (`w <wallet>`), or `example`.".into()),
        ViewState::Loading { wallet } => Some(format!("Loading collection for {}...", wallet.short_display())),
        ViewState::Failed { message, .. } => Some(format!("{message}\n[change] Try another wallet")),
        ViewState::Empty { total_count, .. } => {
            let mut out = String::from(EMPTY_MESSAGE);
            if *total_count > 0 {
                let _ = write!(out, " ({total_count} owned, none with an image)");
            }
            out.push_str("\n[change] Try another wallet");
            Some(out)
        }
        ViewState::Showing(_) => None,
    }
}

/// Text for one slideshow frame.
pub fn render_frame(owner: &WalletId, frame: &SlideFrame, collection: &Collection) -> String {
    let mut out = String::new();
    let item = &frame.item;

    if frame.controls_visible {
        let _ = writeln!(out, "DisToken belongs to {}", owner.short_display());
    }
    let _ = writeln!(out, "[{}/{}] {}", frame.position(), frame.count, item.image_url);

    if frame.controls_visible {
        let _ = writeln!(out, "  {}", item.display_name);
        let _ = writeln!(out, "  {}", item.collection_name);
        if let Some(description) = &item.description {
            let _ = writeln!(out, "  {description}");
        }
        let _ = writeln!(
            out,
            "  {} | {} | {}",
            if frame.playing { "playing" } else { "paused" },
            frame.speed.label(),
            if frame.fullscreen { "fullscreen" } else { "windowed" },
        );
    }

    if frame.settings_open {
        let _ = writeln!(out, "  Slideshow Speed");
        for speed in Speed::ALL {
            let marker = if *speed == frame.speed { '*' } else { ' ' };
            let _ = writeln!(out, "   {marker} {}", speed.label());
        }
    }

    if frame.gallery_open {
        if frame.gallery_header_visible {
            let _ = writeln!(out, "  Gallery ({} items)", collection.len());
        }
        for (idx, thumb) in collection.items.iter().enumerate() {
            let marker = if idx == frame.index { '>' } else { ' ' };
            let _ = writeln!(out, "   {marker}{:>3} {}", idx + 1, thumb.display_name);
        }
    }

    out
}

/// Prints frames until cancelled or the slideshow stops sending.
pub async fn run(
    collection: std::sync::Arc<Collection>,
    mut frames: Receiver<SlideFrame>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => break,
            maybe_frame = frames.recv() => {
                let Some(frame) = maybe_frame else { break };
                tracing::debug!(item = %frame.item.id, index = frame.index, "displaying");
                println!("{}", render_frame(&collection.owner, &frame, &collection));
            }
        }
    }
    Ok(())
}
