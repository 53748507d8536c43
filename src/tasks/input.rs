use std::io::{self, BufRead};

use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Speed;
use crate::events::{InputEvent, Key, PointerTarget, SlideshowCommand};

/// Maps one terminal line to an input event; `None` for anything unrecognized.
pub fn parse_line(line: &str) -> Option<InputEvent> {
    let line = line.trim();
    let key = |k| Some(InputEvent::Slideshow(SlideshowCommand::Key(k)));
    let cmd = |c| Some(InputEvent::Slideshow(c));

    if line.is_empty() {
        return key(Key::Space);
    }
    if let Some(speed) = Speed::parse(line) {
        return cmd(SlideshowCommand::SelectSpeed(speed));
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match (head.to_ascii_lowercase().as_str(), rest) {
        ("n" | "right", "") => key(Key::ArrowRight),
        ("p" | "left", "") => key(Key::ArrowLeft),
        ("space", "") => key(Key::Space),
        ("f", "") => key(Key::Char(head.chars().next().unwrap_or('f'))),
        ("esc" | "escape", "") => key(Key::Escape),
        ("s" | "settings", "") => cmd(SlideshowCommand::ToggleSettings),
        ("click", "") => cmd(SlideshowCommand::PointerDown(PointerTarget::Elsewhere)),
        ("move", "") => cmd(SlideshowCommand::PointerMoved),
        ("g" | "gallery", "") => cmd(SlideshowCommand::ToggleGallery),
        ("g" | "gallery", n) => {
            let position: usize = n.parse().ok()?;
            cmd(SlideshowCommand::SelectThumbnail(position.checked_sub(1)?))
        }
        ("scroll", y) => cmd(SlideshowCommand::GalleryScrolled(y.parse().ok()?)),
        ("w" | "wallet", wallet) => Some(InputEvent::SubmitWallet(wallet.to_owned())),
        ("example", "") => Some(InputEvent::ExampleWallet),
        ("change", "") => Some(InputEvent::ChangeWallet),
        ("q" | "quit", "") => Some(InputEvent::Quit),
        _ => None,
    }
}

pub const HELP: &str = "\
keys: n/right  p/left  <enter>/space play-pause  f fullscreen  esc exit fullscreen
      s settings  slow|normal|fast|very-fast  click (outside)  move (pointer)
      g gallery  g <n> pick thumbnail  scroll <y>
      w <address|name.eth>  example  change  q";

/// Reads stdin lines on a blocking thread and forwards parsed events.
pub fn spawn_reader(events: Sender<InputEvent>, cancel: CancellationToken) {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            if cancel.is_cancelled() {
                break;
            }
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            };
            match parse_line(&line) {
                Some(event) => {
                    if events.blocking_send(event).is_err() {
                        break;
                    }
                }
                None => debug!(input = %line, "ignored input"),
            }
        }
        info!("stdin closed; initiating shutdown");
        cancel.cancel();
    });
}
