use std::sync::Arc;
use std::time::Duration;

use nft_frame::address::WalletId;
use nft_frame::collection::{Collection, GalleryItem, ItemId};
use nft_frame::config::{SlideshowOptions, Speed};
use nft_frame::events::{Key, SlideFrame, SlideshowCommand};
use nft_frame::tasks::slideshow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, advance, timeout};
use tokio_util::sync::CancellationToken;

fn collection(n: usize) -> Arc<Collection> {
    let items = (0..n)
        .map(|i| GalleryItem {
            id: ItemId {
                contract_address: "0xabc".into(),
                token_id: i.to_string(),
            },
            display_name: format!("#{i}"),
            collection_name: "Test".into(),
            description: None,
            image_url: format!("https://img/{i}.png"),
            raw_metadata: None,
        })
        .collect();
    Arc::new(Collection {
        owner: WalletId::example(),
        items,
        total_count: n,
    })
}

struct Harness {
    commands: mpsc::Sender<SlideshowCommand>,
    frames: mpsc::Receiver<SlideFrame>,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(n: usize, options: SlideshowOptions) -> Self {
        let (commands, commands_rx) = mpsc::channel(8);
        let (frames_tx, frames) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(slideshow::run(
            collection(n),
            options,
            commands_rx,
            frames_tx,
            cancel.clone(),
        ));
        Self {
            commands,
            frames,
            cancel,
            handle,
        }
    }

    async fn send(&self, cmd: SlideshowCommand) {
        self.commands.send(cmd).await.expect("slideshow accepting commands");
    }

    async fn frame(&mut self) -> SlideFrame {
        self.frames.recv().await.expect("slideshow sent a frame")
    }

    async fn stop(self) {
        self.cancel.cancel();
        self.handle.await.unwrap().unwrap();
    }
}

fn paused_options() -> SlideshowOptions {
    SlideshowOptions {
        autoplay: false,
        ..SlideshowOptions::default()
    }
}

fn assert_near(elapsed: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
        "elapsed {elapsed:?}, expected about {expected:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn autoplay_advances_with_wraparound() {
    let start = Instant::now();
    let mut h = Harness::start(2, SlideshowOptions::default());
    assert_eq!(h.frame().await.index, 0);

    let second = h.frame().await;
    assert_eq!(second.index, 1);
    assert_near(start.elapsed(), 5000);

    let third = h.frame().await;
    assert_eq!(third.index, 0);
    assert_near(start.elapsed(), 10_000);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn speed_change_restarts_interval_without_double_fire() {
    let start = Instant::now();
    let mut h = Harness::start(4, SlideshowOptions::default());
    assert_eq!(h.frame().await.index, 0);

    advance(Duration::from_millis(4000)).await;
    h.send(SlideshowCommand::ToggleSettings).await;
    assert!(h.frame().await.settings_open);
    h.send(SlideshowCommand::SelectSpeed(Speed::Fast)).await;
    let changed = h.frame().await;
    assert_eq!(changed.speed, Speed::Fast);
    assert!(!changed.settings_open);
    assert_eq!(changed.index, 0);

    let next = h.frame().await;
    assert_eq!(next.index, 1);
    assert_near(start.elapsed(), 7000);

    let after = h.frame().await;
    assert_eq!(after.index, 2);
    assert_near(start.elapsed(), 10_000);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn thumbnail_selection_lands_in_one_frame() {
    let mut h = Harness::start(5, SlideshowOptions::default());
    h.frame().await;

    h.send(SlideshowCommand::ToggleGallery).await;
    assert!(h.frame().await.gallery_open);
    h.send(SlideshowCommand::SelectThumbnail(3)).await;

    let frame = h.frame().await;
    assert_eq!(frame.index, 3);
    assert!(!frame.playing);
    assert!(!frame.gallery_open);

    // paused: nothing else arrives
    assert!(timeout(Duration::from_secs(30), h.frames.recv()).await.is_err());
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn settings_menu_pins_fullscreen_controls() {
    let mut h = Harness::start(3, paused_options());
    h.frame().await;

    h.send(SlideshowCommand::ToggleSettings).await;
    h.frame().await;
    h.send(SlideshowCommand::Key(Key::Char('f'))).await;
    let fullscreen = h.frame().await;
    assert!(fullscreen.fullscreen);
    assert!(fullscreen.controls_visible);

    // well past the 2.5s inactivity window
    assert!(timeout(Duration::from_secs(10), h.frames.recv()).await.is_err());

    h.send(SlideshowCommand::ToggleSettings).await;
    let closed = h.frame().await;
    assert!(!closed.settings_open);
    assert!(closed.controls_visible);

    let start = Instant::now();
    let hidden = h.frame().await;
    assert!(!hidden.controls_visible);
    assert_near(start.elapsed(), 2500);

    h.send(SlideshowCommand::PointerMoved).await;
    assert!(h.frame().await.controls_visible);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn space_and_escape_keys() {
    let mut h = Harness::start(3, SlideshowOptions::default());
    assert!(h.frame().await.playing);

    h.send(SlideshowCommand::Key(Key::Space)).await;
    assert!(!h.frame().await.playing);

    // escape outside fullscreen does nothing, so the next frame is from the arrow key
    h.send(SlideshowCommand::Key(Key::Escape)).await;
    h.send(SlideshowCommand::Key(Key::ArrowLeft)).await;
    let frame = h.frame().await;
    assert_eq!(frame.index, 2);
    assert!(!frame.fullscreen);
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn arrows_on_a_single_item_emit_no_frame() {
    let mut h = Harness::start(1, paused_options());
    assert_eq!(h.frame().await.index, 0);

    h.send(SlideshowCommand::Key(Key::ArrowRight)).await;
    h.send(SlideshowCommand::Key(Key::ArrowLeft)).await;
    h.send(SlideshowCommand::Key(Key::Space)).await;
    let frame = h.frame().await;
    assert_eq!(frame.index, 0);
    assert!(frame.playing);
    assert!(timeout(Duration::from_millis(100), h.frames.recv()).await.is_err());
    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn empty_collection_renders_nothing() {
    let mut h = Harness::start(0, SlideshowOptions::default());
    assert!(h.frames.recv().await.is_none());
    h.handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_the_command_side_ends_the_task() {
    let Harness {
        commands,
        mut frames,
        handle,
        ..
    } = Harness::start(1, SlideshowOptions::default());
    frames.recv().await.unwrap();
    drop(commands);
    handle.await.unwrap().unwrap();
}
