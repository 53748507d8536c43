//! Binary entrypoint for nft-frame.
//!
//! Wires the library tasks together; all behaviour lives in the library crate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use nft_frame::address::validate_address;
use nft_frame::collection::Collection;
use nft_frame::config::{Configuration, Speed};
use nft_frame::error::FetchError;
use nft_frame::events::{InputEvent, SlideshowCommand};
use nft_frame::session::{FetchTicket, Session, ViewState};
use nft_frame::tasks::{fetcher, fetcher::IndexerClient, input, slideshow, viewer};

#[derive(Debug, Parser)]
#[command(
    name = "nft-frame",
    version,
    about = "Slideshow of the NFTs held by an Ethereum wallet"
)]
struct Args {
    /// Wallet address (0x + 40 hex) or ENS name to show on startup
    #[arg(value_name = "WALLET")]
    wallet: Option<String>,
    /// Start with the built-in example wallet
    #[arg(long, conflicts_with = "wallet")]
    example: bool,
    /// Path to YAML config (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the initial autoplay speed
    #[arg(long, value_name = "PRESET")]
    speed: Option<Speed>,
    /// Start with autoplay paused
    #[arg(long)]
    paused: bool,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("nft_frame={level}").parse()?)
        .add_directive("reqwest=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

type FetchResult = (FetchTicket, Result<Collection, FetchError>);

/// The slideshow currently on screen plus the handles that tear it down.
struct ActiveShow {
    commands: mpsc::Sender<SlideshowCommand>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<Result<()>>>,
}

impl ActiveShow {
    async fn stop(self) {
        self.cancel.cancel();
        for task in self.tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("slideshow task error: {e:?}"),
                Err(e) => tracing::error!("join error: {e}"),
            }
        }
    }
}

struct App {
    cfg: Configuration,
    client: IndexerClient,
    session: Session,
    show: Option<ActiveShow>,
    fetched_tx: mpsc::Sender<FetchResult>,
    cancel: CancellationToken,
}

impl App {
    fn start_fetch(&self, ticket: FetchTicket) {
        tokio::spawn(fetcher::run(
            self.client.clone(),
            ticket,
            self.fetched_tx.clone(),
        ));
    }

    async fn stop_show(&mut self) {
        if let Some(show) = self.show.take() {
            show.stop().await;
        }
    }

    fn render_status(&self) {
        if let Some(text) = viewer::render_view(self.session.view()) {
            println!("{text}");
        }
    }

    async fn submit(&mut self, wallet: &str) {
        match self.session.submit(wallet) {
            Ok(ticket) => {
                self.stop_show().await;
                self.render_status();
                self.start_fetch(ticket);
            }
            Err(err) => println!("{err}"),
        }
    }

    async fn example(&mut self) {
        let ticket = self.session.use_example();
        self.stop_show().await;
        self.render_status();
        self.start_fetch(ticket);
    }

    async fn on_fetched(&mut self, (ticket, result): FetchResult) {
        if !self.session.complete(&ticket, result) {
            return;
        }
        match self.session.view() {
            ViewState::Showing(collection) => {
                let collection = Arc::clone(collection);
                self.show = Some(self.spawn_show(collection));
            }
            _ => self.render_status(),
        }
    }

    fn spawn_show(&self, collection: Arc<Collection>) -> ActiveShow {
        let (commands_tx, commands_rx) = mpsc::channel::<SlideshowCommand>(16); // Input -> Slideshow
        let (frames_tx, frames_rx) = mpsc::channel(4); // Slideshow -> Viewer
        let cancel = self.cancel.child_token();

        let slideshow_task = tokio::spawn({
            let collection = Arc::clone(&collection);
            let options = self.cfg.slideshow.clone();
            let cancel = cancel.clone();
            async move {
                slideshow::run(collection, options, commands_rx, frames_tx, cancel)
                    .await
                    .context("slideshow task failed")
            }
        });
        let viewer_task = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                viewer::run(collection, frames_rx, cancel)
                    .await
                    .context("viewer task failed")
            }
        });

        ActiveShow {
            commands: commands_tx,
            cancel,
            tasks: vec![slideshow_task, viewer_task],
        }
    }

    async fn run(
        mut self,
        mut input_rx: mpsc::Receiver<InputEvent>,
        mut fetched_rx: mpsc::Receiver<FetchResult>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,

                Some(result) = fetched_rx.recv() => self.on_fetched(result).await,

                maybe_event = input_rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    match event {
                        InputEvent::Slideshow(cmd) => match &self.show {
                            Some(show) => {
                                if show.commands.send(cmd).await.is_err() {
                                    warn!("slideshow no longer accepting commands");
                                }
                            }
                            None => tracing::debug!(command = ?cmd, "no slideshow on screen"),
                        },
                        InputEvent::SubmitWallet(wallet) => self.submit(&wallet).await,
                        InputEvent::ExampleWallet => self.example().await,
                        InputEvent::ChangeWallet => {
                            self.stop_show().await;
                            self.session.reset();
                            self.render_status();
                        }
                        InputEvent::Quit => break,
                    }
                }
            }
        }
        self.stop_show().await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let mut cfg = match &args.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;
    if let Some(speed) = args.speed {
        cfg.slideshow.initial_speed = speed;
    }
    if args.paused {
        cfg.slideshow.autoplay = false;
    }

    // A missing credential is fatal before anything is requested.
    let client = IndexerClient::from_config(&cfg.indexer).with_context(|| {
        format!(
            "set indexer.api-key or the {} environment variable",
            cfg.indexer.api_key_env
        )
    })?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(32); // Stdin -> App
    let (fetched_tx, fetched_rx) = mpsc::channel::<FetchResult>(8); // Fetcher -> App

    let mut app = App {
        cfg,
        client,
        session: Session::new(),
        show: None,
        fetched_tx,
        cancel: cancel.clone(),
    };

    if args.example {
        app.example().await;
    } else if let Some(wallet) = args.wallet.as_deref() {
        // A bad startup wallet ends the program; typed input only gets the field message.
        validate_address(wallet).with_context(|| format!("invalid wallet `{wallet}`"))?;
        app.submit(wallet).await;
    } else {
        app.render_status();
    }
    println!("{}", input::HELP);

    input::spawn_reader(input_tx, cancel.clone());
    app.run(input_rx, fetched_rx).await
}
