mod action;
mod app;
mod config;
mod cursor;
mod error;
mod event;
mod feed;
mod form;
mod http;
mod list;
mod notification;
mod refresh;
mod scroll;
mod service;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::http::HttpMediaService;
use crate::list::Viewport;
use crate::tui::EventHandler;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the media API (overrides config and MARQUEE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Records fetched per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Path to a config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Log to a file so output never lands on the alternate screen.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    let log_file = dirs::cache_dir().and_then(|dir| {
        let dir = dir.join("marquee");
        std::fs::create_dir_all(&dir).ok()?;
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("marquee.log"))
            .ok()
    });

    match log_file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(size) = cli.page_size {
        config.list.page_size = size.max(1);
    }
    tracing::info!(api = %config.api.base_url, page_size = config.list.page_size, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let service = HttpMediaService::new(&config.api.base_url, config.upload_target());

    let result = run(config, service).await;

    tui::restore()?;

    result
}

async fn run(config: Config, service: HttpMediaService) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(
        Arc::new(service),
        config.list.page_size,
        config.debounce(),
        action_tx.clone(),
    );

    let tick_rate = Duration::from_millis(100);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        let mut viewport = Viewport::default();
                        terminal.draw(|frame| viewport = ui::render(frame, &app))?;
                        app.observe_viewport(viewport);
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
