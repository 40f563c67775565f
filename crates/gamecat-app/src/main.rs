// Game catalog entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the HTTP data source
// 4. Create mpsc channels
// 5. Spawn the session controller (starts the catalog load)
// 6. Spawn the stdin reader
// 7. Print pages until the session ends

use std::io::BufRead;
use std::sync::Arc;

use gamecat_app::config;
use gamecat_app::console;
use gamecat_app::controller::{self, Controller, Input};
use gamecat_app::source::HttpSource;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Game catalog starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: source={}, start={}",
        config.source.base_url, config.navigation.start_fragment
    );

    // 3. Build the data source
    let source = Arc::new(HttpSource::new(&config.source));

    // 4. Create mpsc channels
    let (input_tx, input_rx) = mpsc::channel::<Input>(64);
    let (page_tx, mut page_rx) = mpsc::channel(16);

    // 5. Spawn the session controller
    let start_fragment = config.navigation.start_fragment.clone();
    let session = tokio::spawn(async move {
        controller::run(Controller::new(), source, start_fragment, input_rx, page_tx).await
    });

    // 6. Spawn the stdin reader on its own thread so a pending read never
    //    holds up runtime shutdown. Dropping `input_tx` at EOF ends the session.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            };
            let Some(input) = console::parse_command(&line) else {
                continue;
            };
            if input_tx.blocking_send(input).is_err() {
                break;
            }
        }
    });

    // 7. Print pages until the controller hangs up
    while let Some(page) = page_rx.recv().await {
        println!("{}", console::render_text(&page));
    }

    let final_state = session.await.context("session task panicked")?;

    info!(?final_state, "Game catalog shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the console).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gamecat.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("gamecat=info,gamecat_app=info,gamecat_core=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
