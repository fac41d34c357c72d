use std::path::Path;

use anyhow::{Context, Result, anyhow};
use gazeui::{Button, Config, EventHandler, Label, LogConfig, Panel, Session, Window};
use smol::Unblock;
use smol::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use smol::stream::StreamExt;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path}"))?,
        None => Config::default(),
    };
    let _guard = init_logging(&config.log)?;

    info!("gazeui starting");
    let window = build_demo(&config)?;
    let mut session = Session::new(window);
    let result = smol::block_on(run(&mut session));
    info!("gazeui shutting down");
    result
}

/// Logs go to the configured file, or to stderr when none is set.
/// The returned guard flushes the file writer when dropped.
fn init_logging(log: &LogConfig) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the configured directive
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)?,
    };

    match &log.file {
        Some(file) => {
            let directory = file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = file
                .file_name()
                .ok_or_else(|| anyhow!("log file {} has no file name", file.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(gazeui::color::stderr_supports_colors())
                .init();
            Ok(None)
        }
    }
}

/// A counter and an editable list of labels.
fn build_demo(config: &Config) -> Result<Window> {
    let mut window = Window::with_title(config, "GazeUI demo")?;
    let root = window.root();

    let counter = window.append(root, Label::new("0"))?;
    let items = window.append(root, Panel::new())?;

    let increment = EventHandler::new(move |window, _| {
        let label = window.label_mut(counter)?;
        let count: u64 = label.text().parse()?;
        label.set_text((count + 1).to_string());
        window.set_title(format!("GazeUI demo ({})", count + 1))?;
        Ok(())
    });
    let add_item = EventHandler::new(move |window, _| {
        let number = window.children(items)?.len() + 1;
        window.append(items, Label::new(format!("Item {number}")))?;
        Ok(())
    });
    let reverse = EventHandler::new(move |window, _| {
        let mut order = window.children(items)?.to_vec();
        order.reverse();
        window.clear_children(items)?;
        window.extend_children(items, order)?;
        Ok(())
    });
    let remove_first = EventHandler::new(move |window, _| {
        if window.child_at(items, 0)?.is_some() {
            window.remove_child_at(items, 0)?;
        }
        Ok(())
    });

    window.append(root, Button::new("Increment").on_click(increment))?;
    window.append(root, Button::new("Add item").on_click(add_item))?;
    window.append(root, Button::new("Reverse").on_click(reverse))?;
    window.append(root, Button::new("Remove first").on_click(remove_first))?;
    Ok(window)
}

/// Prints the initial payload, then answers one JSON event per stdin line.
async fn run(session: &mut Session) -> Result<()> {
    let mut stdout = Unblock::new(std::io::stdout());
    let mut lines = BufReader::new(Unblock::new(std::io::stdin())).lines();

    let payload = session.initial_payload();
    stdout.write_all(payload.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next().await {
        let line = line?;
        let body = line.trim();
        if body.is_empty() {
            continue;
        }

        let output = match session.handle_json(body) {
            Ok(payload) => payload,
            Err(err) => {
                let message = format!("// {err}");
                error!("{:#}", anyhow::Error::from(err));
                message
            }
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}
