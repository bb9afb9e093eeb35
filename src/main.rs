//! Desktop GPT
//!
//! Captures a screen region, reads its text with Tesseract, asks a completion
//! API about it, and shows the answer as a desktop notification and on the
//! clipboard. Meant to be bound to a keyboard shortcut: one run, one answer.

mod capture;
mod completion;
mod config;
mod desktop;
mod notify;
mod ocr;
mod paths;
mod pipeline;
mod response;

use chrono::Local;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use completion::CompletionClient;
use config::{Config, NotificationConfig};
use desktop::Desktop;
use notify::{ClipboardSink, DesktopNotifier, SystemClipboard};
use pipeline::{Outcome, PipelineError};

#[derive(Parser, Debug)]
#[command(version, about = "Ask a completion API about text on your screen")]
struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read this image instead of capturing a screen region
    #[arg(long)]
    image: Option<PathBuf>,

    /// Do not write the answer to the clipboard
    #[arg(long)]
    no_clipboard: bool,
}

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("desktop_gpt.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> ExitCode {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    let cli = Cli::parse();

    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create log directory: {}", e);
    }

    log("Desktop GPT started");
    let outcome = run(&cli);
    log(&format!("Finished: {:?}", outcome));

    ExitCode::from(outcome.exit_code())
}

/// One full run: config → capture → OCR → completion → notification/clipboard.
fn run(cli: &Cli) -> Outcome {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let notifier = DesktopNotifier {
                timeout_secs: NotificationConfig::default().timeout,
            };
            return pipeline::report_failure(
                &PipelineError::Config(e),
                &NotificationConfig::default(),
                &notifier,
            );
        }
    };

    let notifier = DesktopNotifier {
        timeout_secs: config.notification.timeout,
    };
    let desktop = Desktop::detect();

    let question = pipeline::acquire_text(desktop, cli.image.as_deref());

    let client = match CompletionClient::new(&config.openai) {
        Ok(client) => client,
        Err(e) => {
            return pipeline::report_failure(
                &PipelineError::Network(e),
                &config.notification,
                &notifier,
            );
        }
    };

    let system_clipboard = SystemClipboard::new(config.notification.timeout);
    let clipboard: Option<&dyn ClipboardSink> = if cli.no_clipboard {
        None
    } else {
        Some(&system_clipboard)
    };

    pipeline::answer(
        &config,
        &question,
        desktop.supports_rich_notifications(),
        &client,
        &notifier,
        clipboard,
    )
}
