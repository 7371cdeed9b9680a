use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotifyKind::Info => "INFO",
            NotifyKind::Success => "OK",
            NotifyKind::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotifyOptions {
    /// Close on its own after this many milliseconds.
    pub auto_close_ms: Option<u64>,
    /// Wait for the user to acknowledge before continuing.
    pub requires_confirmation: bool,
}

impl NotifyOptions {
    pub fn timed(ms: u64) -> Self {
        NotifyOptions {
            auto_close_ms: Some(ms),
            requires_confirmation: false,
        }
    }

    pub fn confirm() -> Self {
        NotifyOptions {
            auto_close_ms: None,
            requires_confirmation: true,
        }
    }
}

/// User-facing message sink.
pub trait Notifier {
    fn notify(&mut self, kind: NotifyKind, title: &str, message: &str, options: NotifyOptions);
}

/// Prints messages to the terminal and mirrors them to the log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, kind: NotifyKind, title: &str, message: &str, options: NotifyOptions) {
        match kind {
            NotifyKind::Error => {
                error!(title, message, "notification");
                eprintln!("[{}] {}: {}", kind, title, message);
            }
            _ => {
                info!(%kind, title, message, "notification");
                println!("[{}] {}: {}", kind, title, message);
            }
        }
        if options.requires_confirmation {
            println!("(กด Enter เพื่อดำเนินการต่อ)");
            let mut buf = String::new();
            std::io::stdin().read_line(&mut buf).ok();
        }
    }
}

/// Keeps every notification; handy for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Vec<(NotifyKind, String, String)>,
}

impl RecordingNotifier {
    pub fn kinds(&self) -> Vec<NotifyKind> {
        self.messages.iter().map(|m| m.0).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, kind: NotifyKind, title: &str, message: &str, _options: NotifyOptions) {
        self.messages.push((kind, title.to_string(), message.to_string()));
    }
}
