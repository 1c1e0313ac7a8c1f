use std::sync::mpsc::{self, Receiver, Sender};
use tracing_subscriber::EnvFilter;

/// Forwards formatted log lines to the log panel so they never touch the
/// alternate screen.
#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Headless runs log to stderr; the TUI gets
/// a receiver for the in-app log panel.
pub fn init(debug: bool, headless: bool) -> Option<Receiver<String>> {
    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter(debug))
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .compact()
        .with_ansi(false)
        .without_time()
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();
    Some(log_rx)
}
