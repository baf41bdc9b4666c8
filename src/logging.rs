use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use crate::config::LogConfig;

/// Install a file-backed tracing subscriber.
///
/// Logs go to a file rather than stderr so they never draw over the
/// full-screen view. If the file cannot be opened, logging stays off.
pub fn init(cfg: &LogConfig, path: &Path) {
    if !cfg.enabled {
        return;
    }

    let level = parse_level(&cfg.level);
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: logging disabled, cannot open {}: {e}", path.display());
            return;
        }
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
    {
        eprintln!("warning: logging disabled, cannot install subscriber: {e}");
    }
}

/// Parse a level name, falling back to `info` for anything unrecognised.
fn parse_level(s: &str) -> Level {
    s.trim().parse().unwrap_or(Level::INFO)
}
