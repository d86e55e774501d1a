use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    // RUST_LOG wins, e.g. RUST_LOG=destinations_chat=debug
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to a file. The terminal belongs to the TUI while it runs.
pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
