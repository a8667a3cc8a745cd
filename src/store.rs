use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Context, Result};

use crate::stats::StatsDocument;

pub fn parse_stats_json(raw: &str) -> Result<StatsDocument> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("stats document is empty");
    }
    serde_json::from_str(trimmed).context("invalid stats json")
}

pub fn load_stats(path: &Path) -> Result<StatsDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read stats document {}", path.display()))?;
    parse_stats_json(&raw).with_context(|| format!("parse stats document {}", path.display()))
}

/// Loads the document off the UI thread and sends the outcome exactly once.
pub fn spawn_stats_loader(path: PathBuf, tx: Sender<Result<StatsDocument>>) {
    thread::spawn(move || {
        let _ = tx.send(load_stats(&path));
    });
}
