use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{ListingId, ProcessedIds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    NothingToClear,
}

enum Command {
    Load(oneshot::Sender<Result<ProcessedIds>>),
    Save(ProcessedIds, oneshot::Sender<Result<()>>),
    Clear(oneshot::Sender<Result<ClearOutcome>>),
}

/// Handle to the processed-id file of one feed.
///
/// A single task owns the file; loads, saves and the weekly clear are queued
/// through it and run one at a time. A clear that lands between a cycle's load
/// and save is overwritten by that save.
#[derive(Clone)]
pub struct DedupStore {
    tx: mpsc::Sender<Command>,
    path: Arc<PathBuf>,
}

impl DedupStore {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::channel::<Command>(16);
        let path = Arc::new(path);
        let owner = path.clone();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let path = owner.clone();
                match command {
                    Command::Load(reply) => {
                        let result = blocking(move || read_ids(&path)).await;
                        let _ = reply.send(result);
                    }
                    Command::Save(ids, reply) => {
                        let result = blocking(move || write_ids(&path, &ids)).await;
                        let _ = reply.send(result);
                    }
                    Command::Clear(reply) => {
                        let result = blocking(move || clear_ids(&path)).await;
                        let _ = reply.send(result);
                    }
                }
            }
            tracing::debug!(target: "store", path = %owner.display(), "dedup store task stopped");
        });

        Self { tx, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previously delivered ids; empty when the file does not exist yet.
    pub async fn load(&self) -> Result<ProcessedIds> {
        self.request(Command::Load).await
    }

    /// Replaces the file with exactly `ids`.
    pub async fn save(&self, ids: ProcessedIds) -> Result<()> {
        self.request(|reply| Command::Save(ids, reply)).await
    }

    pub async fn clear(&self) -> Result<ClearOutcome> {
        self.request(Command::Clear).await
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| anyhow!("dedup store for {} is closed", self.path.display()))?;
        response
            .await
            .map_err(|_| anyhow!("dedup store for {} dropped the request", self.path.display()))?
    }
}

async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("dedup store worker panicked")?
}

fn read_ids(path: &Path) -> Result<ProcessedIds> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(target: "store", path = %path.display(), "no previous data found");
            return Ok(ProcessedIds::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let entries: Vec<Value> = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    let mut ids = ProcessedIds::with_capacity(entries.len());
    for entry in entries {
        match decode_entry(entry) {
            Some(id) => {
                ids.insert(id);
            }
            None => {
                tracing::warn!(target: "store", path = %path.display(), "ignoring unrecognised entry");
            }
        }
    }
    tracing::info!(target: "store", path = %path.display(), count = ids.len(), "previous data loaded");
    Ok(ids)
}

/// Accepts plain ids and the legacy encoding where a string id was stored as an
/// array of its characters.
fn decode_entry(entry: Value) -> Option<ListingId> {
    match entry {
        Value::String(text) => Some(ListingId::Text(text)),
        Value::Number(number) => Some(ListingId::Number(number)),
        Value::Array(parts) if !parts.is_empty() => parts
            .iter()
            .map(|part| part.as_str())
            .collect::<Option<String>>()
            .map(ListingId::Text),
        _ => None,
    }
}

fn write_ids(path: &Path, ids: &ProcessedIds) -> Result<()> {
    let entries: Vec<&ListingId> = ids.iter().collect();
    let body = serde_json::to_vec(&entries)?;
    replace_file(path, &body)?;
    tracing::info!(target: "store", path = %path.display(), count = ids.len(), "processed ids saved");
    Ok(())
}

fn clear_ids(path: &Path) -> Result<ClearOutcome> {
    if !path.exists() {
        tracing::info!(target: "store", path = %path.display(), "nothing to clean");
        return Ok(ClearOutcome::NothingToClear);
    }
    replace_file(path, b"[]")?;
    tracing::info!(target: "store", path = %path.display(), "processed ids cleared");
    Ok(ClearOutcome::Cleared)
}

fn replace_file(path: &Path, body: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
