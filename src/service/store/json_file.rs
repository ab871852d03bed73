//! Flat JSON file implementation of the reaction store.
//!
//! The whole map is rewritten on every update. Writes are handed to a single background
//! task, which coalesces whatever is queued into one write of the current map.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument};

use crate::base::types::{Reaction, Res, Void};

use super::{GenericReactionStore, ReactionStore};

// Types.

/// The persisted mapping from message ID to reactions.
pub type ReactionMap = BTreeMap<String, Vec<Reaction>>;

/// A unit of work for the background writer.
enum WriteJob {
    /// Fire-and-forget snapshot write.
    Persist,
    /// Snapshot write whose result is reported back.
    Flush(oneshot::Sender<Void>),
}

// Extra methods on `ReactionStore` applied by the json file implementation.

impl ReactionStore {
    /// Loads (or creates) a JSON file backed reaction store.
    pub async fn json_file(path: impl AsRef<Path>) -> Res<Self> {
        let store = JsonFileReactionStore::load(path).await?;
        Ok(Self { inner: Arc::new(store) })
    }
}

// Specific implementations.

/// Reaction store mirrored to a single JSON file.
pub struct JsonFileReactionStore {
    path: PathBuf,
    map: Arc<Mutex<ReactionMap>>,
    writer: mpsc::UnboundedSender<WriteJob>,
}

impl JsonFileReactionStore {
    /// Reads the store file, or creates it empty if it doesn't exist yet.
    ///
    /// Fails if the file exists but can't be read or parsed, or if it can't be created.
    #[instrument(name = "JsonFileReactionStore::load", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref().to_path_buf();

        let map = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<ReactionMap>(&content).with_context(|| format!("Failed to parse reaction store `{}`", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Reaction store not found, creating an empty one.");

                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    tokio::fs::create_dir_all(parent).await.with_context(|| format!("Failed to create directory `{}`", parent.display()))?;
                }

                let map = ReactionMap::new();
                write_snapshot(&path, &map).await?;
                map
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read reaction store `{}`", path.display())),
        };

        info!("Loaded {} cached messages.", map.len());

        let map = Arc::new(Mutex::new(map));

        let (writer, jobs) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(path.clone(), map.clone(), jobs));

        Ok(Self { path, map, writer })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn snapshot(&self) -> ReactionMap {
        snapshot(&self.map)
    }
}

#[async_trait]
impl GenericReactionStore for JsonFileReactionStore {
    fn get(&self, message_id: &str) -> Option<Vec<Reaction>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner).get(message_id).cloned()
    }

    fn put(&self, message_id: &str, reactions: Vec<Reaction>) {
        self.map.lock().unwrap_or_else(PoisonError::into_inner).insert(message_id.to_string(), reactions);

        if self.writer.send(WriteJob::Persist).is_err() {
            error!("Reaction store writer has stopped; `{}` is only cached in memory.", message_id);
        }
    }

    fn len(&self) -> usize {
        self.map.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    async fn flush(&self) -> Void {
        let (ack, done) = oneshot::channel();

        self.writer
            .send(WriteJob::Flush(ack))
            .map_err(|_| anyhow::anyhow!("Reaction store writer has stopped."))?;

        done.await?
    }
}

// Helpers.

/// Point-in-time copy of the map.
fn snapshot(map: &Mutex<ReactionMap>) -> ReactionMap {
    map.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Background writer loop; runs until the store is dropped and returns the number of writes.
///
/// Every job already queued when a write starts is served by that one write, since the
/// map it copies includes all the updates those jobs were scheduled for.
async fn run_writer(path: PathBuf, map: Arc<Mutex<ReactionMap>>, mut jobs: mpsc::UnboundedReceiver<WriteJob>) -> usize {
    let mut writes = 0;

    while let Some(job) = jobs.recv().await {
        let mut acks = Vec::new();
        if let WriteJob::Flush(ack) = job {
            acks.push(ack);
        }

        while let Ok(job) = jobs.try_recv() {
            if let WriteJob::Flush(ack) = job {
                acks.push(ack);
            }
        }

        let result = write_snapshot(&path, &snapshot(&map)).await;
        writes += 1;

        if let Err(e) = &result {
            error!("Can't store reaction cache: {:#}", e);
        }

        for ack in acks {
            let _ = ack.send(result.as_ref().map(|_| ()).map_err(|e| anyhow::anyhow!("{:#}", e)));
        }
    }

    debug!("Reaction store writer stopped after {} writes.", writes);

    writes
}

/// Writes the whole map next to the target, then renames it into place.
async fn write_snapshot(path: &Path, map: &ReactionMap) -> Void {
    let bytes = serde_json::to_vec(map)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes).await.with_context(|| format!("Failed to write `{}`", tmp.display()))?;
    tokio::fs::rename(&tmp, path).await.with_context(|| format!("Failed to replace `{}`", path.display()))?;

    Ok(())
}

// Tests.
