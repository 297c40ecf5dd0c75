//! Destinations for downloaded artifacts

use std::collections::HashMap;
use std::future::Future;
use std::io::{self, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::errors::Result;

/// Open handle receiving the body of one artifact.
///
/// Exactly one of `finish` or `abort` consumes the sink; dropping it
/// without either still releases the underlying handle. A `finish` that
/// fails must leave nothing behind, as if `abort` had been called.
pub trait ArtifactSink: Send {
    /// Append the next chunk of the body
    fn write_chunk(&mut self, chunk: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Flush and close after the last chunk
    fn finish(self) -> impl Future<Output = Result<()>> + Send;

    /// Close and discard whatever was written
    fn abort(self) -> impl Future<Output = Result<()>> + Send;
}

/// Factory for sinks, keyed by the resolved artifact filename
pub trait ArtifactStore: Send + Sync {
    /// Sink handed out by [`ArtifactStore::open`]
    type Sink: ArtifactSink;

    /// Open a fresh sink for `filename`
    fn open(&self, filename: &str) -> impl Future<Output = Result<Self::Sink>> + Send;
}

/// Stores artifacts as files under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `root`, created on first use
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory artifacts are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an artifact with this name is stored
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

impl ArtifactStore for DirectoryStore {
    type Sink = FileSink;

    async fn open(&self, filename: &str) -> Result<FileSink> {
        fs::create_dir_all(&self.root).await?;

        let path = self.path_for(filename);
        // Never clobber an existing file
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        debug!("Opened artifact file {}", path.display());
        Ok(FileSink { file, path })
    }
}

/// Exclusively created local file
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Location of the file being written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactSink for FileSink {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    async fn finish(self) -> Result<()> {
        let FileSink { mut file, path } = self;
        let synced = sync_file(&mut file).await;
        settle(file, &path, synced).await
    }

    async fn abort(self) -> Result<()> {
        let FileSink { file, path } = self;
        drop(file);
        remove_partial(&path).await
    }
}

async fn sync_file(file: &mut File) -> io::Result<()> {
    file.flush().await?;
    file.sync_all().await
}

/// Close `file`, deleting it when the final flush failed
async fn settle(file: File, path: &Path, synced: io::Result<()>) -> Result<()> {
    drop(file);

    if let Err(e) = synced {
        if let Err(cleanup) = remove_partial(path).await {
            debug!("Failed to remove {}: {}", path.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

async fn remove_partial(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed partial artifact {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Default, Clone)]
struct StoredArtifact {
    data: Vec<u8>,
    writes: Vec<usize>,
}

/// Keeps finished artifacts in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    artifacts: Arc<Mutex<HashMap<String, StoredArtifact>>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of a finished artifact
    pub fn contents(&self, filename: &str) -> Option<Vec<u8>> {
        self.lock().get(filename).map(|a| a.data.clone())
    }

    /// Length of every write the artifact received, in order
    pub fn write_sizes(&self, filename: &str) -> Option<Vec<usize>> {
        self.lock().get(filename).map(|a| a.writes.clone())
    }

    /// Names of all finished artifacts, sorted
    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredArtifact>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactStore for MemoryStore {
    type Sink = MemorySink;

    async fn open(&self, filename: &str) -> Result<MemorySink> {
        Ok(MemorySink {
            filename: filename.to_string(),
            pending: StoredArtifact::default(),
            store: self.artifacts.clone(),
        })
    }
}

/// Buffers one artifact until it is finished
#[derive(Debug)]
pub struct MemorySink {
    filename: String,
    pending: StoredArtifact,
    store: Arc<Mutex<HashMap<String, StoredArtifact>>>,
}

impl ArtifactSink for MemorySink {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.pending.data.extend_from_slice(chunk);
        self.pending.writes.push(chunk.len());
        Ok(())
    }

    async fn finish(self) -> Result<()> {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.filename, self.pending);
        Ok(())
    }

    async fn abort(self) -> Result<()> {
        Ok(())
    }
}
