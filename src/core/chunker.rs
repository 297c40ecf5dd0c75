//! Fixed-size re-chunking of streamed response bodies

use crate::core::errors::Result;
use crate::core::storage::ArtifactSink;

/// Size of every chunk handed to a sink, except possibly the last
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Regroups arbitrarily sized network chunks into `CHUNK_SIZE` writes
#[derive(Debug)]
pub struct Rechunker {
    buf: Vec<u8>,
    chunk_size: usize,
    total: u64,
}

impl Default for Rechunker {
    fn default() -> Self {
        Self::new(CHUNK_SIZE)
    }
}

impl Rechunker {
    /// Rechunker emitting writes of `chunk_size` bytes (at least one)
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            buf: Vec::with_capacity(chunk_size),
            chunk_size,
            total: 0,
        }
    }

    /// Feed bytes, writing every full chunk to `sink`
    pub async fn push<S: ArtifactSink>(&mut self, mut data: &[u8], sink: &mut S) -> Result<()> {
        while !data.is_empty() {
            let room = self.chunk_size - self.buf.len();
            let take = room.min(data.len());
            self.buf.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.buf.len() == self.chunk_size {
                self.flush(sink).await?;
            }
        }
        Ok(())
    }

    /// Write any buffered remainder and return the total byte count
    pub async fn finish<S: ArtifactSink>(mut self, sink: &mut S) -> Result<u64> {
        self.flush(sink).await?;
        Ok(self.total)
    }

    async fn flush<S: ArtifactSink>(&mut self, sink: &mut S) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        sink.write_chunk(&self.buf).await?;
        self.total += self.buf.len() as u64;
        self.buf.clear();
        Ok(())
    }
}
