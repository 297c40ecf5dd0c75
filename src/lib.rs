//! Translate Client - async client for a remote translation service
//!
//! This library submits text to the service's translate endpoint and
//! downloads the documents it generates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::TranslationClient,
    config::ClientConfig,
    disposition::DEFAULT_FILENAME,
    errors::{ClientError, ErrorKind, Result},
    models::{
        ArtifactReference, DownloadedArtifact, OutputFormat, TranslationRequest,
        TranslationResult,
    },
    storage::{ArtifactSink, ArtifactStore, DirectoryStore, MemoryStore},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
