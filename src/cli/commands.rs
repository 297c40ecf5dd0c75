//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::core::client::TranslationClient;
use crate::core::models::{ArtifactReference, OutputFormat, TranslationRequest};
use crate::core::storage::DirectoryStore;

/// Commands for the translation service client
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a piece of text
    Translate {
        /// Text to translate (required)
        #[arg(short, long)]
        text: String,

        /// Output format: word or plain (default: word)
        #[arg(short, long, default_value = "word", value_parser = parse_format)]
        format: OutputFormat,

        /// Ask for a vocabulary list alongside the translation
        #[arg(long)]
        vocabulary: bool,

        /// Download the generated document, if the server produced one
        #[arg(short, long)]
        download: bool,
    },

    /// Download a previously generated document
    Download {
        /// Server-side file reference, e.g. download/20251105/translate_<id>.docx
        #[arg(short, long)]
        file_url: String,

        /// Output directory (default: configured download directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    raw.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Handle translate command
pub async fn handle_translate(
    client: &TranslationClient,
    text: String,
    format: OutputFormat,
    vocabulary: bool,
    download: bool,
    timeout: Duration,
) -> anyhow::Result<()> {
    let request = TranslationRequest::new(text, format)?.with_vocabulary(vocabulary);

    info!("Translating {} characters", request.text().chars().count());
    info!("Output format: {}", format);
    info!("Include vocabulary: {}", vocabulary);

    let result = client.translate(&request, timeout).await?;
    println!("{}", serde_json::to_string_pretty(result.as_map())?);

    if result.success() == Some(false) {
        eprintln!(
            "⚠️  Server reported failure: {}",
            result.translation().unwrap_or("no details")
        );
    }

    if download {
        match result.word_document_url() {
            Some(file_ref) => {
                let dir = client.config().download_dir.clone();
                handle_download(client, file_ref, dir, timeout).await?;
            }
            None => println!("No document to download"),
        }
    }

    Ok(())
}

/// Handle download command
pub async fn handle_download(
    client: &TranslationClient,
    file_ref: ArtifactReference,
    output_dir: PathBuf,
    timeout: Duration,
) -> anyhow::Result<()> {
    info!("Downloading {}", file_ref);
    info!("Output directory: {}", output_dir.display());

    let store = DirectoryStore::new(output_dir);
    let artifact = client
        .download_artifact_to(&file_ref, timeout, &store)
        .await?;

    println!("✅ Downloaded: {}", store.path_for(&artifact.filename).display());
    println!("   Bytes: {}", artifact.bytes_written);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("Word").unwrap(), OutputFormat::Word);
        assert!(parse_format("docx").unwrap_err().contains("docx"));
    }
}
