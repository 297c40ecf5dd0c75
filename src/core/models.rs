//! Request and response models for the translation service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::{ClientError, Result};

/// Output format requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Translation plus a generated Word document
    Word,
    /// Translation text only
    Plain,
}

impl OutputFormat {
    /// Wire name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Word => "word",
            OutputFormat::Plain => "plain",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word" => Ok(OutputFormat::Word),
            "plain" => Ok(OutputFormat::Plain),
            other => Err(ClientError::invalid_request(format!(
                "unsupported output format: {other}"
            ))),
        }
    }
}

/// Body of `POST /api/v1/translate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    text: String,
    output_format: OutputFormat,
    include_vocabulary: bool,
}

impl TranslationRequest {
    /// Build a request; text that is empty or only whitespace is rejected
    pub fn new(text: impl Into<String>, output_format: OutputFormat) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ClientError::invalid_request("text must not be empty"));
        }

        Ok(Self {
            text,
            output_format,
            include_vocabulary: false,
        })
    }

    /// Ask for a vocabulary list alongside the translation
    pub fn with_vocabulary(mut self, include_vocabulary: bool) -> Self {
        self.include_vocabulary = include_vocabulary;
        self
    }

    /// Text to translate
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Requested output format
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Whether a vocabulary list was requested
    pub fn include_vocabulary(&self) -> bool {
        self.include_vocabulary
    }
}

/// JSON object returned by the translate endpoint, kept as-is.
///
/// The accessors read fields the service is known to emit, but none of them
/// is required to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationResult(Map<String, Value>);

impl TranslationResult {
    /// Wrap a parsed JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// All fields, as returned
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Raw value of one field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `success` flag, when present and boolean
    pub fn success(&self) -> Option<bool> {
        self.0.get("success").and_then(Value::as_bool)
    }

    /// Translated text, or the failure reason when `success` is false
    pub fn translation(&self) -> Option<&str> {
        self.0.get("translation").and_then(Value::as_str)
    }

    /// Reference to the generated document, when one was produced
    pub fn word_document_url(&self) -> Option<ArtifactReference> {
        self.0
            .get("word_document_url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ArtifactReference::from)
    }

    /// Vocabulary entries, when the server included them
    pub fn vocabulary(&self) -> Option<&[Value]> {
        self.0
            .get("vocabulary")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

impl From<TranslationResult> for Value {
    fn from(result: TranslationResult) -> Self {
        Value::Object(result.0)
    }
}

/// Opaque token naming a previously generated file on the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactReference(String);

impl ArtifactReference {
    /// Wrap a server-side file reference
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Reference exactly as the server issued it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactReference {
    fn from(reference: &str) -> Self {
        Self(reference.to_string())
    }
}

impl From<String> for ArtifactReference {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a completed download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedArtifact {
    /// Name the artifact was stored under
    pub filename: String,
    /// Total bytes handed to the sink
    pub bytes_written: u64,
}
