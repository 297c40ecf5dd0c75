//! HTTP client for the translation service

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE,
    USER_AGENT,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::chunker::Rechunker;
use crate::core::config::ClientConfig;
use crate::core::disposition::resolve_filename;
use crate::core::errors::{ClientError, Result};
use crate::core::models::{
    ArtifactReference, DownloadedArtifact, TranslationRequest, TranslationResult,
};
use crate::core::storage::{ArtifactSink, ArtifactStore, DirectoryStore};

const TRANSLATE_PATH: &str = "/api/v1/translate";
const DOWNLOAD_PATH: &str = "/api/download";
const FILE_URL_PARAM: &str = "fileUrl";

/// Client for the translate and download endpoints of one deployment
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl TranslationClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .default_headers(default_headers(&config)?)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()
            .map_err(|e| ClientError::config(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit text for translation and return the server's JSON object
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        timeout: Duration,
    ) -> Result<TranslationResult> {
        let url = self.endpoint(TRANSLATE_PATH);
        debug!(
            "POST {} (format={}, vocabulary={})",
            url,
            request.output_format(),
            request.include_vocabulary()
        );

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!("Translate responded with {}", status);

        if !status.is_success() {
            return Err(http_error(response).await);
        }

        let body = response.bytes().await?;
        parse_result(&body)
    }

    /// Download an artifact into the configured download directory
    pub async fn download_artifact(
        &self,
        file_ref: &ArtifactReference,
        timeout: Duration,
    ) -> Result<DownloadedArtifact> {
        let store = DirectoryStore::new(&self.config.download_dir);
        self.download_artifact_to(file_ref, timeout, &store).await
    }

    /// Download an artifact, streaming its body into a sink opened from `store`
    pub async fn download_artifact_to<S: ArtifactStore>(
        &self,
        file_ref: &ArtifactReference,
        timeout: Duration,
        store: &S,
    ) -> Result<DownloadedArtifact> {
        let url = self.endpoint(DOWNLOAD_PATH);
        debug!("GET {} ({}={})", url, FILE_URL_PARAM, file_ref);

        let mut response = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(ACCEPT, "*/*")
            .query(&[(FILE_URL_PARAM, file_ref.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!("Download responded with {}", status);

        if !status.is_success() {
            return Err(http_error(response).await);
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok());
        let filename = resolve_filename(disposition);

        let mut sink = store.open(&filename).await?;
        match stream_body(&mut response, &mut sink).await {
            Ok(bytes_written) => {
                sink.finish().await?;
                debug!("Saved {} ({} bytes)", filename, bytes_written);
                Ok(DownloadedArtifact {
                    filename,
                    bytes_written,
                })
            }
            Err(e) => {
                if let Err(cleanup) = sink.abort().await {
                    debug!("Failed to discard partial {}: {}", filename, cleanup);
                }
                Err(e)
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|_| ClientError::config("user_agent is not a valid header value"))?;
    headers.insert(USER_AGENT, user_agent);

    if let Some(cookie) = &config.session_cookie {
        let cookie = HeaderValue::from_str(cookie)
            .map_err(|_| ClientError::config("session_cookie is not a valid header value"))?;
        headers.insert(COOKIE, cookie);
    }

    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::config(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::config(format!("invalid value for header {name}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Error for a non-2xx response; a failed body read wins over the status
async fn http_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => ClientError::HttpError { status, body },
        Err(e) => {
            debug!("Failed to read body of {} response: {}", status, e);
            e.into()
        }
    }
}

fn parse_result(body: &[u8]) -> Result<TranslationResult> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ClientError::MalformedResponse {
            message: e.to_string(),
        })?;

    match value {
        Value::Object(fields) => Ok(TranslationResult::new(fields)),
        other => Err(ClientError::MalformedResponse {
            message: format!("expected a JSON object, got {}", json_type(&other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

async fn stream_body<S: ArtifactSink>(
    response: &mut reqwest::Response,
    sink: &mut S,
) -> Result<u64> {
    let mut rechunker = Rechunker::default();
    while let Some(chunk) = response.chunk().await? {
        rechunker.push(&chunk, sink).await?;
    }
    rechunker.finish(sink).await
}
