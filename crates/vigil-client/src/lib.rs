use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;
use vigil_core::{AnalysisDocument, RawLogEnvelope, VigilError};

/// HTTP client for the analysis object store.
///
/// One fetch per call, no retries: a failed fetch degrades to the canned
/// fallback document and the next externally triggered refresh fetches
/// again.
pub struct SourceClient {
    agent: ureq::Agent,
    base_url: String,
    object_key: String,
}

impl SourceClient {
    /// Client with the default 10-second timeout.
    pub fn new(base_url: &str, object_key: &str) -> Self {
        Self::with_timeout(base_url, object_key, Duration::from_secs(10))
    }

    pub fn with_timeout(base_url: &str, object_key: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.new_agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            object_key: object_key.trim_start_matches('/').to_string(),
        }
    }

    /// Full URL of the analysis object, before cache busting.
    pub fn object_url(&self) -> String {
        format!("{}/{}", self.base_url, self.object_key)
    }

    /// Fetch and decode the analysis document. Accepts both wire shapes
    /// (full document or bare envelope array).
    pub fn fetch_document(&self) -> Result<AnalysisDocument, VigilError> {
        let value = self.fetch_value(&self.object_url())?;
        AnalysisDocument::from_value(value)
    }

    /// Fetch the document, degrading to the canned fallback on any failure.
    pub fn fetch_document_or_fallback(&self) -> AnalysisDocument {
        match self.fetch_document() {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("[vigil-client] falling back to canned payload: {e}");
                AnalysisDocument::fallback()
            }
        }
    }

    /// Fetch a raw-alerts object (typically the bare-array shape) from an
    /// absolute URL.
    pub fn fetch_raw_alerts(&self, url: &str) -> Result<Vec<RawLogEnvelope>, VigilError> {
        let value = self.fetch_value(url)?;
        Ok(AnalysisDocument::from_value(value)?.logs)
    }

    fn fetch_value(&self, url: &str) -> Result<Value, VigilError> {
        let mut response = self
            .agent
            .get(cache_busted(url))
            .header("Accept", "application/json")
            .call()
            .map_err(|e| VigilError::Http(e.to_string()))?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| VigilError::MalformedBody(e.to_string()))
    }
}

/// Append a `ts` cache-buster, matching what the upstream object store
/// expects from its consumers.
fn cache_busted(url: &str) -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}ts={ts}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_joins_cleanly() {
        let c = SourceClient::new("https://results.example.com/", "/latest_analysis.json");
        assert_eq!(
            c.object_url(),
            "https://results.example.com/latest_analysis.json"
        );
    }

    #[test]
    fn test_cache_buster_separator() {
        assert!(cache_busted("http://x/obj.json").contains("obj.json?ts="));
        assert!(cache_busted("http://x/obj.json?v=1").contains("obj.json?v=1&ts="));
    }

    #[test]
    fn test_unreachable_source_is_http_error() {
        // Nothing listens on a reserved port; the client reports a
        // transport error rather than panicking.
        let c = SourceClient::with_timeout(
            "http://127.0.0.1:9",
            "latest_analysis.json",
            Duration::from_millis(250),
        );
        match c.fetch_document() {
            Err(VigilError::Http(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_on_failure() {
        let c = SourceClient::with_timeout(
            "http://127.0.0.1:9",
            "latest_analysis.json",
            Duration::from_millis(250),
        );
        let doc = c.fetch_document_or_fallback();
        assert!(doc.is_fallback());
        assert!(doc.logs.is_empty());
    }
}
