pub mod ack;
pub mod alerts;
pub mod fetch;
pub mod health;
pub mod logs;
pub mod serve;
pub mod summary;

use std::time::Duration;

use vigil_client::SourceClient;
use vigil_config::VigilConfig;
use vigil_core::{AnalysisDocument, RawLogEnvelope};
use vigil_engine::{NormalizedLogRecord, Normalizer};

/// Client for the configured results object.
pub fn source_client(config: &VigilConfig) -> SourceClient {
    SourceClient::with_timeout(
        &config.source.base_url,
        &config.source.object_key,
        Duration::from_secs(config.source.timeout_secs),
    )
}

/// Fetch the analysis document (falling back on failure) and normalize its
/// logs with the configured classifier.
pub fn fetch_normalized(config: &VigilConfig) -> (AnalysisDocument, Vec<NormalizedLogRecord>) {
    let doc = source_client(config).fetch_document_or_fallback();
    let records = Normalizer::new(config.resolve_classifier()).normalize_batch(&doc.logs);
    (doc, records)
}

/// Fetch document logs plus the raw-alerts object, normalized together as
/// one batch so derived ids stay unique across the merged view.
pub fn fetch_all_normalized(config: &VigilConfig) -> Vec<NormalizedLogRecord> {
    let client = source_client(config);
    let doc = client.fetch_document_or_fallback();

    let raw: Vec<RawLogEnvelope> = match client.fetch_raw_alerts(&config.source.raw_alerts_url) {
        Ok(envelopes) => envelopes,
        Err(e) => {
            eprintln!("[vigil] raw alerts unavailable: {e}");
            Vec::new()
        }
    };

    let mut envelopes = doc.logs;
    envelopes.extend(raw);
    Normalizer::new(config.resolve_classifier()).normalize_batch(&envelopes)
}

/// Truncate a message for a table cell.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
