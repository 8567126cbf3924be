use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::RawLogEnvelope;
use crate::error::VigilError;

/// Upstream analysis summary block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub common_patterns: Vec<String>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub total_logs: u64,
    #[serde(default)]
    pub normal_logs: u64,
    #[serde(default)]
    pub abnormal_logs: u64,
}

/// One point of the metrics time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub anomalies: f64,
    #[serde(default)]
    pub logs: f64,
}

/// The analysis document served from object storage:
/// `{ summary, logs[], metrics[] }`, every section optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub summary: Option<AnalysisSummary>,
    #[serde(default)]
    pub logs: Vec<RawLogEnvelope>,
    #[serde(default)]
    pub metrics: Vec<MetricPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl AnalysisDocument {
    /// Decode a response body. Producers ship either the full document or a
    /// bare array of envelopes; a bare array becomes a document with only
    /// `logs` populated.
    pub fn from_value(value: Value) -> Result<Self, VigilError> {
        match value {
            Value::Array(items) => Ok(Self {
                summary: None,
                logs: items.into_iter().map(RawLogEnvelope::new).collect(),
                metrics: Vec::new(),
                timestamp: None,
                source: None,
            }),
            obj @ Value::Object(_) => {
                serde_json::from_value(obj).map_err(|e| VigilError::MalformedBody(e.to_string()))
            }
            other => Err(VigilError::MalformedBody(format!(
                "expected object or array, got {other}"
            ))),
        }
    }

    /// Canned payload served when the upstream object cannot be read.
    pub fn fallback() -> Self {
        Self {
            summary: Some(AnalysisSummary {
                summary: "Fallback mode - connecting to Wazuh data...".into(),
                common_patterns: vec!["Connection pending".into(), "Data loading".into()],
                key_findings: vec!["System initializing".into()],
                total_logs: 0,
                normal_logs: 0,
                abnormal_logs: 0,
            }),
            logs: Vec::new(),
            metrics: Vec::new(),
            timestamp: None,
            source: Some("fallback".into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source.as_deref() == Some("fallback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_full_document() {
        let doc = AnalysisDocument::from_value(json!({
            "summary": {
                "summary": "Quiet day",
                "common_patterns": ["Failed login attempts"],
                "key_findings": ["Nothing critical"],
                "total_logs": 10,
                "normal_logs": 9,
                "abnormal_logs": 1
            },
            "logs": [{ "log_id": "a1", "category": "normal" }],
            "metrics": [{ "time": "10:00", "anomalies": 1, "logs": 10 }]
        }))
        .unwrap();

        let summary = doc.summary.unwrap();
        assert_eq!(summary.total_logs, 10);
        assert_eq!(summary.abnormal_logs, 1);
        assert_eq!(doc.logs.len(), 1);
        assert_eq!(doc.metrics[0].time, "10:00");
    }

    #[test]
    fn decode_bare_array() {
        let doc = AnalysisDocument::from_value(json!([
            { "_id": "x", "_source": { "full_log": "sshd: denied" } },
            "plain line"
        ]))
        .unwrap();

        assert!(doc.summary.is_none());
        assert_eq!(doc.logs.len(), 2);
        assert!(doc.metrics.is_empty());
    }

    #[test]
    fn decode_missing_sections_defaults() {
        let doc = AnalysisDocument::from_value(json!({})).unwrap();
        assert!(doc.summary.is_none());
        assert!(doc.logs.is_empty());
        assert!(doc.metrics.is_empty());
    }

    #[test]
    fn decode_scalar_is_malformed() {
        let err = AnalysisDocument::from_value(json!(42)).unwrap_err();
        assert!(matches!(err, VigilError::MalformedBody(_)));
    }

    #[test]
    fn fallback_shape() {
        let doc = AnalysisDocument::fallback();
        assert!(doc.is_fallback());
        let summary = doc.summary.unwrap();
        assert_eq!(summary.total_logs, 0);
        assert!(summary.summary.starts_with("Fallback mode"));
        assert_eq!(
            summary.common_patterns,
            vec!["Connection pending".to_string(), "Data loading".to_string()]
        );
    }

    #[test]
    fn document_roundtrip() {
        let doc = AnalysisDocument::fallback();
        let text = serde_json::to_string(&doc).unwrap();
        let back = AnalysisDocument::from_value(serde_json::from_str(&text).unwrap()).unwrap();
        assert!(back.is_fallback());
        assert_eq!(back.summary, doc.summary);
    }
}
