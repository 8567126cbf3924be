pub mod ack;
pub mod classifier;
pub mod extract;
pub mod identity;
pub mod summary;

use std::collections::BTreeMap;

use vigil_core::RawLogEnvelope;

use crate::classifier::Classifier;

/// Record classification.
///
/// Upstream producers use "alert" as a synonym for abnormal; both parse to
/// `Abnormal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Normal,
    Abnormal,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Abnormal => "abnormal",
        }
    }

    /// Parse an upstream label. Unknown labels yield `None` rather than a
    /// guessed class.
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "abnormal" | "alert" => Some(Self::Abnormal),
            _ => None,
        }
    }
}

/// The pipeline's uniform output shape used by all views.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NormalizedLogRecord {
    pub id: String,
    pub time: String,
    pub source: String,
    pub message: String,
    pub classification: Classification,
    pub reason: String,
    /// Pre-classified label shipped by the producer, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Classification>,
    pub display: BTreeMap<String, String>,
}

impl NormalizedLogRecord {
    /// Effective class: an upstream category wins over the computed one.
    pub fn class(&self) -> Classification {
        self.category.unwrap_or(self.classification)
    }

    pub fn is_abnormal(&self) -> bool {
        self.class() == Classification::Abnormal
    }

    /// Case-insensitive substring match over message and source.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.message.to_lowercase().contains(&term)
            || self.source.to_lowercase().contains(&term)
    }
}

/// Turns raw envelopes into normalized records.
pub struct Normalizer {
    classifier: Classifier,
}

impl Normalizer {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Normalize one envelope at its batch position.
    pub fn normalize(&self, envelope: &RawLogEnvelope, index: usize) -> NormalizedLogRecord {
        let message = extract_message(envelope);
        let verdict = self.classifier.classify(&message);
        let category = envelope
            .first_str(&["category", "classification", "_source.category"])
            .and_then(|label| Classification::parse(&label));

        let reason = if category.is_some() {
            envelope
                .first_str(&["reason", "_source.reason"])
                .unwrap_or_else(|| "Classified upstream".to_string())
        } else {
            verdict.reason
        };

        let display = extract::display_fields(envelope, &message);

        NormalizedLogRecord {
            id: identity::derive_id(envelope, index),
            time: extract_time(envelope),
            source: extract_source(envelope),
            message,
            classification: verdict.classification,
            reason,
            category,
            display,
        }
    }

    pub fn normalize_batch(&self, envelopes: &[RawLogEnvelope]) -> Vec<NormalizedLogRecord> {
        envelopes
            .iter()
            .enumerate()
            .map(|(i, e)| self.normalize(e, i))
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Classifier::broad())
    }
}

/// Records not yet acknowledged, in input order. Recomputed per call; the
/// store is the single source of truth.
pub fn visible<'a>(
    records: &'a [NormalizedLogRecord],
    acks: &ack::AckStore,
) -> Vec<&'a NormalizedLogRecord> {
    records
        .iter()
        .filter(|r| !acks.is_acknowledged(&r.id))
        .collect()
}

/// Records whose effective class is abnormal.
pub fn abnormal(records: &[NormalizedLogRecord]) -> Vec<&NormalizedLogRecord> {
    records.iter().filter(|r| r.is_abnormal()).collect()
}

/// Best-effort human-readable text for an envelope.
fn extract_message(envelope: &RawLogEnvelope) -> String {
    if let Some(s) = envelope.as_str() {
        return s.to_string();
    }
    if let Some(source) = envelope.path("_source") {
        if let Some(full) = source.get("full_log").and_then(|v| v.as_str()) {
            if !full.is_empty() {
                return full.to_string();
            }
        }
        if let Some(desc) = source
            .get("rule")
            .and_then(|r| r.get("description"))
            .and_then(|v| v.as_str())
        {
            if !desc.is_empty() {
                return desc.to_string();
            }
        }
        return serde_json::to_string(source).unwrap_or_default();
    }
    // A present-but-empty msg stays empty (and classifies Normal) rather
    // than degrading to the stringified envelope.
    if let Some(v) = envelope.path("msg").or_else(|| envelope.path("message")) {
        if let Some(msg) = vigil_core::envelope::scalar_to_string(v) {
            return msg;
        }
    }
    serde_json::to_string(envelope.as_value()).unwrap_or_default()
}

fn extract_time(envelope: &RawLogEnvelope) -> String {
    envelope
        .first_str(&["_source.@timestamp", "_source.timestamp", "time"])
        .unwrap_or_default()
}

fn extract_source(envelope: &RawLogEnvelope) -> String {
    envelope
        .first_str(&["_source.agent.name", "_source.manager.name", "source"])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ack::AckStore;
    use serde_json::json;

    fn env(value: serde_json::Value) -> RawLogEnvelope {
        RawLogEnvelope::new(value)
    }

    fn temp_acks(name: &str) -> AckStore {
        let dir = std::env::temp_dir().join("vigil_engine_test").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        AckStore::load(dir.join("acknowledged.json"))
    }

    #[test]
    fn test_normalize_plain_record() {
        let n = Normalizer::new(Classifier::narrow());
        let rec = n.normalize(
            &env(json!({
                "id": 101,
                "source": "Auth Service",
                "msg": "User root closed a login session.",
                "time": "2025-09-20 10:01"
            })),
            0,
        );
        assert_eq!(rec.id, "101");
        assert_eq!(rec.source, "Auth Service");
        assert_eq!(rec.time, "2025-09-20 10:01");
        assert_eq!(rec.classification, Classification::Normal);
        assert_eq!(rec.reason, "No abnormal indicators");
    }

    #[test]
    fn test_normalize_search_hit() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({
                "_id": "hit-7",
                "_source": {
                    "full_log": "sshd[812]: Failed password for invalid user admin",
                    "@timestamp": "2025-09-20T09:30:00Z",
                    "agent": { "name": "web-01" }
                }
            })),
            0,
        );
        assert_eq!(rec.id, "hit-7");
        assert_eq!(rec.time, "2025-09-20T09:30:00Z");
        assert_eq!(rec.source, "web-01");
        assert!(rec.message.contains("Failed password"));
        assert_eq!(rec.classification, Classification::Abnormal);
        assert_eq!(rec.reason, "Contains abnormal keyword");
    }

    #[test]
    fn test_source_without_full_log_falls_back_to_rule_description() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({
                "_source": { "rule": { "description": "Attack signature matched" } }
            })),
            0,
        );
        assert_eq!(rec.message, "Attack signature matched");
        assert_eq!(rec.classification, Classification::Abnormal);
    }

    #[test]
    fn test_source_without_text_is_stringified() {
        let n = Normalizer::default();
        let rec = n.normalize(&env(json!({ "_source": { "srcip": "10.0.0.4" } })), 0);
        assert_eq!(rec.message, r#"{"srcip":"10.0.0.4"}"#);
        // The stringified message re-parses during extraction and fills
        // the table columns.
        assert_eq!(rec.display["src_ip"], "10.0.0.4");
    }

    #[test]
    fn test_upstream_category_takes_precedence() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({ "log_id": "w1", "category": "abnormal", "msg": "routine entry" })),
            0,
        );
        assert_eq!(rec.classification, Classification::Normal);
        assert_eq!(rec.category, Some(Classification::Abnormal));
        assert_eq!(rec.class(), Classification::Abnormal);
        assert_eq!(rec.reason, "Classified upstream");
    }

    #[test]
    fn test_alert_label_is_abnormal_synonym() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({ "id": "a", "classification": "Alert", "msg": "ok" })),
            0,
        );
        assert_eq!(rec.category, Some(Classification::Abnormal));
        assert!(rec.is_abnormal());
    }

    #[test]
    fn test_unknown_category_label_is_ignored() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({ "id": "a", "category": "weird", "msg": "scan finished" })),
            0,
        );
        assert_eq!(rec.category, None);
        // Computed classification still applies ("scan" is a broad keyword).
        assert!(rec.is_abnormal());
    }

    #[test]
    fn test_missing_message_is_normal_not_error() {
        let n = Normalizer::default();
        let rec = n.normalize(&env(json!({ "id": "empty", "msg": "" })), 0);
        assert_eq!(rec.classification, Classification::Normal);
    }

    #[test]
    fn test_batch_order_and_positions() {
        let n = Normalizer::default();
        let recs = n.normalize_batch(&[
            env(json!({ "msg": "same" })),
            env(json!({ "msg": "same" })),
        ]);
        assert_eq!(recs.len(), 2);
        assert_ne!(recs[0].id, recs[1].id);
    }

    #[test]
    fn test_visible_excludes_acknowledged() {
        let n = Normalizer::default();
        let recs = n.normalize_batch(&[
            env(json!({ "id": "a", "msg": "attack detected" })),
            env(json!({ "id": "b", "msg": "attack detected" })),
        ]);

        let mut acks = temp_acks("visible");
        acks.acknowledge("a").unwrap();

        let vis = visible(&recs, &acks);
        assert_eq!(vis.len(), 1);
        assert_eq!(vis[0].id, "b");
    }

    #[test]
    fn test_acknowledge_all_visible_empties_view() {
        let n = Normalizer::default();
        let recs = n.normalize_batch(&[
            env(json!({ "id": "a", "msg": "error one" })),
            env(json!({ "id": "b", "msg": "error two" })),
        ]);

        let mut acks = temp_acks("ack_all");
        let ids: Vec<String> = visible(&recs, &acks).iter().map(|r| r.id.clone()).collect();
        acks.acknowledge_all(ids).unwrap();
        assert!(visible(&recs, &acks).is_empty());
    }

    #[test]
    fn test_abnormal_filter_uses_effective_class() {
        let n = Normalizer::default();
        let recs = n.normalize_batch(&[
            env(json!({ "id": "a", "msg": "quiet", "category": "abnormal" })),
            env(json!({ "id": "b", "msg": "quiet" })),
            env(json!({ "id": "c", "msg": "malware found" })),
        ]);
        let abn = abnormal(&recs);
        let ids: Vec<&str> = abn.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_search_matches_message_and_source() {
        let n = Normalizer::default();
        let rec = n.normalize(
            &env(json!({ "id": "a", "source": "File Server", "msg": "Large transfer" })),
            0,
        );
        assert!(rec.matches_search("file server"));
        assert!(rec.matches_search("TRANSFER"));
        assert!(rec.matches_search(""));
        assert!(!rec.matches_search("database"));
    }
}
