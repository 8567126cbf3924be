use std::hash::{Hash, Hasher};

use vigil_core::RawLogEnvelope;

/// Derive an identifier for an envelope at `index` in the current batch.
///
/// Ladder: explicit id field, nested id, index + source-IP composite,
/// content hash. Every non-explicit rung mixes in the batch index, so ids
/// are unique within one fetch result even for duplicate envelopes. The
/// content-hash rung is stable across refetches of identical data; callers
/// that need identity across changing upstream payloads must ship an
/// explicit id.
pub fn derive_id(envelope: &RawLogEnvelope, index: usize) -> String {
    if let Some(id) = envelope.first_str(&["log_id", "id"]) {
        return id;
    }
    if let Some(id) = envelope.first_str(&["_id", "_source.id"]) {
        return id;
    }
    if let Some(ip) = envelope.first_str(&["src_ip", "_source.src_ip", "_source.entity.src_ip"]) {
        return format!("log-{index}-{ip}");
    }
    format!("log-{index}-{:016x}", hash_envelope(envelope))
}

fn hash_envelope(envelope: &RawLogEnvelope) -> u64 {
    // serde_json orders object keys, so equal content hashes equally.
    let canonical = serde_json::to_string(envelope.as_value()).unwrap_or_default();
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}
