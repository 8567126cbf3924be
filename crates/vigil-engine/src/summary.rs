use std::collections::HashMap;

use vigil_core::AnalysisSummary;

use crate::{Classification, NormalizedLogRecord};

/// Masks variable parts of a message so repeats group into one template.
pub fn mask_template(message: &str) -> String {
    use regex::Regex;
    use std::sync::LazyLock;

    static RE_UUID: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .unwrap()
    });
    static RE_IP: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(:\d+)?").unwrap());
    static RE_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"0x[0-9a-fA-F]+").unwrap());
    static RE_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2,}").unwrap());

    let s = RE_UUID.replace_all(message, "<UUID>");
    let s = RE_IP.replace_all(&s, "<IP>");
    let s = RE_HEX.replace_all(&s, "<HEX>");
    let s = RE_NUM.replace_all(&s, "<N>");
    s.into_owned()
}

/// Build a summary from classified records, for documents that arrive
/// without one. Counts by effective class; common patterns are message
/// templates seen more than once; key findings are the first abnormal
/// messages.
pub fn compute_summary(records: &[NormalizedLogRecord]) -> AnalysisSummary {
    let total = records.len() as u64;
    let abnormal = records.iter().filter(|r| r.is_abnormal()).count() as u64;
    let normal = total - abnormal;

    let mut counts: HashMap<String, u32> = HashMap::new();
    for r in records {
        *counts.entry(mask_template(&r.message)).or_default() += 1;
    }
    let mut repeated: Vec<(String, u32)> =
        counts.into_iter().filter(|(_, n)| *n > 1).collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let common_patterns: Vec<String> = repeated
        .into_iter()
        .take(5)
        .map(|(template, _)| truncate(&template, 80))
        .collect();

    let mut key_findings = Vec::new();
    for r in records.iter().filter(|r| r.is_abnormal()) {
        let finding = truncate(&r.message, 80);
        if !key_findings.contains(&finding) {
            key_findings.push(finding);
        }
        if key_findings.len() == 5 {
            break;
        }
    }

    AnalysisSummary {
        summary: format!("{total} logs analyzed: {normal} normal, {abnormal} abnormal"),
        common_patterns,
        key_findings,
        total_logs: total,
        normal_logs: normal,
        abnormal_logs: abnormal,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::Normalizer;
    use serde_json::json;
    use vigil_core::RawLogEnvelope;

    fn records(msgs: &[&str]) -> Vec<NormalizedLogRecord> {
        let envelopes: Vec<RawLogEnvelope> = msgs
            .iter()
            .map(|m| RawLogEnvelope::new(json!({ "msg": m })))
            .collect();
        Normalizer::new(Classifier::broad()).normalize_batch(&envelopes)
    }

    #[test]
    fn test_mask_template_ip_and_numbers() {
        assert_eq!(
            mask_template("Failed login from 192.168.1.77 attempt 42"),
            "Failed login from <IP> attempt <N>"
        );
    }

    #[test]
    fn test_counts_by_effective_class() {
        let recs = records(&[
            "User logged out",
            "Login failed for user root",
            "Session opened",
        ]);
        let s = compute_summary(&recs);
        assert_eq!(s.total_logs, 3);
        assert_eq!(s.normal_logs, 2);
        assert_eq!(s.abnormal_logs, 1);
        assert_eq!(s.summary, "3 logs analyzed: 2 normal, 1 abnormal");
    }

    #[test]
    fn test_common_patterns_group_repeats() {
        let recs = records(&[
            "Failed login from 10.0.0.1",
            "Failed login from 10.0.0.2",
            "Failed login from 10.0.0.3",
            "Disk check complete",
        ]);
        let s = compute_summary(&recs);
        assert_eq!(s.common_patterns, vec!["Failed login from <IP>"]);
    }

    #[test]
    fn test_key_findings_are_abnormal_messages() {
        let recs = records(&["All quiet", "Malware detected in /tmp", "Backup done"]);
        let s = compute_summary(&recs);
        assert_eq!(s.key_findings, vec!["Malware detected in /tmp"]);
    }

    #[test]
    fn test_empty_batch() {
        let s = compute_summary(&[]);
        assert_eq!(s.total_logs, 0);
        assert!(s.common_patterns.is_empty());
        assert!(s.key_findings.is_empty());
    }

    #[test]
    fn test_upstream_category_wins_in_counts() {
        // Message text says nothing abnormal, but the producer already
        // classified the record.
        let envelopes = vec![RawLogEnvelope::new(json!({
            "msg": "routine entry",
            "category": "abnormal"
        }))];
        let recs = Normalizer::new(Classifier::broad()).normalize_batch(&envelopes);
        assert_eq!(recs[0].class(), Classification::Abnormal);
        let s = compute_summary(&recs);
        assert_eq!(s.abnormal_logs, 1);
    }
}
