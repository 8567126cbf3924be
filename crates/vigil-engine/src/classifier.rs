use crate::Classification;

/// Keyword set used for generic free-text logs.
pub const NARROW_KEYWORDS: &[&str] = &["error", "failed", "interrupt", "denied", "timeout"];

/// Keyword set used for security-raw envelopes.
pub const BROAD_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "interrupt",
    "denied",
    "alert",
    "unusual",
    "critical",
    "suspicious",
    "malware",
    "attack",
    "scan",
    "remediation",
];

pub const NARROW_MATCH_REASON: &str = "Contains critical keyword";
pub const BROAD_MATCH_REASON: &str = "Contains abnormal keyword";
pub const NO_MATCH_REASON: &str = "No abnormal indicators";

/// Classification of one message, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Verdict {
    pub classification: Classification,
    pub reason: String,
}

/// Classifies free-text messages by case-insensitive keyword search.
///
/// Pure and position-independent: the verdict depends only on the message
/// content and the configured keyword set.
#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: Vec<String>,
    match_reason: String,
}

impl Classifier {
    /// The narrow set, for generic logs.
    pub fn narrow() -> Self {
        Self::custom(NARROW_KEYWORDS.iter().copied(), NARROW_MATCH_REASON)
    }

    /// The broad set, for security-raw envelopes.
    pub fn broad() -> Self {
        Self::custom(BROAD_KEYWORDS.iter().copied(), BROAD_MATCH_REASON)
    }

    /// A caller-chosen keyword set. Keywords are lowercased; empty keywords
    /// are dropped (an empty keyword would match every message).
    pub fn custom<'a, I>(keywords: I, match_reason: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords,
            match_reason: match_reason.to_string(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classify a message. An empty message is Normal, never an error.
    pub fn classify(&self, message: &str) -> Verdict {
        let lower = message.to_lowercase();
        if self.keywords.iter().any(|k| lower.contains(k.as_str())) {
            Verdict {
                classification: Classification::Abnormal,
                reason: self.match_reason.clone(),
            }
        } else {
            Verdict {
                classification: Classification::Normal,
                reason: NO_MATCH_REASON.to_string(),
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::broad()
    }
}
