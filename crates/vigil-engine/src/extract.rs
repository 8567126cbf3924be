use std::collections::BTreeMap;

use serde_json::{Map, Value};
use vigil_core::envelope::{lookup_path, scalar_to_string};
use vigil_core::RawLogEnvelope;

/// How a multi-valued field collapses into one display cell.
#[derive(Debug, Clone, Copy)]
enum Join {
    Comma,
    Newline,
}

/// One display field: target name plus ordered candidate paths. The first
/// candidate that resolves to a non-empty value wins.
struct FieldRule {
    name: &'static str,
    candidates: &'static [&'static str],
    join: Join,
}

const TABLE_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "rule_desc",
        candidates: &["rule_desc", "rule_description", "rule.description"],
        join: Join::Comma,
    },
    FieldRule {
        name: "index_time",
        candidates: &["index_time", "@timestamp"],
        join: Join::Comma,
    },
    FieldRule {
        name: "log_time",
        candidates: &["log_time", "logtime"],
        join: Join::Comma,
    },
    FieldRule {
        name: "agent_ip",
        candidates: &["agent_ip", "agent_ip_addr", "agent.ip"],
        join: Join::Comma,
    },
    FieldRule {
        name: "src_ip",
        candidates: &["src_ip", "source_ip", "srcip"],
        join: Join::Comma,
    },
    FieldRule {
        name: "mitre_ids",
        candidates: &["mitre_ids", "mitre_id", "rule.mitre.id"],
        join: Join::Comma,
    },
    FieldRule {
        name: "mitre_tactics",
        candidates: &["mitre_tactics", "mitre_tactic", "rule.mitre.tactic"],
        join: Join::Comma,
    },
    FieldRule {
        name: "mitre_techniques",
        candidates: &["mitre_techniques", "mitre_technique", "rule.mitre.technique"],
        join: Join::Comma,
    },
];

const DETAIL_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "original_log",
        candidates: &["original_log", "raw", "full_log"],
        join: Join::Newline,
    },
    FieldRule {
        name: "hypothesis_id",
        candidates: &["hypothesis_id"],
        join: Join::Comma,
    },
    FieldRule {
        name: "hypothesis",
        candidates: &["hypothesis", "hypotheses"],
        join: Join::Comma,
    },
    FieldRule {
        name: "observed_patterns",
        candidates: &["observed_patterns"],
        join: Join::Comma,
    },
    FieldRule {
        name: "confidence_score",
        candidates: &["confidence_score"],
        join: Join::Comma,
    },
    FieldRule {
        name: "confidence",
        candidates: &["confidence"],
        join: Join::Comma,
    },
    FieldRule {
        name: "category",
        candidates: &["category", "classification"],
        join: Join::Comma,
    },
    FieldRule {
        name: "vulnerabilities",
        candidates: &["vulnerabilities"],
        join: Join::Comma,
    },
    FieldRule {
        name: "investigation_log",
        candidates: &["investigation_log"],
        join: Join::Comma,
    },
    FieldRule {
        name: "recommendations",
        candidates: &["recommendations"],
        join: Join::Comma,
    },
    FieldRule {
        name: "alerts_count",
        candidates: &["alerts_count"],
        join: Join::Comma,
    },
    FieldRule {
        name: "first_seen",
        candidates: &["first_seen"],
        join: Join::Comma,
    },
    FieldRule {
        name: "last_seen",
        candidates: &["last_seen"],
        join: Join::Comma,
    },
    FieldRule {
        name: "top_rules",
        candidates: &["top_rules"],
        join: Join::Comma,
    },
    FieldRule {
        name: "events",
        candidates: &["events"],
        join: Join::Newline,
    },
    FieldRule {
        name: "public",
        candidates: &["public"],
        join: Join::Comma,
    },
];

/// Flatten an envelope (plus its extracted message) into the full display
/// map. Every field name is present; fields with no resolvable candidate
/// are blank, never absent and never an error.
pub fn display_fields(envelope: &RawLogEnvelope, message: &str) -> BTreeMap<String, String> {
    let merged = merged_view(envelope, message);
    let mut out = BTreeMap::new();
    for rule in TABLE_FIELDS.iter().chain(DETAIL_FIELDS.iter()) {
        let cell = rule
            .candidates
            .iter()
            .find_map(|c| {
                lookup_path(&merged, c)
                    .and_then(|v| value_to_cell(v, rule.join))
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_default();
        out.insert(rule.name.to_string(), cell);
    }
    out
}

/// Field names rendered as table columns, in column order.
pub fn table_field_names() -> Vec<&'static str> {
    TABLE_FIELDS.iter().map(|f| f.name).collect()
}

/// The merged working object candidates are probed against: the envelope
/// with `_source` flattened one level, entity attributes filled in, and
/// any object literal hiding in the message merged on top.
fn merged_view(envelope: &RawLogEnvelope, message: &str) -> Value {
    let mut map = envelope.as_value().as_object().cloned().unwrap_or_default();

    flatten_into(&mut map, "_source", true);
    flatten_into(&mut map, "entity", false);

    if let Some(mut parsed) = parse_msg_object(message) {
        flatten_into(&mut parsed, "_source", true);
        for (k, v) in parsed {
            map.insert(k, v);
        }
    }

    Value::Object(map)
}

/// Lift the entries of a nested object up one level. `overwrite` controls
/// whether lifted entries shadow existing top-level ones.
fn flatten_into(map: &mut Map<String, Value>, key: &str, overwrite: bool) {
    let Some(Value::Object(inner)) = map.get(key).cloned() else {
        return;
    };
    for (k, v) in inner {
        if overwrite {
            map.insert(k, v);
        } else {
            map.entry(k).or_insert(v);
        }
    }
}

/// Parse a message that looks like an object literal. Producer heuristic:
/// starts with `{` and contains `:`. Anything unparseable contributes
/// nothing.
pub fn parse_msg_object(msg: &str) -> Option<Map<String, Value>> {
    if !msg.starts_with('{') || !msg.contains(':') {
        return None;
    }
    match serde_json::from_str::<Value>(msg) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Render a value as one display cell. Array elements that are not scalars
/// are rendered as compact JSON; an empty array is an empty cell.
fn value_to_cell(value: &Value, join: Join) -> Option<String> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return None;
            }
            let sep = match join {
                Join::Comma => ", ",
                Join::Newline => "\n",
            };
            let parts: Vec<String> = items
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    _ => scalar_to_string(v).unwrap_or_else(|| v.to_string()),
                })
                .collect();
            Some(parts.join(sep))
        }
        other => scalar_to_string(other),
    }
}
