//! Scan payload interpretation.
//!
//! Codes printed on devices come in several shapes:
//!   * a JSON object, e.g. `{"model":"Vista 300"}`
//!   * a URL or query string, e.g. `https://host/?model=Vista%20300&containerid=abc`
//!   * a bare document path, e.g. `ifus/Vista_300.pdf`
//!   * a bare model name, e.g. `Vista 300`
//!
//! [`parse_scan_payload`] runs three stages in strict priority order. Each
//! stage only fills fields that are still empty, so a value found by an
//! earlier stage is never overwritten by a later one.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::identity::ResolvedIdentity;

/// Interprets raw scanned text as a (possibly partial) identity.
///
/// Never fails. Input without any recognizable structure is classified by
/// the heuristic stage, and empty input yields an all-empty identity.
///
/// # Example
/// ```
/// use scan_payload::parse_scan_payload;
///
/// let id = parse_scan_payload("https://x?model=Vista%20300&containerid=abc");
/// assert_eq!(id.model, "Vista 300");
/// assert_eq!(id.containerid, "abc");
/// assert!(id.assistantid.is_empty());
/// ```
pub fn parse_scan_payload(raw: &str) -> ResolvedIdentity {
    let mut id = ResolvedIdentity::default();
    if raw.trim().is_empty() {
        return id;
    }

    apply_structured(raw, &mut id);

    if id.model.is_empty() || id.assistantid.is_empty() || id.device_type.is_empty() {
        apply_query_params(raw, &mut id);
    }

    if id.model.is_empty() && id.assistantid.is_empty() {
        apply_heuristic(raw, &mut id);
    }

    debug!(
        model = %id.model,
        assistantid = %id.assistantid,
        containerid = %id.containerid,
        device_type = %id.device_type,
        "scan payload parsed"
    );
    id
}

/* ------------------------------------------------------------------------- */
/* Stage 1: JSON object                                                      */
/* ------------------------------------------------------------------------- */

fn apply_structured(raw: &str, id: &mut ResolvedIdentity) {
    let obj = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => obj,
        // Valid JSON of another kind carries no fields; parse errors are expected
        // for non-JSON payloads.
        _ => return,
    };

    fill(&mut id.model, first_non_empty(&obj, &["model"]));
    fill(
        &mut id.assistantid,
        first_non_empty(&obj, &["ifu_path", "doc_path", "assistantid"]),
    );
    fill(&mut id.containerid, first_non_empty(&obj, &["containerid"]));
    fill(&mut id.device_type, first_non_empty(&obj, &["type", "deviceType"]));
}

/// First key whose value renders to a non-empty trimmed string.
fn first_non_empty(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .map(scalar_to_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/* ------------------------------------------------------------------------- */
/* Stage 2: query parameters                                                 */
/* ------------------------------------------------------------------------- */

struct QueryPatterns {
    model: Regex,
    assistant: Regex,
    container: Regex,
    device_type: Regex,
}

fn query_patterns() -> &'static QueryPatterns {
    static PATTERNS: OnceLock<QueryPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| QueryPatterns {
        model: Regex::new(r"(?i)model=([^&]+)").expect("valid model pattern"),
        assistant: Regex::new(r"(?i)(?:ifu_path|doc_path|assistantid)=([^&]+)")
            .expect("valid assistant pattern"),
        container: Regex::new(r"(?i)containerid=([^&]+)").expect("valid container pattern"),
        device_type: Regex::new(r"(?i)(?:type|devicetype)=([^&]+)").expect("valid type pattern"),
    })
}

fn apply_query_params(raw: &str, id: &mut ResolvedIdentity) {
    let p = query_patterns();
    if id.assistantid.is_empty() {
        fill(&mut id.assistantid, capture(&p.assistant, raw));
    }
    if id.containerid.is_empty() {
        fill(&mut id.containerid, capture(&p.container, raw));
    }
    if id.model.is_empty() {
        fill(&mut id.model, capture(&p.model, raw));
    }
    if id.device_type.is_empty() {
        fill(&mut id.device_type, capture(&p.device_type, raw));
    }
}

/// Percent-decoded first capture group, or empty when the pattern is absent.
fn capture(re: &Regex, raw: &str) -> String {
    let Some(value) = re.captures(raw).and_then(|c| c.get(1)) else {
        return String::new();
    };
    let value = value.as_str();
    // Malformed escapes keep the raw value instead of failing the scan.
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.trim().to_string(),
        Err(_) => value.trim().to_string(),
    }
}

/* ------------------------------------------------------------------------- */
/* Stage 3: heuristic                                                        */
/* ------------------------------------------------------------------------- */

fn apply_heuristic(raw: &str, id: &mut ResolvedIdentity) {
    let text = raw.trim();
    if looks_like_document(text) {
        id.assistantid = text.to_string();
    } else {
        id.model = text.to_string();
    }
}

fn looks_like_document(text: &str) -> bool {
    text.to_ascii_lowercase().ends_with(".pdf") || text.starts_with("ifus/")
}

fn fill(slot: &mut String, value: String) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
    }
}
