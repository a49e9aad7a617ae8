//! Candidate values and the helpers every layer uses to inspect them.
//!
//! A candidate is any JSON value. Most are mappings from string key to value,
//! but scalars are allowed and `null` is the distinguished *ground* candidate
//! that every generated domain contains.

use std::collections::BTreeSet;

use serde_json::Value;

/// One element of a domain considered during narrowing.
pub type Candidate = Value;

/// An ordered sequence of candidates. Order decides tie-breaks.
pub type Domain = Vec<Candidate>;

/// Default width for rendered candidate values.
pub const RENDER_WIDTH: usize = 40;

/// The ground candidate: pure unconstrained potential.
pub fn ground() -> Candidate {
    Value::Null
}

/// Whether a candidate is the ground candidate.
pub fn is_ground(candidate: &Candidate) -> bool {
    candidate.is_null()
}

/// Truthiness of a value.
///
/// `null`, `false`, zero, and empty strings, arrays and mappings are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Keys of a mapping candidate. Scalars and ground have none.
pub fn key_set(candidate: &Candidate) -> BTreeSet<&str> {
    match candidate {
        Value::Object(map) => map.keys().map(String::as_str).collect(),
        _ => BTreeSet::new(),
    }
}

/// Canonical text form of a value, used for ordering and equality of
/// observed values. Mapping keys serialise in sorted order.
pub fn canonical(value: &Value) -> String {
    value.to_string()
}

/// Escape everything outside printable ASCII so the text survives any
/// target encoding.
pub fn portable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() && (!c.is_ascii_control() || c == '\n') {
            out.push(c);
        } else {
            out.push_str(&format!("\\u{{{:x}}}", c as u32));
        }
    }
    out
}

/// Render a candidate as portable text, truncated to `width` characters.
pub fn render_candidate(candidate: &Candidate, width: usize) -> String {
    let text = portable(&canonical(candidate));
    if text.len() <= width {
        return text;
    }
    let keep = width.saturating_sub(3);
    format!("{}...", &text[..keep])
}
