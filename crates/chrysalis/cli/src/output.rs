//! Output helpers
//!
//! Everything written to stdout is printable ASCII.

use crate::error::CliResult;
use serde::Serialize;

/// Pretty JSON with every non-ASCII character written as a `\uXXXX` escape.
pub fn ascii_json<T: Serialize>(value: &T) -> CliResult<String> {
    let text = serde_json::to_string_pretty(value)?;
    let mut out = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        // Non-ASCII only occurs inside string literals, so escaping in place
        // keeps the document valid.
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    Ok(out)
}
