//! Repair of malformed structured-text responses.
//!
//! Language models asked for JSON routinely wrap it in markdown fences,
//! leave trailing commas, or emit control characters inside strings.
//! This crate makes such a response safe to parse with three ordered,
//! individually idempotent text transformations, and converts any
//! remaining parse failure into a deterministic fallback draft instead
//! of an error. Nothing downstream of [`parse_draft`] ever sees a parse
//! failure.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::SummaryDraft;

/// Summary text used when the response cannot be parsed at all.
pub const FALLBACK_SUMMARY: &str = "Error parsing model response - using fallback structure";

lazy_static! {
    // One or more trailing commas directly before a closing brace or
    // bracket. Matching the whole run keeps a single pass idempotent.
    static ref TRAILING_COMMAS: Regex = Regex::new(r"(?:,\s*)+([}\]])").unwrap();
}

/// Remove markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Replace every character outside printable ASCII plus `\n`, `\r`,
/// `\t` with a single space.
///
/// One-for-one replacement, never deletion: character offsets survive,
/// so a later parse error still points at the right spot in the
/// original response.
pub fn sanitize_control_chars(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if matches!(c, '\n' | '\r' | '\t') || (' '..='~').contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Remove trailing commas immediately before a closing brace/bracket.
pub fn strip_trailing_commas(raw: &str) -> String {
    TRAILING_COMMAS.replace_all(raw, "$1").into_owned()
}

/// Full repair pass: fences, control characters, trailing commas.
/// Idempotent: `repair(repair(x)) == repair(x)`.
pub fn repair(raw: &str) -> String {
    let cleaned = strip_code_fences(raw);
    let cleaned = sanitize_control_chars(&cleaned);
    strip_trailing_commas(&cleaned).trim().to_string()
}

/// Parse a summarizer response into a [`SummaryDraft`], repairing it
/// first. Never fails: an unparseable response is logged with its error
/// offset and surrounding context and converted into the fixed fallback
/// draft with `processing_error` set.
pub fn parse_draft(raw: &str) -> SummaryDraft {
    let cleaned = repair(raw);
    match serde_json::from_str::<SummaryDraft>(&cleaned) {
        Ok(draft) => draft,
        Err(err) => {
            let offset = byte_offset(&cleaned, err.line(), err.column());
            let context = error_context(&cleaned, offset);
            tracing::warn!(
                offset,
                context = %context,
                error = %err,
                response_length = raw.len(),
                "summarizer response unparseable after repair, using fallback draft"
            );
            SummaryDraft {
                summary: FALLBACK_SUMMARY.to_string(),
                clauses: Vec::new(),
                timelines: Default::default(),
                processing_error: Some(format!("{err} (near byte {offset}: '{context}')")),
            }
        }
    }
}

/// Byte offset of a 1-based (line, column) position reported by the
/// JSON parser.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut remaining_lines = line.saturating_sub(1);
    let mut offset = 0;
    for (i, b) in text.bytes().enumerate() {
        if remaining_lines == 0 {
            return (i + column.saturating_sub(1)).min(text.len());
        }
        if b == b'\n' {
            remaining_lines -= 1;
        }
        offset = i + 1;
    }
    (offset + column.saturating_sub(1)).min(text.len())
}

/// Up to ten characters either side of the error position.
fn error_context(text: &str, offset: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let pos = offset.min(chars.len());
    let start = pos.saturating_sub(10);
    let end = (pos + 10).min(chars.len());
    chars[start..end].iter().collect()
}
