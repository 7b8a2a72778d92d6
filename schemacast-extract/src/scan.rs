//! Locating candidate payload spans inside free-form text.
//!
//! Models wrap the answer in prose, restate it after reasoning, or put it
//! in a markdown fence. The scan collects every span that could be the
//! payload and keeps the last one that parses: when a model writes the
//! value twice, the restatement is the one it meant.

use schemacast_core::RawValue;

use crate::lenient::{parse_complete, parse_partial};

/// A parsed candidate and where it started in the text.
pub(crate) struct Candidate {
    pub(crate) start: usize,
    pub(crate) value: RawValue,
}

/// Collect all candidates in the text, in positional order.
///
/// In partial mode the trailing unterminated span, if any, is parsed for
/// its received prefix and participates like any other candidate.
pub(crate) fn candidates(text: &str, partial: bool) -> Vec<Candidate> {
    let mut found = Vec::new();
    fenced_candidates(text, partial, &mut found);
    bracket_candidates(text, partial, &mut found);
    found.sort_by_key(|c| c.start);
    found
}

/// Scan for balanced (or, in partial mode, trailing unterminated)
/// bracket/brace spans.
///
/// A span that never balances does not end the scan: a stray `{` in
/// prose must not hide a real payload later in the text, so scanning
/// resumes just past the open.
fn bracket_candidates(text: &str, partial: bool, found: &mut Vec<Candidate>) {
    let mut i = 0;
    while let Some(offset) = text[i..].find(['{', '[']) {
        let open = i + offset;
        match find_balanced_end(text, open) {
            Some(end) => {
                if let Some(value) = parse_complete(&text[open..end]) {
                    found.push(Candidate { start: open, value });
                    i = end;
                } else {
                    i = open + 1;
                }
            }
            None => {
                if partial {
                    // The unterminated tail. Outermost open wins so the
                    // candidate covers everything received, but an open
                    // that salvages nothing (a stray brace before the
                    // real payload) is skipped in favor of inner spans.
                    if let Some(value) = parse_partial(&text[open..]) {
                        if !is_empty_container(&value) {
                            found.push(Candidate { start: open, value });
                            return;
                        }
                    }
                }
                i = open + 1;
            }
        }
    }
}

fn is_empty_container(value: &RawValue) -> bool {
    match value {
        RawValue::Object(entries) => entries.is_empty(),
        RawValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Find the byte index just past the bracket that balances the one at
/// `open`. String contents and comments do not count toward the balance.
fn find_balanced_end(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'/' if matches!(bytes.get(i + 1), Some(&b'/')) => {
                i = skip_line(bytes, i);
                continue;
            }
            b'/' if matches!(bytes.get(i + 1), Some(&b'*')) => {
                i = find_subslice(bytes, i + 2, b"*/")? + 2;
                continue;
            }
            b'#' => {
                i = skip_line(bytes, i);
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn skip_line(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |nl| from + nl + 1)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|p| from + p)
}

/// Scan markdown fences for candidates.
///
/// An explicitly `json`-tagged fence accepts any value, including bare
/// scalars; an untagged fence only accepts containers so that fenced
/// prose does not shadow a real payload elsewhere in the text.
fn fenced_candidates(text: &str, partial: bool, found: &mut Vec<Candidate>) {
    let mut i = 0;
    while let Some(offset) = text[i..].find("```") {
        let fence = i + offset;
        let after_marker = fence + 3;
        let Some(newline) = text[after_marker..].find('\n') else {
            return;
        };
        let tag = text[after_marker..after_marker + newline].trim().to_lowercase();
        let content_start = after_marker + newline + 1;

        let (content, terminated, next) = match text[content_start..].find("```") {
            Some(end) => (
                &text[content_start..content_start + end],
                true,
                content_start + end + 3,
            ),
            None => (&text[content_start..], false, text.len()),
        };

        let parsed = if terminated {
            parse_complete(content.trim())
        } else if partial {
            parse_partial(content.trim_start())
        } else {
            None
        };
        if let Some(value) = parsed {
            let scalar_ok = tag == "json";
            if scalar_ok || matches!(value, RawValue::Array(_) | RawValue::Object(_)) {
                found.push(Candidate {
                    start: content_start,
                    value,
                });
            }
        }

        if !terminated {
            return;
        }
        i = next;
    }
}
