//! A fault-tolerant parser for model-emitted structured data.
//!
//! Model output is almost-JSON: single quotes, unquoted keys and scalars,
//! trailing commas, and `//`-style comments all show up in practice. This
//! parser accepts those shapes. In partial mode it additionally tolerates
//! a truncated buffer: open containers close at the last structurally
//! received position, an unterminated string contributes the prefix
//! received so far, and an incomplete trailing scalar token or a dangling
//! key is dropped rather than guessed at.

use indexmap::IndexMap;
use schemacast_core::RawValue;

/// Result of parsing one value.
enum Outcome<T> {
    /// The value was fully terminated in the input.
    Done(T),
    /// The input ended mid-value (partial mode only). `None` means the
    /// received prefix was too incomplete to represent at all.
    Partial(Option<T>),
    /// Not parseable.
    Fail,
}

/// Parse a complete value spanning the whole input.
///
/// Trailing trivia (whitespace, comments) is allowed; any other trailing
/// content fails the parse.
pub(crate) fn parse_complete(text: &str) -> Option<RawValue> {
    let mut parser = Parser::new(text, false);
    match parser.value() {
        Outcome::Done(value) => {
            parser.skip_trivia();
            parser.at_end().then_some(value)
        }
        _ => None,
    }
}

/// Parse the received prefix of a possibly-truncated value.
pub(crate) fn parse_partial(text: &str) -> Option<RawValue> {
    let mut parser = Parser::new(text, true);
    match parser.value() {
        Outcome::Done(value) | Outcome::Partial(Some(value)) => Some(value),
        Outcome::Partial(None) | Outcome::Fail => None,
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    partial: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, partial: bool) -> Self {
        Self {
            text,
            pos: 0,
            partial,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_whitespace()) {
                self.bump();
            }
            let rest = self.rest();
            if rest.starts_with("//") || rest.starts_with('#') {
                match rest.find('\n') {
                    Some(nl) => self.pos += nl + 1,
                    None => self.pos = self.text.len(),
                }
            } else if let Some(block) = rest.strip_prefix("/*") {
                match block.find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => self.pos = self.text.len(),
                }
            } else {
                return;
            }
        }
    }

    fn value(&mut self) -> Outcome<RawValue> {
        self.skip_trivia();
        match self.peek() {
            None => {
                if self.partial {
                    Outcome::Partial(None)
                } else {
                    Outcome::Fail
                }
            }
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(quote @ ('"' | '\'')) => match self.quoted_string(quote) {
                Outcome::Done(s) => Outcome::Done(RawValue::String(s)),
                Outcome::Partial(s) => Outcome::Partial(s.map(RawValue::String)),
                Outcome::Fail => Outcome::Fail,
            },
            Some(_) => self.unquoted_value(),
        }
    }

    fn object(&mut self) -> Outcome<RawValue> {
        self.bump(); // '{'
        let mut entries: IndexMap<String, RawValue> = IndexMap::new();

        loop {
            self.skip_trivia();
            match self.peek() {
                None => return self.close(RawValue::Object(entries)),
                Some('}') => {
                    self.bump();
                    return Outcome::Done(RawValue::Object(entries));
                }
                Some(',') => {
                    // Stray or trailing comma.
                    self.bump();
                    continue;
                }
                _ => {}
            }

            // Key. A key the buffer cut off mid-way is dropped, never
            // guessed at.
            let key = match self.peek() {
                Some(quote @ ('"' | '\'')) => match self.quoted_string(quote) {
                    Outcome::Done(key) => key,
                    Outcome::Partial(_) => return self.close(RawValue::Object(entries)),
                    Outcome::Fail => return Outcome::Fail,
                },
                _ => match self.unquoted_key() {
                    Some(key) => key,
                    None => return self.close(RawValue::Object(entries)),
                },
            };

            self.skip_trivia();
            match self.peek() {
                Some(':') => self.bump(),
                // Key with no value: tolerated only as truncation.
                _ => return self.close(RawValue::Object(entries)),
            }

            match self.value() {
                Outcome::Done(value) => {
                    entries.insert(key, value);
                }
                Outcome::Partial(received) => {
                    if let Some(value) = received {
                        entries.insert(key, value);
                    }
                    return Outcome::Partial(Some(RawValue::Object(entries)));
                }
                Outcome::Fail => return self.close(RawValue::Object(entries)),
            }

            self.skip_trivia();
            match self.peek() {
                Some(',') => self.bump(),
                Some('}') => {
                    self.bump();
                    return Outcome::Done(RawValue::Object(entries));
                }
                None => return self.close(RawValue::Object(entries)),
                // Missing comma between entries; treat it as implicit.
                Some(_) => {}
            }
        }
    }

    fn array(&mut self) -> Outcome<RawValue> {
        self.bump(); // '['
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            match self.peek() {
                None => return self.close(RawValue::Array(items)),
                Some(']') => {
                    self.bump();
                    return Outcome::Done(RawValue::Array(items));
                }
                Some(',') => {
                    self.bump();
                    continue;
                }
                _ => {}
            }

            match self.value() {
                Outcome::Done(value) => items.push(value),
                Outcome::Partial(received) => {
                    if let Some(value) = received {
                        items.push(value);
                    }
                    return Outcome::Partial(Some(RawValue::Array(items)));
                }
                Outcome::Fail => return self.close(RawValue::Array(items)),
            }

            self.skip_trivia();
            match self.peek() {
                Some(',') => self.bump(),
                Some(']') => {
                    self.bump();
                    return Outcome::Done(RawValue::Array(items));
                }
                None => return self.close(RawValue::Array(items)),
                Some(_) => {}
            }
        }
    }

    /// Truncation close: partial mode keeps what was received so far,
    /// complete mode treats an unterminated or malformed container as
    /// unparseable.
    fn close(&self, received: RawValue) -> Outcome<RawValue> {
        if self.partial {
            Outcome::Partial(Some(received))
        } else {
            Outcome::Fail
        }
    }

    fn quoted_string(&mut self, quote: char) -> Outcome<String> {
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        let _ = chars.next(); // opening quote

        loop {
            let Some((offset, c)) = chars.next() else {
                break;
            };
            if c == quote {
                self.pos += offset + c.len_utf8();
                return Outcome::Done(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some((_, escape)) = chars.next() else {
                // Dangling backslash at the end of the buffer.
                break;
            };
            match escape {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{0008}'),
                'f' => out.push('\u{000C}'),
                'u' => {
                    let mut code = String::with_capacity(4);
                    for _ in 0..4 {
                        match chars.next() {
                            Some((_, hex)) => code.push(hex),
                            None => {
                                // Escape cut off by the buffer end.
                                return self.string_truncated(out);
                            }
                        }
                    }
                    match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                        Some(decoded) => out.push(decoded),
                        None => out.push('\u{FFFD}'),
                    }
                }
                other => out.push(other),
            }
        }

        self.string_truncated(out)
    }

    fn string_truncated(&mut self, received: String) -> Outcome<String> {
        self.pos = self.text.len();
        if self.partial {
            Outcome::Partial(Some(received))
        } else {
            Outcome::Fail
        }
    }

    /// Read an unquoted object key up to `:`/`,`/`}`. Returns `None` when
    /// the buffer ends first.
    fn unquoted_key(&mut self) -> Option<String> {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let mut i = self.pos;
        while i < bytes.len() {
            match bytes[i] {
                b':' | b',' | b'}' => {
                    let key = self.text[start..i].trim().to_string();
                    self.pos = i;
                    return (!key.is_empty()).then_some(key);
                }
                _ => i += 1,
            }
        }
        self.pos = self.text.len();
        None
    }

    /// Read an unquoted scalar token and classify it.
    fn unquoted_value(&mut self) -> Outcome<RawValue> {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let mut end = None;
        let mut i = self.pos;
        while i < bytes.len() {
            match bytes[i] {
                b',' | b'}' | b']' | b'\n' | b'#' => {
                    end = Some(i);
                    break;
                }
                b'/' if matches!(bytes.get(i + 1), Some(&(b'/' | b'*'))) => {
                    end = Some(i);
                    break;
                }
                _ => i += 1,
            }
        }

        let (token_end, terminated) = match end {
            Some(i) => (i, true),
            None => (self.text.len(), false),
        };
        let token = self.text[start..token_end].trim();
        self.pos = token_end;

        if !terminated && self.partial {
            // A token the buffer cut off (`tru`, `12.`) only becomes a
            // value once a delimiter confirms it.
            return Outcome::Partial(None);
        }
        if token.is_empty() {
            return Outcome::Fail;
        }
        Outcome::Done(classify_token(token))
    }
}

/// Classify an unquoted token as boolean, null, number, or bare string.
pub(crate) fn classify_token(token: &str) -> RawValue {
    match token {
        "true" => RawValue::Bool(true),
        "false" => RawValue::Bool(false),
        "null" => RawValue::Null,
        _ => {
            if let Ok(i) = token.parse::<i64>() {
                RawValue::Int(i)
            } else if let Ok(f) = token.parse::<f64>() {
                if f.is_finite() {
                    RawValue::Float(f)
                } else {
                    RawValue::String(token.to_string())
                }
            } else {
                RawValue::String(token.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(json: serde_json::Value) -> RawValue {
        RawValue::from(json)
    }

    #[test]
    fn test_plain_json_object() {
        let parsed = parse_complete(r#"{"a": 1, "b": [true, null], "c": "x"}"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1, "b": [true, null], "c": "x"})));
    }

    #[test]
    fn test_single_quotes_and_unquoted_keys() {
        let parsed = parse_complete("{name: 'Alice', age: 30}").unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"name": "Alice", "age": 30})));
    }

    #[test]
    fn test_trailing_commas_and_comments() {
        let text = r#"{
            // the payload
            "a": 1, /* inline */ "b": 2,
        }"#;
        let parsed = parse_complete(text).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_unquoted_scalar_values() {
        let parsed = parse_complete("[yes maybe, 2.5, null]").unwrap();
        assert_eq!(parsed, raw(serde_json::json!(["yes maybe", 2.5, null])));
    }

    #[test]
    fn test_escape_sequences() {
        let parsed = parse_complete(r#"{"m": "he said \"hi\"\nA"}"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"m": "he said \"hi\"\nA"})));
    }

    #[test]
    fn test_complete_rejects_truncation() {
        assert!(parse_complete(r#"{"a": 1, "b": "#).is_none());
        assert!(parse_complete(r#"{"a": "unterminated"#).is_none());
        assert!(parse_complete("[1, 2,").is_none());
    }

    #[test]
    fn test_complete_rejects_trailing_garbage() {
        assert!(parse_complete(r#"{"a": 1} extra"#).is_none());
    }

    #[test]
    fn test_complete_rejects_code_block_braces() {
        // `{ return y; }` is a code snippet, not a payload.
        assert!(parse_complete("{ return y; }").is_none());
    }

    #[test]
    fn test_partial_closes_open_containers() {
        let parsed = parse_partial(r#"{"a": 1, "items": [1, 2,"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1, "items": [1, 2]})));
    }

    #[test]
    fn test_partial_keeps_string_prefix() {
        let parsed = parse_partial(r#"{"a": 1, "b": "par"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1, "b": "par"})));
    }

    #[test]
    fn test_partial_drops_incomplete_scalar() {
        let parsed = parse_partial(r#"{"a": 1, "b": tru"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_partial_drops_dangling_key() {
        let parsed = parse_partial(r#"{"a": 1, "b"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1})));

        let parsed = parse_partial(r#"{"a": 1, "b":"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_partial_nested_truncation() {
        let parsed = parse_partial(r#"[1, 2, [3, 4"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!([1, 2, [3]])));
    }

    #[test]
    fn test_partial_complete_input_parses_fully() {
        let parsed = parse_partial(r#"{"a": 1}"#).unwrap();
        assert_eq!(parsed, raw(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token("true"), RawValue::Bool(true));
        assert_eq!(classify_token("null"), RawValue::Null);
        assert_eq!(classify_token("-3"), RawValue::Int(-3));
        assert_eq!(classify_token("2.75"), RawValue::Float(2.75));
        assert_eq!(classify_token("2.7.5"), RawValue::String("2.7.5".into()));
    }
}
