//! Chairman payload extraction
//!
//! The chairman is instructed to answer with bare JSON, but models wrap
//! their output in prose or markdown fences often enough that a single
//! `serde_json::from_str` would reject a usable response. Extraction runs
//! an ordered sequence of pure strategies; the first one that yields a
//! JSON object wins.
//!
//! | Strategy | Handles |
//! |----------|---------|
//! | [`parse_direct`] | the whole response is clean JSON |
//! | [`parse_fenced`] | JSON inside a ```json (or bare ```) fence amid prose |
//! | [`parse_balanced`] | JSON embedded in prose with no fence |
//!
//! All strategies are side-effect free; `None` from every strategy means
//! the response is unusable and the synthesis stage must fail as
//! chairman-invalid.

use serde_json::Value;

/// Extract the chairman's JSON object from a raw response.
///
/// Tries each strategy in order and returns the first JSON *object* found;
/// scalar or array JSON never satisfies the chairman contract.
pub fn extract_payload(raw: &str) -> Option<Value> {
    parse_direct(raw)
        .or_else(|| parse_fenced(raw))
        .or_else(|| parse_balanced(raw))
}

/// Strategy 1: the entire trimmed response parses as a JSON object.
pub fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str::<Value>(raw.trim())
        .ok()
        .filter(Value::is_object)
}

/// Strategy 2: a fenced code block marked ```json (or an untagged ```)
/// whose contents parse as a JSON object. Scans fences in order and takes
/// the first that parses.
pub fn parse_fenced(raw: &str) -> Option<Value> {
    let mut rest = raw;
    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        // The fence tag is the remainder of the opening line
        let (tag, body_start) = match after_open.find('\n') {
            Some(newline) => (&after_open[..newline], newline + 1),
            None => return None,
        };
        let tag = tag.trim();
        let body = &after_open[body_start..];

        if let Some(close) = body.find("```") {
            if tag.is_empty() || tag.eq_ignore_ascii_case("json") {
                if let Some(value) = parse_direct(&body[..close]) {
                    return Some(value);
                }
            }
            rest = &body[close + 3..];
        } else {
            return None;
        }
    }
    None
}

/// Strategy 3: the outermost balanced `{ ... }` substring.
///
/// Walks the text tracking brace nesting depth, honoring JSON string
/// literals and escapes so braces inside strings don't miscount. Each
/// balanced candidate is tried in order of its opening brace.
pub fn parse_balanced(raw: &str) -> Option<Value> {
    let bytes = raw.as_bytes();
    let mut start = 0;
    while let Some(open) = raw[start..].find('{').map(|i| start + i) {
        if let Some(end) = matching_close(bytes, open) {
            if let Some(value) = parse_direct(&raw[open..=end]) {
                return Some(value);
            }
            // A balanced but unparsable candidate: resume after its opener
        }
        start = open + 1;
    }
    None
}

/// Index of the `}` closing the `{` at `open`, or `None` if unbalanced.
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"final_answer": "Build it", "confidence": "high"}"#;

    #[test]
    fn test_direct_clean_json() {
        let value = extract_payload(PAYLOAD).unwrap();
        assert_eq!(value["final_answer"], "Build it");
    }

    #[test]
    fn test_direct_with_whitespace() {
        let raw = format!("\n\n  {PAYLOAD}  \n");
        assert!(extract_payload(&raw).is_some());
    }

    #[test]
    fn test_direct_rejects_non_object() {
        assert!(parse_direct("[1, 2, 3]").is_none());
        assert!(parse_direct("\"just a string\"").is_none());
        assert!(parse_direct("42").is_none());
    }

    #[test]
    fn test_fenced_json_block_amid_prose() {
        let raw = format!(
            "Here is my synthesis as requested.\n\n```json\n{PAYLOAD}\n```\n\nLet me know if you need more."
        );
        let value = extract_payload(&raw).unwrap();
        assert_eq!(value["confidence"], "high");
    }

    #[test]
    fn test_fenced_untagged_block() {
        let raw = format!("Result:\n```\n{PAYLOAD}\n```");
        assert!(parse_fenced(&raw).is_some());
    }

    #[test]
    fn test_fenced_skips_non_json_fence() {
        let raw = format!(
            "First some code:\n```python\nprint('hi')\n```\nThen the answer:\n```json\n{PAYLOAD}\n```"
        );
        let value = parse_fenced(&raw).unwrap();
        assert_eq!(value["final_answer"], "Build it");
    }

    #[test]
    fn test_balanced_braces_in_prose() {
        let raw = format!("After much deliberation the council concludes: {PAYLOAD} Thank you.");
        let value = extract_payload(&raw).unwrap();
        assert_eq!(value["final_answer"], "Build it");
    }

    #[test]
    fn test_balanced_handles_nesting() {
        let raw = r#"Verdict below.
{"final_answer": "Go", "disagreements": [{"topic": "t", "summary": "s", "chairman_verdict": "v"}], "confidence": "low"}
Done."#;
        let value = parse_balanced(raw).unwrap();
        assert_eq!(value["disagreements"][0]["topic"], "t");
    }

    #[test]
    fn test_balanced_ignores_braces_inside_strings() {
        let raw = r#"Note: {"final_answer": "use {braces} and \"quotes\" wisely", "confidence": "low"} end"#;
        let value = parse_balanced(raw).unwrap();
        assert_eq!(value["final_answer"], "use {braces} and \"quotes\" wisely");
    }

    #[test]
    fn test_all_strategies_agree() {
        let direct = extract_payload(PAYLOAD).unwrap();
        let fenced = extract_payload(&format!("```json\n{PAYLOAD}\n```")).unwrap();
        let embedded = extract_payload(&format!("prose {PAYLOAD} prose")).unwrap();
        assert_eq!(direct, fenced);
        assert_eq!(direct, embedded);
    }

    #[test]
    fn test_garbage_yields_none() {
        assert!(extract_payload("I am unable to comply with that request.").is_none());
        assert!(extract_payload("").is_none());
        assert!(extract_payload("{ not json at all").is_none());
    }

    #[test]
    fn test_unbalanced_braces_yield_none() {
        assert!(parse_balanced("{\"final_answer\": \"oops\"").is_none());
    }
}
