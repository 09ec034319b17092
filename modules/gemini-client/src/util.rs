//! Postprocessing for model text output.
//!
//! Grounded responses are free-form: the model may wrap its JSON in
//! prose, code fences, or apologies. These helpers recover the payload
//! without touching the network layer.

/// Strip markdown code fences from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Locate the first syntactically valid JSON array embedded in `text`.
///
/// Walks candidate `[` positions and matches the balancing `]` with a
/// string- and escape-aware scan, then confirms the span parses as a
/// JSON array. Returns `None` when the text contains no such span.
pub fn first_json_array(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = text[start..].find('[') {
        let open = start + offset;
        if let Some(close) = matching_bracket(bytes, open) {
            let span = &text[open..=close];
            if serde_json::from_str::<serde_json::Value>(span)
                .map(|v| v.is_array())
                .unwrap_or(false)
            {
                return Some(span);
            }
        }
        start = open + 1;
    }
    None
}

/// Index of the `]` balancing the `[` at `open`, skipping brackets
/// inside string literals.
fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
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
            b'[' => depth += 1,
            b']' => {
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

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_blocks("```\n[]\n```"), "[]");
        assert_eq!(strip_code_blocks("[]"), "[]");
    }

    #[test]
    fn finds_bare_array() {
        assert_eq!(first_json_array(r#"[1, 2, 3]"#), Some(r#"[1, 2, 3]"#));
    }

    #[test]
    fn finds_array_wrapped_in_prose() {
        let text = r#"Here are the results you asked for: [{"name": "Le Pain"}] Hope that helps!"#;
        assert_eq!(first_json_array(text), Some(r#"[{"name": "Le Pain"}]"#));
    }

    #[test]
    fn tolerates_brackets_inside_strings() {
        let text = r#"noise ["a ] tricky [ string", "b"] trailing"#;
        assert_eq!(
            first_json_array(text),
            Some(r#"["a ] tricky [ string", "b"]"#)
        );
    }

    #[test]
    fn skips_invalid_span_and_finds_later_array() {
        let text = r#"[not json at all] but then ["fine"]"#;
        assert_eq!(first_json_array(text), Some(r#"["fine"]"#));
    }

    #[test]
    fn handles_nested_arrays() {
        let text = r#"result: [[1, 2], [3]]"#;
        assert_eq!(first_json_array(text), Some(r#"[[1, 2], [3]]"#));
    }

    #[test]
    fn no_array_yields_none() {
        assert_eq!(first_json_array("Sorry, I cannot help."), None);
        assert_eq!(first_json_array(""), None);
        assert_eq!(first_json_array("{ \"object\": true }"), None);
    }

    #[test]
    fn unclosed_array_yields_none() {
        assert_eq!(first_json_array(r#"["never closed"#), None);
    }
}
