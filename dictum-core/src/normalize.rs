//! Lenient pre-pass over raw provider output: reduce a verbose reply to one
//! candidate command line before strict validation. Normalization never
//! fabricates validity — malformed input still fails the parser.

use crate::builtins::REASONING_NAME;

#[derive(Debug, Clone)]
pub struct ReplyNormalizer {
    reasoning_open: String,
}

impl Default for ReplyNormalizer {
    fn default() -> Self {
        Self::for_reasoning_capability(REASONING_NAME)
    }
}

impl ReplyNormalizer {
    /// Normalizer anchored on the given reasoning capability name.
    pub fn for_reasoning_capability(name: &str) -> Self {
        Self {
            reasoning_open: format!("{name}(\""),
        }
    }

    /// Truncate to the first line; then, if the line opens with the reasoning
    /// capability's quoted prefix, cut just past its closing `")`; otherwise
    /// cut at the first call-closing parenthesis. Both cuts are quote-aware:
    /// a parenthesis inside a string literal never closes the call.
    pub fn normalize(&self, raw: &str) -> String {
        let line = raw.lines().next().unwrap_or("").trim();
        let from = if line.starts_with(&self.reasoning_open) {
            // Start the scan at the opening quote so the close lands on the
            // `")` that ends the reasoning text.
            self.reasoning_open.len() - 1
        } else {
            0
        };
        match find_call_close(line, from) {
            Some(end) => line[..end].to_string(),
            None => line.to_string(),
        }
    }
}

/// Byte offset just past the first `)` at or after `from` that is not inside
/// a string literal.
fn find_call_close(line: &str, from: usize) -> Option<usize> {
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if idx < from {
            continue;
        }
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => in_string = Some(c),
            ')' => return Some(idx + 1),
            _ => {}
        }
    }
    None
}
