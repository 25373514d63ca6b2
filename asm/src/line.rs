// ----------------------------------------------------------------------------
// Source line

/// One line of the macro-expanded source. `num` is its 1-based position in
/// the expanded text, which is what diagnostics and the `.am` file show.
#[derive(Debug, Clone)]
pub struct SourceLine {
    path: String,
    num: usize,
    text: String,
}

impl SourceLine {
    pub fn new(path: &str, num: usize, text: &str) -> Self {
        Self {
            path: path.to_string(),
            num,
            text: text.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn num(&self) -> usize {
        self.num
    }
    pub fn text(&self) -> &str {
        &self.text
    }
}

// ----------------------------------------------------------------------------
// Tokens

/// First whitespace-delimited token of `s` and the remainder after it.
pub fn split_first(s: &str) -> (Option<&str>, &str) {
    let s = s.trim_start();
    if s.is_empty() {
        return (None, "");
    }
    match s.split_once(|c: char| c.is_whitespace()) {
        Some((tok, rest)) => (Some(tok), rest),
        None => (Some(s), ""),
    }
}

/// `Some(name)` when the token is a label declaration (`NAME:`).
pub fn label_decl(tok: &str) -> Option<&str> {
    tok.strip_suffix(':')
}

/// Comma-separated pieces of an operand or `.data` list, each trimmed.
/// An all-whitespace remainder has no pieces at all.
pub fn split_args(rest: &str) -> Vec<&str> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Vec::new();
    }
    rest.split(',').map(str::trim).collect()
}

/// Content of a `"`-delimited string literal, quotes stripped. The literal
/// spans the whole remainder of the line.
pub fn string_literal(rest: &str) -> Option<&str> {
    rest.trim().strip_prefix('"')?.strip_suffix('"')
}
