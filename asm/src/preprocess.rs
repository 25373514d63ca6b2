use std::mem;

use arch::op::Mnemonic;

use crate::error::Error;
use crate::line::{self, SourceLine};
use crate::msg::Diags;
use crate::symbol::SymbolTable;

// ----------------------------------------------------------------------------
// Macro preprocessor

enum State {
    Normal,
    Collecting {
        name: String,
        body: String,
        keep: bool,
    },
}

/// Expand macros in a raw source text. Comment and blank lines are dropped,
/// every surviving line loses its leading whitespace, and a line whose first
/// token names a stored macro is replaced by the macro body. The result is
/// the `.am` text the two passes parse.
///
/// Macro names land in the symbol table so a later label cannot shadow one.
pub fn preprocess(src: &str, path: &str, syms: &mut SymbolTable, diags: &mut Diags) -> String {
    let mut out = String::new();
    let mut state = State::Normal;

    for (idx, raw) in src.lines().enumerate() {
        let line = SourceLine::new(path, idx + 1, raw);
        let trimmed = raw.trim_start();
        let (first, rest) = line::split_first(raw);
        let Some(first) = first else {
            continue;
        };
        if first.starts_with(';') {
            continue;
        }

        match &mut state {
            State::Normal => {
                if first == "mcro" {
                    match line::split_first(rest).0 {
                        None => diags.error(Error::MissingMacroName, &line),
                        Some(name) => {
                            let keep = check_name(name, syms, diags, &line);
                            state = State::Collecting {
                                name: name.to_string(),
                                body: String::new(),
                                keep,
                            };
                        }
                    }
                } else if first == "mcroend" {
                    // stray terminator, nothing to close
                } else if let Some(body) = syms.macro_body(first) {
                    out.push_str(body);
                } else {
                    out.push_str(trimmed);
                    out.push('\n');
                }
            }
            State::Collecting { name, body, keep } => {
                if first == "mcroend" {
                    if *keep {
                        let name = mem::take(name);
                        if let Err(err) = syms.declare_macro(&name, mem::take(body)) {
                            diags.error(err, &line);
                        }
                    }
                    state = State::Normal;
                } else {
                    body.push_str(trimmed);
                    body.push('\n');
                }
            }
        }
    }
    // a macro still open at EOF was never closed, its body is discarded
    out
}

fn check_name(name: &str, syms: &SymbolTable, diags: &mut Diags, line: &SourceLine) -> bool {
    if Mnemonic::parse(name).is_ok() {
        diags.error(Error::MacroNameIsCommand(name.to_string()), line);
        return false;
    }
    if syms.macro_body(name).is_some() {
        diags.error(Error::MacroAlreadyDefined(name.to_string()), line);
        return false;
    }
    true
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> (String, SymbolTable, Diags) {
        let mut syms = SymbolTable::new();
        let mut diags = Diags::new();
        let am = preprocess(src, "test.as", &mut syms, &mut diags);
        (am, syms, diags)
    }

    #[test]
    fn copies_lines_trimmed() {
        let (am, _, diags) = run("  mov r1, r2\n\n; comment\n\tstop\n");
        assert_eq!(am, "mov r1, r2\nstop\n");
        assert!(!diags.has_errors());
    }

    #[test]
    fn expands_invocation() {
        let src = "mcro twice\n  inc r1\n  inc r1\nmcroend\ntwice\nstop\n";
        let (am, syms, diags) = run(src);
        assert_eq!(am, "inc r1\ninc r1\nstop\n");
        assert_eq!(syms.macro_body("twice"), Some("inc r1\ninc r1\n"));
        assert!(!diags.has_errors());
    }

    #[test]
    fn invocation_only_as_first_token() {
        let src = "mcro m\nstop\nmcroend\nprn m\n";
        let (am, _, _) = run(src);
        assert_eq!(am, "prn m\n");
    }

    #[test]
    fn comments_dropped_inside_body() {
        let src = "mcro m\n; note\n\nstop\nmcroend\nm\n";
        let (am, _, _) = run(src);
        assert_eq!(am, "stop\n");
    }

    #[test]
    fn missing_name_keeps_scanning() {
        let (am, _, diags) = run("mcro\nstop\n");
        assert_eq!(am, "stop\n");
        assert!(matches!(
            diags.iter().next().map(|d| &d.err),
            Some(Error::MissingMacroName)
        ));
    }

    #[test]
    fn command_name_discards_body() {
        let src = "mcro mov\ninc r1\nmcroend\nmov r1, r2\n";
        let (am, syms, diags) = run(src);
        assert_eq!(am, "mov r1, r2\n");
        assert!(syms.macro_body("mov").is_none());
        assert!(matches!(
            diags.iter().next().map(|d| &d.err),
            Some(Error::MacroNameIsCommand(_))
        ));
    }

    #[test]
    fn duplicate_macro_discards_body() {
        let src = "mcro m\nstop\nmcroend\nmcro m\ninc r1\nmcroend\nm\n";
        let (am, syms, diags) = run(src);
        assert_eq!(am, "stop\n");
        assert_eq!(syms.macro_body("m"), Some("stop\n"));
        assert!(matches!(
            diags.iter().next().map(|d| &d.err),
            Some(Error::MacroAlreadyDefined(_))
        ));
    }

    #[test]
    fn stray_mcroend_is_dropped() {
        let (am, _, diags) = run("mcroend\nstop\n");
        assert_eq!(am, "stop\n");
        assert!(!diags.has_errors());
    }

    #[test]
    fn unterminated_macro_is_discarded() {
        let (am, syms, _) = run("mcro m\ninc r1\n");
        assert_eq!(am, "");
        assert!(syms.macro_body("m").is_none());
    }

    #[test]
    fn expansion_is_idempotent() {
        let src = "mcro m\ninc r1\nmcroend\nm\nstop\n";
        let (am, _, _) = run(src);
        let (again, _, diags) = run(&am);
        assert_eq!(again, am);
        assert!(!diags.has_errors());
    }
}
