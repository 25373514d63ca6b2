use crate::first_pass::first_pass;
use crate::msg::Diags;
use crate::preprocess::preprocess;
use crate::second_pass::{second_pass, Image};
use crate::symbol::SymbolTable;

// ----------------------------------------------------------------------------
// Pipeline

/// Everything one source file assembles to.
pub struct Assembly {
    pub am: String,
    pub symbols: SymbolTable,
    pub image: Option<Image>,
    pub diags: Diags,
}

/// Run the whole pipeline on one source text. The expanded `.am` text is
/// always produced; the image is present only when no stage reported an
/// error. `path` is the file name diagnostics point at.
pub fn assemble(source: &str, path: &str) -> Assembly {
    let mut syms = SymbolTable::new();
    let mut diags = Diags::new();

    let am = preprocess(source, path, &mut syms, &mut diags);
    first_pass(&am, path, &mut syms, &mut diags);

    if diags.has_errors() {
        return Assembly {
            am,
            symbols: syms,
            image: None,
            diags,
        };
    }

    let image = second_pass(&am, path, &mut syms, &mut diags);
    let image = if diags.has_errors() { None } else { Some(image) };

    Assembly {
        am,
        symbols: syms,
        image,
        diags,
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_produces_image() {
        let out = assemble("MAIN: mov r0, r1\nstop\n", "t.as");
        assert!(!out.diags.has_errors());
        assert_eq!(out.am, "MAIN: mov r0, r1\nstop\n");
        assert_eq!(out.image.unwrap().code.len(), 2);
    }

    #[test]
    fn first_pass_errors_skip_encoding() {
        let out = assemble("A: stop\nA: stop\n", "t.as");
        assert!(out.diags.has_errors());
        assert!(out.image.is_none());
    }

    #[test]
    fn second_pass_errors_drop_image() {
        let out = assemble("mov r9, r1\nstop\n", "t.as");
        assert_eq!(out.diags.count(), 1);
        assert!(out.image.is_none());
    }

    #[test]
    fn preprocess_errors_gate_output() {
        let out = assemble("mcro mov\nstop\nmcroend\nstop\n", "t.as");
        assert!(out.diags.has_errors());
        assert!(out.image.is_none());
    }
}
