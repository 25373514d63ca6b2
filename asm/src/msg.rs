use color_print::cprintln;

use crate::error::Error;
use crate::line::SourceLine;

// ----------------------------------------------------------------------------
// Diagnostics

/// Diagnostics for one assembly run. Every message is printed the moment it
/// is pushed; errors are also kept so the pipeline can gate on the count.
/// Warnings and notes are printed only.
#[derive(Debug, Default)]
pub struct Diags {
    list: Vec<Diag>,
}

#[derive(Debug)]
pub struct Diag {
    pub err: Error,
    pub line: usize,
}

impl Diags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, err: Error, line: &SourceLine) {
        cprintln!("<red,bold>error</>: {}", err);
        print_loc(line);
        self.list.push(Diag {
            err,
            line: line.num(),
        });
    }

    pub fn warn(&self, msg: &str, line: &SourceLine) {
        cprintln!("<yellow,bold>warn</>: {}", msg);
        print_loc(line);
    }

    pub fn note(&self, msg: &str, line: &SourceLine) {
        cprintln!("<green,bold>note</>: {}", msg);
        print_loc(line);
    }

    pub fn has_errors(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn count(&self) -> usize {
        self.list.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diag> {
        self.list.iter()
    }
}

fn print_loc(line: &SourceLine) {
    cprintln!("     <blue>--></> <underline>{}:{}</>", line.path(), line.num());
    cprintln!("      <blue>|</>");
    cprintln!(" <blue>{:>4} |</> {}", line.num(), line.text());
    cprintln!("      <blue>|</>");
}
