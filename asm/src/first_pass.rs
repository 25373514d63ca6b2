use arch::mode::Mode;
use arch::op::Mnemonic;

use crate::error::Error;
use crate::line::{self, SourceLine};
use crate::msg::Diags;
use crate::symbol::SymbolTable;

// ----------------------------------------------------------------------------
// First pass

/// Scan the expanded source once, declaring every symbol and sizing both
/// sections. Command syntax is not validated here, only counted; the second
/// pass reports what this one skips over. When the scan ends the table is
/// resolved, so it holds absolute addresses only.
pub fn first_pass(am: &str, path: &str, syms: &mut SymbolTable, diags: &mut Diags) {
    let mut ic: u32 = 0;
    let mut dc: u32 = 0;
    // a label alone on its line sticks to the next classifiable line
    let mut pending: Option<String> = None;

    for (idx, raw) in am.lines().enumerate() {
        let line = SourceLine::new(path, idx + 1, raw);
        let (first, mut rest) = line::split_first(raw);
        let Some(mut first) = first else {
            continue;
        };

        if let Some(name) = line::label_decl(first) {
            match syms.declare_label(name, ic) {
                Ok(()) => pending = Some(name.to_string()),
                Err(err) => diags.error(err, &line),
            }
            let (next, after) = line::split_first(rest);
            let Some(next) = next else {
                continue;
            };
            first = next;
            rest = after;
        }

        if let Some(dir) = first.strip_prefix('.') {
            match dir {
                "data" => {
                    if let Some(name) = pending.take() {
                        syms.mark_data(&name, dc);
                    }
                    dc += line::split_args(rest).len() as u32;
                }
                "string" => {
                    if let Some(name) = pending.take() {
                        syms.mark_data(&name, dc);
                    }
                    if let Some(content) = line::string_literal(rest) {
                        dc += content.len() as u32 + 1;
                    }
                }
                "extern" => {
                    if let Some(name) = pending.take() {
                        diags.warn(
                            &format!("Label `{}` before `.extern` has no effect", name),
                            &line,
                        );
                    }
                    match line::split_first(rest).0 {
                        None => diags.error(Error::ExternMissingArgument, &line),
                        Some(name) => {
                            if let Err(err) = syms.declare_extern(name) {
                                diags.error(err, &line);
                            }
                        }
                    }
                }
                "entry" => {
                    if let Some(name) = pending.take() {
                        diags.warn(
                            &format!("Label `{}` before `.entry` has no effect", name),
                            &line,
                        );
                    }
                    match line::split_first(rest).0 {
                        None => diags.error(Error::EntryMissingArgument, &line),
                        Some(name) => {
                            if let Err(err) = syms.declare_entry(name, &line) {
                                diags.error(err, &line);
                            }
                        }
                    }
                }
                _ => pending = None,
            }
        } else if let Ok(cmd) = Mnemonic::parse(first) {
            if let Some(name) = pending.take() {
                syms.mark_instruction(&name);
            }
            ic += 1;
            for arg in line::split_args(rest).iter().take(cmd.operands()) {
                if Mode::classify(arg) != Some(Mode::Register) {
                    ic += 1;
                }
            }
        } else {
            pending = None;
        }
    }

    for (name, decl) in syms.resolve_addresses(ic) {
        diags.error(Error::LabelNotFound(name), &decl);
    }
}

// ----------------------------------------------------------------------------
