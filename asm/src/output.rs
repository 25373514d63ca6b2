use color_print::cformat;

use arch::mode::Mode;
use arch::op::Mnemonic;
use arch::word::Word;
use arch::START_ADDR;

use crate::second_pass::Image;
use crate::symbol::{SymKind, SymbolTable};

// ----------------------------------------------------------------------------
// Output text

/// Object file text. The header row holds the section sizes, then one row
/// per word, instruction section first with addresses running continuously
/// into the data section.
pub fn object_text(image: &Image) -> String {
    let ic = image.code.len();
    let dc = image.data.len();
    let width = 9usize.saturating_sub(ic.to_string().len());
    let mut out = format!("{:>width$} {}\n", ic, dc);
    let mut addr = START_ADDR;
    for word in image.code.iter().chain(&image.data) {
        out.push_str(&format!("{:07} {:06x}\n", addr, word.bits()));
        addr += 1;
    }
    out
}

/// Entry file text, one row per resolved entry in declaration order.
pub fn entries_text(syms: &SymbolTable) -> String {
    let mut out = String::new();
    for (name, addr) in syms.entries() {
        out.push_str(&format!("{} {:07}\n", name, addr));
    }
    out
}

/// Extern file text, one row per usage site.
pub fn externs_text(syms: &SymbolTable) -> String {
    let mut out = String::new();
    for (name, uses) in syms.extern_uses() {
        for addr in uses {
            out.push_str(&format!("{} {:07}\n", name, addr));
        }
    }
    out
}

// ----------------------------------------------------------------------------
// Dump listing

/// Colored listing of the image and the symbol table, shown by `--dump`.
/// Primary words are decoded back to their mnemonic; the operand words that
/// follow them are shown with their tag and payload.
pub fn dump_text(image: &Image, syms: &SymbolTable) -> String {
    let mut out = String::new();
    let mut addr = START_ADDR;
    let code = &image.code;
    let mut i = 0;
    while i < code.len() {
        let word = code[i];
        i += 1;
        match Mnemonic::from_codes(word.opcode(), word.funct()) {
            Some(cmd) => {
                out.push_str(&cformat!(
                    "<blue>{:07}</> {:06x}  <yellow>{}</>\n",
                    addr,
                    word.bits(),
                    cmd
                ));
                addr += 1;
                let mut extras = 0;
                if cmd.operands() == 2 && word.src_mode() != u8::from(Mode::Register) {
                    extras += 1;
                }
                if cmd.operands() >= 1 && word.dest_mode() != u8::from(Mode::Register) {
                    extras += 1;
                }
                for _ in 0..extras {
                    let Some(extra) = code.get(i) else { break };
                    i += 1;
                    out.push_str(&cformat!(
                        "<blue>{:07}</> {:06x}    {} {}\n",
                        addr,
                        extra.bits(),
                        are_tag(extra.are()),
                        extra.payload()
                    ));
                    addr += 1;
                }
            }
            None => {
                out.push_str(&cformat!("<blue>{:07}</> {:06x}\n", addr, word.bits()));
                addr += 1;
            }
        }
    }
    for word in &image.data {
        out.push_str(&cformat!(
            "<blue>{:07}</> {:06x}  <green>.data</> {}\n",
            addr,
            word.bits(),
            word.raw_value()
        ));
        addr += 1;
    }

    if syms.iter().next().is_some() {
        out.push_str(&cformat!("<bold>symbols:</>\n"));
        for (name, kind) in syms.iter() {
            let desc = match kind {
                SymKind::Label(a) | SymKind::Instruction(a) => {
                    cformat!("<yellow>code</>   {:07}", a)
                }
                SymKind::Data(a) => cformat!("<green>data</>   {:07}", a),
                SymKind::Extern { uses } => cformat!("<red>extern</> used {}", uses.len()),
                SymKind::Macro(_) => cformat!("<cyan>macro</>"),
            };
            out.push_str(&format!("  {:<12} {}\n", name, desc));
        }
    }
    out
}

fn are_tag(bits: u8) -> &'static str {
    match bits {
        0b100 => "A",
        0b010 => "R",
        0b001 => "E",
        _ => "-",
    }
}

// ----------------------------------------------------------------------------
