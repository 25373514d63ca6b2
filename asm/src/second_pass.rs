use arch::mode::Mode;
use arch::op::Mnemonic;
use arch::reg::Reg;
use arch::word::{Are, Word};
use arch::START_ADDR;

use crate::error::Error;
use crate::line::{self, SourceLine};
use crate::msg::Diags;
use crate::symbol::{SymKind, SymbolTable};

// ----------------------------------------------------------------------------
// Second pass

/// Words of an encoded program. The instruction section loads at
/// `START_ADDR`, the data section right after it.
#[derive(Debug, Default)]
pub struct Image {
    pub code: Vec<Word>,
    pub data: Vec<Word>,
}

/// Re-scan the expanded source with the resolved symbol table and encode
/// every word. Validation errors skip the words of the failing operand or
/// line but never stop the scan; the caller gates on the error count before
/// using the image.
pub fn second_pass(am: &str, path: &str, syms: &mut SymbolTable, diags: &mut Diags) -> Image {
    let mut image = Image::default();

    for (idx, raw) in am.lines().enumerate() {
        let line = SourceLine::new(path, idx + 1, raw);
        let (first, mut rest) = line::split_first(raw);
        let Some(mut first) = first else {
            continue;
        };

        // labels were recorded by the first pass
        if line::label_decl(first).is_some() {
            let (next, after) = line::split_first(rest);
            let Some(next) = next else {
                continue;
            };
            first = next;
            rest = after;
        }

        if let Some(dir) = first.strip_prefix('.') {
            match dir {
                "data" => encode_data(rest, &line, &mut image.data, diags),
                "string" => encode_string(rest, &line, &mut image.data, diags),
                "extern" | "entry" => {}
                _ => diags.error(Error::UnknownDirective(dir.to_string()), &line),
            }
            continue;
        }

        encode_command(first, rest, &line, syms, &mut image.code, diags);
    }
    image
}

// ----------------------------------------------------------------------------
// Commands

fn encode_command(
    name: &str,
    rest: &str,
    line: &SourceLine,
    syms: &mut SymbolTable,
    code: &mut Vec<Word>,
    diags: &mut Diags,
) {
    let Ok(cmd) = Mnemonic::parse(name) else {
        diags.error(Error::InvalidCommandName(name.to_string()), line);
        return;
    };

    let args = line::split_args(rest);
    let (src, dest) = match cmd.operands() {
        2 => {
            if args.len() < 2 {
                diags.error(Error::MissingArguments(name.to_string()), line);
                return;
            }
            if args.len() > 2 {
                diags.error(Error::ExtraneousText, line);
                return;
            }
            (Some(args[0]), Some(args[1]))
        }
        1 => {
            if args.is_empty() {
                diags.error(Error::MissingArguments(name.to_string()), line);
                return;
            }
            if args.len() > 1 {
                diags.error(Error::ExtraneousText, line);
                return;
            }
            (None, Some(args[0]))
        }
        _ => {
            if !args.is_empty() {
                diags.error(Error::ExtraneousText, line);
                return;
            }
            (None, None)
        }
    };

    let dest_mode = match dest {
        Some(arg) => match Mode::classify(arg) {
            Some(mode) => Some(mode),
            None => {
                diags.error(Error::InvalidDestAddressing(arg.to_string()), line);
                return;
            }
        },
        None => None,
    };
    let src_mode = match src {
        Some(arg) => match Mode::classify(arg) {
            Some(mode) => Some(mode),
            None => {
                diags.error(Error::InvalidSourceAddressing(arg.to_string()), line);
                return;
            }
        },
        None => None,
    };

    if let (Some(arg), Some(mode)) = (src, src_mode) {
        if !cmd.src_modes().allows(mode) {
            diags.error(Error::InvalidSourceAddressing(arg.to_string()), line);
            return;
        }
    }
    if let (Some(arg), Some(mode)) = (dest, dest_mode) {
        if !cmd.dest_modes().allows(mode) {
            diags.error(Error::InvalidDestAddressing(arg.to_string()), line);
            return;
        }
    }

    let src_reg = match (src, src_mode) {
        (Some(arg), Some(Mode::Register)) => reg_index(arg),
        _ => 0,
    };
    let dest_reg = match (dest, dest_mode) {
        (Some(arg), Some(Mode::Register)) => reg_index(arg),
        _ => 0,
    };

    // absent operands leave zeroed mode fields
    let primary = START_ADDR + code.len() as u32;
    code.push(Word::instruction(
        cmd.opcode(),
        src_mode.unwrap_or(Mode::Immediate),
        src_reg,
        dest_mode.unwrap_or(Mode::Immediate),
        dest_reg,
        cmd.funct(),
        Are::Absolute,
    ));

    // a failing operand drops only its own word, the line is not abandoned
    if let (Some(arg), Some(mode)) = (src, src_mode) {
        encode_operand(arg, mode, primary, syms, code, line, diags);
    }
    if let (Some(arg), Some(mode)) = (dest, dest_mode) {
        encode_operand(arg, mode, primary, syms, code, line, diags);
    }
}

fn encode_operand(
    arg: &str,
    mode: Mode,
    primary: u32,
    syms: &mut SymbolTable,
    code: &mut Vec<Word>,
    line: &SourceLine,
    diags: &mut Diags,
) {
    match mode {
        Mode::Immediate => match arg.strip_prefix('#').and_then(parse_int) {
            Some(value) => code.push(Word::value(value, Are::Absolute)),
            None => diags.error(Error::InvalidImmediateValue(arg.to_string()), line),
        },
        Mode::Direct => match syms.lookup(arg) {
            Some(SymKind::Label(addr))
            | Some(SymKind::Instruction(addr))
            | Some(SymKind::Data(addr)) => {
                code.push(Word::value(*addr as i32, Are::Relocatable));
            }
            Some(SymKind::Extern { .. }) => {
                let here = START_ADDR + code.len() as u32;
                code.push(Word::value(0, Are::External));
                syms.record_extern_use(arg, here);
            }
            _ => diags.error(Error::LabelNotFound(arg.to_string()), line),
        },
        Mode::Relative => {
            // one `&` belongs to the mode, anything more stays in the name
            let target = arg.strip_prefix('&').unwrap_or(arg);
            match syms.lookup(target) {
                Some(SymKind::Label(addr))
                | Some(SymKind::Instruction(addr))
                | Some(SymKind::Data(addr)) => {
                    code.push(Word::value(*addr as i32 - primary as i32, Are::Absolute));
                }
                _ => diags.error(Error::LabelNotFound(target.to_string()), line),
            }
        }
        Mode::Register => {
            if Reg::parse(arg).is_err() {
                diags.error(Error::RegisterOutOfBounds(arg.to_string()), line);
            }
        }
    }
}

fn reg_index(arg: &str) -> u8 {
    Reg::parse(arg).map(Reg::index).unwrap_or(0)
}

/// Signed decimal literal: optional sign, then digits only.
fn parse_int(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i64>().ok().map(|v| v as i32)
}

// ----------------------------------------------------------------------------
// Data directives

fn encode_data(rest: &str, line: &SourceLine, data: &mut Vec<Word>, diags: &mut Diags) {
    let items = line::split_args(rest);
    if items.is_empty() {
        diags.error(Error::MissingData("data".to_string()), line);
        return;
    }
    for item in items {
        match parse_int(item) {
            Some(value) => data.push(Word::raw(value)),
            None => diags.error(Error::InvalidDataValue(item.to_string()), line),
        }
    }
}

fn encode_string(rest: &str, line: &SourceLine, data: &mut Vec<Word>, diags: &mut Diags) {
    if rest.trim().is_empty() {
        diags.error(Error::MissingData("string".to_string()), line);
        return;
    }
    match line::string_literal(rest) {
        Some(content) => {
            for b in content.bytes() {
                data.push(Word::raw(b as i32));
            }
            data.push(Word::raw(0));
        }
        None => diags.error(Error::InvalidStringFormat(rest.trim().to_string()), line),
    }
}

// ----------------------------------------------------------------------------
