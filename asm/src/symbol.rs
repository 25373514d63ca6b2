use indexmap::IndexMap;

use arch::op::Mnemonic;
use arch::START_ADDR;

use crate::error::Error;
use crate::line::SourceLine;

// ----------------------------------------------------------------------------
// Symbols

/// What a name stands for. A plain `Label` is a declaration whose section is
/// not known yet; the first pass reclassifies it to `Instruction` or `Data`
/// when the rest of its line tells. The carried number is a section offset
/// until `resolve_addresses` rewrites it to an absolute address.
#[derive(Debug, Clone, PartialEq)]
pub enum SymKind {
    Label(u32),
    Instruction(u32),
    Data(u32),
    Extern { uses: Vec<u32> },
    Macro(String),
}

#[derive(Debug)]
struct Entry {
    decl: SourceLine,
    addr: Option<u32>,
}

/// All names of one source file. Labels, externs and macros share a single
/// namespace; entries are separate bookkeeping and may alias a label.
/// Insertion order is preserved for the `.ent`/`.ext` writers.
#[derive(Debug, Default)]
pub struct SymbolTable {
    syms: IndexMap<String, SymKind>,
    entries: IndexMap<String, Entry>,
}

fn valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_name(name: &str) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::EmptyLabel);
        }
        if !valid_label(name) {
            return Err(Error::InvalidLabelFormat(name.to_string()));
        }
        Ok(())
    }

    pub fn declare_label(&mut self, name: &str, ic: u32) -> Result<(), Error> {
        Self::check_name(name)?;
        match self.syms.get(name) {
            Some(SymKind::Macro(_)) => Err(Error::LabelIsMacroName(name.to_string())),
            Some(_) => Err(Error::LabelAlreadyDefined(name.to_string())),
            None => {
                self.syms.insert(name.to_string(), SymKind::Label(ic));
                Ok(())
            }
        }
    }

    pub fn declare_extern(&mut self, name: &str) -> Result<(), Error> {
        Self::check_name(name)?;
        match self.syms.get(name) {
            Some(SymKind::Extern { .. }) => return Err(Error::ExternNotUnique(name.to_string())),
            Some(SymKind::Macro(_)) => return Err(Error::LabelIsMacroName(name.to_string())),
            Some(_) => return Err(Error::LabelAlreadyDefined(name.to_string())),
            None => {}
        }
        if self.entries.contains_key(name) {
            return Err(Error::ConflictingEntryAndExtern(name.to_string()));
        }
        self.syms
            .insert(name.to_string(), SymKind::Extern { uses: Vec::new() });
        Ok(())
    }

    pub fn declare_entry(&mut self, name: &str, decl: &SourceLine) -> Result<(), Error> {
        Self::check_name(name)?;
        if self.entries.contains_key(name) {
            return Err(Error::EntryAlreadyDefined(name.to_string()));
        }
        match self.syms.get(name) {
            Some(SymKind::Extern { .. }) => {
                return Err(Error::ConflictingEntryAndExtern(name.to_string()))
            }
            Some(SymKind::Macro(_)) => return Err(Error::LabelIsMacroName(name.to_string())),
            _ => {}
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                decl: decl.clone(),
                addr: None,
            },
        );
        Ok(())
    }

    pub fn declare_macro(&mut self, name: &str, body: String) -> Result<(), Error> {
        if Mnemonic::parse(name).is_ok() {
            return Err(Error::MacroNameIsCommand(name.to_string()));
        }
        if self.syms.contains_key(name) {
            return Err(Error::MacroAlreadyDefined(name.to_string()));
        }
        self.syms.insert(name.to_string(), SymKind::Macro(body));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&SymKind> {
        self.syms.get(name)
    }

    pub fn macro_body(&self, name: &str) -> Option<&str> {
        match self.syms.get(name) {
            Some(SymKind::Macro(body)) => Some(body),
            _ => None,
        }
    }

    /// Reclassify a pending label as an instruction label. Its offset was
    /// fixed at declaration.
    pub fn mark_instruction(&mut self, name: &str) {
        if let Some(kind) = self.syms.get_mut(name) {
            if let SymKind::Label(off) = *kind {
                *kind = SymKind::Instruction(off);
            }
        }
    }

    /// Reclassify a pending label as a data label at the current data
    /// counter.
    pub fn mark_data(&mut self, name: &str, dc: u32) {
        if let Some(kind @ SymKind::Label(_)) = self.syms.get_mut(name) {
            *kind = SymKind::Data(dc);
        }
    }

    pub fn record_extern_use(&mut self, name: &str, addr: u32) {
        if let Some(SymKind::Extern { uses }) = self.syms.get_mut(name) {
            uses.push(addr);
        }
    }

    /// End-of-first-pass address resolution: every offset becomes an
    /// absolute address, instructions from `START_ADDR`, data after the
    /// instruction section. Entries take the address of their target label;
    /// the returned list holds the ones that matched neither an instruction
    /// nor a data label.
    pub fn resolve_addresses(&mut self, ic_total: u32) -> Vec<(String, SourceLine)> {
        for kind in self.syms.values_mut() {
            match kind {
                SymKind::Data(off) => *off += START_ADDR + ic_total,
                SymKind::Instruction(off) | SymKind::Label(off) => *off += START_ADDR,
                _ => {}
            }
        }

        let mut unresolved = Vec::new();
        for (name, entry) in self.entries.iter_mut() {
            match self.syms.get(name) {
                Some(SymKind::Instruction(addr)) | Some(SymKind::Data(addr)) => {
                    entry.addr = Some(*addr)
                }
                _ => unresolved.push((name.clone(), entry.decl.clone())),
            }
        }
        unresolved
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn extern_use_count(&self) -> usize {
        self.syms
            .values()
            .filter_map(|kind| match kind {
                SymKind::Extern { uses } => Some(uses.len()),
                _ => None,
            })
            .sum()
    }

    /// Resolved entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .filter_map(|(name, e)| e.addr.map(|a| (name.as_str(), a)))
    }

    /// Externs in declaration order, each with its usage addresses in
    /// encounter order.
    pub fn extern_uses(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.syms.iter().filter_map(|(name, kind)| match kind {
            SymKind::Extern { uses } => Some((name.as_str(), uses.as_slice())),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymKind)> {
        self.syms.iter().map(|(name, kind)| (name.as_str(), kind))
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> SourceLine {
        SourceLine::new("test.am", 1, text)
    }

    #[test]
    fn label_redefinition() {
        let mut syms = SymbolTable::new();
        syms.declare_label("MAIN", 0).unwrap();
        syms.mark_instruction("MAIN");
        assert!(matches!(
            syms.declare_label("MAIN", 3),
            Err(Error::LabelAlreadyDefined(_))
        ));
    }

    #[test]
    fn label_name_checks() {
        let mut syms = SymbolTable::new();
        assert!(matches!(syms.declare_label("", 0), Err(Error::EmptyLabel)));
        assert!(matches!(
            syms.declare_label("9lives", 0),
            Err(Error::InvalidLabelFormat(_))
        ));
        assert!(matches!(
            syms.declare_label("no_good", 0),
            Err(Error::InvalidLabelFormat(_))
        ));
        syms.declare_label("ok123", 0).unwrap();
    }

    #[test]
    fn entry_extern_conflict_is_symmetric() {
        let mut syms = SymbolTable::new();
        syms.declare_extern("X").unwrap();
        assert!(matches!(
            syms.declare_entry("X", &line(".entry X")),
            Err(Error::ConflictingEntryAndExtern(_))
        ));

        let mut syms = SymbolTable::new();
        syms.declare_entry("Y", &line(".entry Y")).unwrap();
        assert!(matches!(
            syms.declare_extern("Y"),
            Err(Error::ConflictingEntryAndExtern(_))
        ));
    }

    #[test]
    fn extern_not_unique() {
        let mut syms = SymbolTable::new();
        syms.declare_extern("X").unwrap();
        assert!(matches!(
            syms.declare_extern("X"),
            Err(Error::ExternNotUnique(_))
        ));
    }

    #[test]
    fn macro_name_collisions() {
        let mut syms = SymbolTable::new();
        assert!(matches!(
            syms.declare_macro("mov", String::new()),
            Err(Error::MacroNameIsCommand(_))
        ));
        syms.declare_macro("twice", "stop\n".to_string()).unwrap();
        assert!(matches!(
            syms.declare_macro("twice", String::new()),
            Err(Error::MacroAlreadyDefined(_))
        ));
        assert!(matches!(
            syms.declare_label("twice", 0),
            Err(Error::LabelIsMacroName(_))
        ));
        assert_eq!(syms.macro_body("twice"), Some("stop\n"));
    }

    #[test]
    fn section_layout_after_resolution() {
        let mut syms = SymbolTable::new();
        syms.declare_label("CODE", 2).unwrap();
        syms.mark_instruction("CODE");
        syms.declare_label("LIST", 0).unwrap();
        syms.mark_data("LIST", 3);
        syms.declare_label("LONE", 5).unwrap();

        let unresolved = syms.resolve_addresses(7);
        assert!(unresolved.is_empty());
        assert_eq!(syms.lookup("CODE"), Some(&SymKind::Instruction(102)));
        assert_eq!(syms.lookup("LIST"), Some(&SymKind::Data(110)));
        assert_eq!(syms.lookup("LONE"), Some(&SymKind::Label(105)));
    }

    #[test]
    fn entry_resolution() {
        let mut syms = SymbolTable::new();
        syms.declare_entry("LOOP", &line(".entry LOOP")).unwrap();
        syms.declare_entry("GONE", &line(".entry GONE")).unwrap();
        syms.declare_label("LOOP", 4).unwrap();
        syms.mark_instruction("LOOP");

        let unresolved = syms.resolve_addresses(6);
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].0, "GONE");
        let resolved: Vec<_> = syms.entries().collect();
        assert_eq!(resolved, vec![("LOOP", 104)]);
    }

    #[test]
    fn extern_usage_records() {
        let mut syms = SymbolTable::new();
        syms.declare_extern("PUTS").unwrap();
        syms.declare_extern("GETS").unwrap();
        syms.record_extern_use("GETS", 101);
        syms.record_extern_use("PUTS", 103);
        syms.record_extern_use("PUTS", 106);

        assert_eq!(syms.extern_use_count(), 3);
        let uses: Vec<_> = syms.extern_uses().collect();
        assert_eq!(
            uses,
            vec![("PUTS", &[103, 106][..]), ("GETS", &[101][..])]
        );
    }
}
