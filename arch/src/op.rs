use bimap::BiMap;
use once_cell::sync::Lazy;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::mode::Mode;

// ----------------------------------------------------------------------------
// Mnemonic

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Jsr,
    Red,
    Prn,
    Rts,
    Stop,
}

impl Mnemonic {
    /// Command names are case sensitive: `mov` is a command, `MOV` is a label.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined command: {s}")),
        }
    }

    pub fn opcode(self) -> u8 {
        use Mnemonic::*;
        match self {
            Mov => 0,
            Cmp => 1,
            Add | Sub => 2,
            Lea => 4,
            Clr | Not | Inc | Dec => 5,
            Jmp | Bne | Jsr => 9,
            Red => 12,
            Prn => 13,
            Rts => 14,
            Stop => 15,
        }
    }

    pub fn funct(self) -> u8 {
        use Mnemonic::*;
        match self {
            Add | Clr | Jmp => 1,
            Sub | Not | Bne => 2,
            Inc | Jsr => 3,
            Dec => 4,
            _ => 0,
        }
    }

    pub fn operands(self) -> usize {
        use Mnemonic::*;
        match self {
            Rts | Stop => 0,
            Mov | Cmp | Add | Sub | Lea => 2,
            _ => 1,
        }
    }

    pub fn src_modes(self) -> ModeSet {
        use Mnemonic::*;
        match self {
            Mov | Cmp | Add | Sub => IMM_DIR_REG,
            Lea => DIR_ONLY,
            _ => ModeSet::NONE,
        }
    }

    /// One-operand commands take their single operand in the destination
    /// slot, so this is the mask that applies to it.
    pub fn dest_modes(self) -> ModeSet {
        use Mnemonic::*;
        match self {
            Cmp | Prn => IMM_DIR_REG,
            Jmp | Bne | Jsr => DIR_REL,
            Rts | Stop => ModeSet::NONE,
            _ => DIR_REG,
        }
    }
}

// ----------------------------------------------------------------------------
// Addressing legality

/// Legal addressing modes for one operand slot, indexed by mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSet([bool; 4]);

impl ModeSet {
    pub const NONE: ModeSet = ModeSet([false; 4]);

    pub fn allows(self, mode: Mode) -> bool {
        self.0[u8::from(mode) as usize]
    }
}

// [immediate, direct, relative, register]
const IMM_DIR_REG: ModeSet = ModeSet([true, true, false, true]);
const DIR_REG: ModeSet = ModeSet([false, true, false, true]);
const DIR_ONLY: ModeSet = ModeSet([false, true, false, false]);
const DIR_REL: ModeSet = ModeSet([false, true, true, false]);

// ----------------------------------------------------------------------------
// (opcode, funct) lookup

static CODES: Lazy<BiMap<(u8, u8), Mnemonic>> = Lazy::new(|| {
    let mut map = BiMap::new();
    for op in Mnemonic::iter() {
        map.insert((op.opcode(), op.funct()), op);
    }
    map
});

impl Mnemonic {
    /// Reverse lookup for decoded words.
    pub fn from_codes(opcode: u8, funct: u8) -> Option<Mnemonic> {
        CODES.get_by_left(&(opcode, funct)).copied()
    }
}

// ----------------------------------------------------------------------------

#[test]
fn test_parse() {
    assert_eq!(Mnemonic::parse("mov"), Ok(Mnemonic::Mov));
    assert_eq!(Mnemonic::parse("stop"), Ok(Mnemonic::Stop));
    assert!(Mnemonic::parse("MOV").is_err());
    assert!(Mnemonic::parse("hoge").is_err());
}

#[test]
fn test_codes_bijective() {
    for op in Mnemonic::iter() {
        assert_eq!(Mnemonic::from_codes(op.opcode(), op.funct()), Some(op));
    }
    assert_eq!(Mnemonic::from_codes(9, 2), Some(Mnemonic::Bne));
    assert_eq!(Mnemonic::from_codes(3, 0), None);
}

#[test]
fn test_masks() {
    use Mnemonic::*;
    assert!(Mov.src_modes().allows(Mode::Immediate));
    assert!(!Mov.dest_modes().allows(Mode::Immediate));
    assert!(Cmp.dest_modes().allows(Mode::Immediate));
    assert!(Lea.src_modes().allows(Mode::Direct));
    assert!(!Lea.src_modes().allows(Mode::Register));
    assert!(Jmp.dest_modes().allows(Mode::Relative));
    assert!(!Jmp.dest_modes().allows(Mode::Register));
    assert!(Prn.dest_modes().allows(Mode::Immediate));
    assert!(!Red.dest_modes().allows(Mode::Immediate));
    assert_eq!(Rts.operands(), 0);
    assert_eq!(Red.operands(), 1);
    assert_eq!(Lea.operands(), 2);
}
