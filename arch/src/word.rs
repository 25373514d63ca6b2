use num_enum::IntoPrimitive;

use crate::mode::Mode;

// ----------------------------------------------------------------------------
// A/R/E tag

/// Linkage tag carried in the low three bits of most words. Exactly one bit
/// is ever set; raw data cells carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum Are {
    Absolute = 0b100,
    Relocatable = 0b010,
    External = 0b001,
}

// ----------------------------------------------------------------------------
// Word

/// One 24-bit memory word.
///
/// Instruction words pack `opcode[23:18] src_mode[17:16] src_reg[15:13]
/// dest_mode[12:11] dest_reg[10:8] funct[7:3] A[2] R[1] E[0]`. Value words
/// carry a 21-bit two's complement payload above the tag bits. Raw words
/// are a plain 24-bit integer with no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word(u32);

pub const WORD_MASK: u32 = 0xFF_FFFF;
const PAYLOAD_MASK: u32 = 0x1F_FFFF;

impl Word {
    pub fn instruction(
        opcode: u8,
        src_mode: Mode,
        src_reg: u8,
        dest_mode: Mode,
        dest_reg: u8,
        funct: u8,
        are: Are,
    ) -> Self {
        Word(
            (((opcode & 0x3F) as u32) << 18)
                | ((u8::from(src_mode) as u32) << 16)
                | (((src_reg & 0x7) as u32) << 13)
                | ((u8::from(dest_mode) as u32) << 11)
                | (((dest_reg & 0x7) as u32) << 8)
                | (((funct & 0x1F) as u32) << 3)
                | u8::from(are) as u32,
        )
    }

    /// Value word: 21-bit payload plus tag. Out-of-range values are masked,
    /// never rejected.
    pub fn value(value: i32, are: Are) -> Self {
        Word((((value as u32) & PAYLOAD_MASK) << 3) | u8::from(are) as u32)
    }

    /// Raw data cell: the full 24 bits, no tag.
    pub fn raw(value: i32) -> Self {
        Word((value as u32) & WORD_MASK)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn opcode(self) -> u8 {
        ((self.0 >> 18) & 0x3F) as u8
    }
    pub fn src_mode(self) -> u8 {
        ((self.0 >> 16) & 0x3) as u8
    }
    pub fn src_reg(self) -> u8 {
        ((self.0 >> 13) & 0x7) as u8
    }
    pub fn dest_mode(self) -> u8 {
        ((self.0 >> 11) & 0x3) as u8
    }
    pub fn dest_reg(self) -> u8 {
        ((self.0 >> 8) & 0x7) as u8
    }
    pub fn funct(self) -> u8 {
        ((self.0 >> 3) & 0x1F) as u8
    }
    pub fn are(self) -> u8 {
        (self.0 & 0x7) as u8
    }

    /// Sign-extended 21-bit payload of a value word.
    pub fn payload(self) -> i32 {
        let v = (self.0 >> 3) & PAYLOAD_MASK;
        ((v << 11) as i32) >> 11
    }

    /// Sign-extended content of a raw data cell.
    pub fn raw_value(self) -> i32 {
        ((self.0 << 8) as i32) >> 8
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
fn modes() -> [Mode; 4] {
    [Mode::Immediate, Mode::Direct, Mode::Relative, Mode::Register]
}

#[test]
fn test_instruction_fields_all() {
    for opcode in 0..=0x3F {
        for src_mode in modes() {
            for src_reg in 0..8 {
                for dest_mode in modes() {
                    for dest_reg in 0..8 {
                        for funct in 0..=0x1F {
                            let w = Word::instruction(
                                opcode,
                                src_mode,
                                src_reg,
                                dest_mode,
                                dest_reg,
                                funct,
                                Are::Absolute,
                            );
                            assert_eq!(w.opcode(), opcode);
                            assert_eq!(w.src_mode(), u8::from(src_mode));
                            assert_eq!(w.src_reg(), src_reg);
                            assert_eq!(w.dest_mode(), u8::from(dest_mode));
                            assert_eq!(w.dest_reg(), dest_reg);
                            assert_eq!(w.funct(), funct);
                            assert_eq!(w.are(), 0b100);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_value_payload_roundtrip() {
    for v in [0, 1, -1, -3, 300, -300, 0xF_FFFF, -0x10_0000] {
        let w = Word::value(v, Are::Relocatable);
        assert_eq!(w.payload(), v, "word: {:06x}", w.bits());
        assert_eq!(w.are(), 0b010);
    }
}

#[test]
fn test_value_masks_silently() {
    // 2^21 has no bits inside the payload field.
    assert_eq!(Word::value(1 << 21, Are::Absolute).payload(), 0);
    assert_eq!(Word::value((1 << 21) | 5, Are::Absolute).payload(), 5);
}

#[test]
fn test_raw_roundtrip() {
    for v in [0, 1, -1, -3, 1000, -1000, 0x7F_FFFF, -0x80_0000] {
        let w = Word::raw(v);
        assert_eq!(w.raw_value(), v, "word: {:06x}", w.bits());
    }
    assert_eq!(Word::raw(-3).bits(), 0xFF_FFFD);
}

macro_rules! test_word {
    ($name:ident, $word:expr, $bits:expr) => {
        #[test]
        fn $name() {
            let w: Word = $word;
            assert_eq!(w.bits(), $bits, "got: {:06x}", w.bits());
        }
    };
}

test_word!(
    enc_mov_r0_r1,
    Word::instruction(0, Mode::Register, 0, Mode::Register, 1, 0, Are::Absolute),
    0x031904
);
test_word!(
    enc_stop,
    Word::instruction(15, Mode::Immediate, 0, Mode::Immediate, 0, 0, Are::Absolute),
    0x3C0004
);
test_word!(enc_imm_5, Word::value(5, Are::Absolute), 0x00002C);
test_word!(enc_ext_ref, Word::value(0, Are::External), 0x000001);
test_word!(enc_addr_104, Word::value(104, Are::Relocatable), 0x000342);
test_word!(enc_data_neg3, Word::raw(-3), 0xFFFFFD);
