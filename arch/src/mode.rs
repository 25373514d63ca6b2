use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Operand addressing modes, in their two-bit field encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Mode {
    Immediate = 0,
    Direct = 1,
    Relative = 2,
    Register = 3,
}

impl Mode {
    /// Classify an operand by its leading characters. `r` counts as a
    /// register prefix only when a digit follows, so labels like `result`
    /// still read as direct. `None` means the text cannot start any operand.
    pub fn classify(arg: &str) -> Option<Mode> {
        let mut chars = arg.chars();
        match chars.next() {
            Some('#') => Some(Mode::Immediate),
            Some('&') => Some(Mode::Relative),
            Some('r') if matches!(chars.next(), Some(c) if c.is_ascii_digit()) => {
                Some(Mode::Register)
            }
            Some(c) if c.is_ascii_alphabetic() => Some(Mode::Direct),
            _ => None,
        }
    }
}

#[test]
fn test_classify() {
    assert_eq!(Mode::classify("#5"), Some(Mode::Immediate));
    assert_eq!(Mode::classify("#-3"), Some(Mode::Immediate));
    assert_eq!(Mode::classify("&LOOP"), Some(Mode::Relative));
    assert_eq!(Mode::classify("r0"), Some(Mode::Register));
    assert_eq!(Mode::classify("r9"), Some(Mode::Register));
    assert_eq!(Mode::classify("result"), Some(Mode::Direct));
    assert_eq!(Mode::classify("r"), Some(Mode::Direct));
    assert_eq!(Mode::classify("MAIN"), Some(Mode::Direct));
    assert_eq!(Mode::classify("5"), None);
    assert_eq!(Mode::classify(""), None);
}

#[test]
fn test_field_bits() {
    for m in 0..4u8 {
        assert_eq!(u8::from(Mode::try_from(m).unwrap()), m);
    }
}
