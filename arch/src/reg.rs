use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

pub const NUM_REGISTERS: u8 = 8;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    #[default]
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// Register names are exactly `r0` through `r7`, lowercase, nothing
    /// trailing. `r07` and `r8` are rejected.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn index(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r0"), Ok(Reg::R0));
    assert_eq!(Reg::parse("r7"), Ok(Reg::R7));
    assert_eq!(Reg::R3.index(), 3);
    assert_eq!(Reg::R5.to_string(), "r5");
    assert!(Reg::parse("r8").is_err());
    assert!(Reg::parse("r07").is_err());
    assert!(Reg::parse("R1").is_err());
    assert!(Reg::parse("hoge").is_err());
}
