use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
    Eq,
)]
#[repr(u8)]
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
    /// Exact match only: register names are upper-case in the source dialect,
    /// so `r0` is an ordinary label.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }
}

impl Into<u16> for Reg {
    fn into(self) -> u16 {
        self as u16
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("R6"), Ok(Reg::R6));
    assert!(Reg::parse("r6").is_err());
    assert!(Reg::parse("R8").is_err());
}
