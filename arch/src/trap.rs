use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Trap service routines. Each alias assembles to `TRAP` with the fixed
/// vector in the low byte of the word.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Trap {
    GETC = 0x20,
    OUT = 0x21,
    PUTS = 0x22,
    IN = 0x23,
    PUTSP = 0x24,
    HALT = 0x25,
}

#[test]
fn test() {
    assert_eq!(u8::from(Trap::HALT), 0x25);
    assert!(matches!(Trap::try_from(0x22), Ok(Trap::PUTS)));
    assert!(Trap::try_from(0x26).is_err());
}
