use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opcode pages, bits 15-12 of every instruction word. `JSR` shares 0x4 with
/// `JSRR` (bit 11 selects the PC-relative form) and `RET` shares 0xC with
/// `JMP` (base register fixed to R7), so the reverse lookup reports `JSRR`
/// and `JMP` for those pages.
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
    Display,
    Eq,
)]
#[repr(u8)]
pub enum Opcode {
    BR = 0x0,
    ADD = 0x1,
    LD = 0x2,
    ST = 0x3,
    JSRR = 0x4,
    AND = 0x5,
    LDR = 0x6,
    STR = 0x7,
    RTI = 0x8,
    NOT = 0x9,
    LDI = 0xA,
    STI = 0xB,
    JMP = 0xC,
    #[default]
    RES = 0xD,
    LEA = 0xE,
    TRAP = 0xF,
}

impl Opcode {
    /// Reverse lookup for the disassembler.
    pub fn of_word(word: u16) -> Opcode {
        Opcode::from((word >> 12) as u8)
    }
}

/// Every mnemonic the tokenizer recognizes in opcode position. The `BR`
/// spellings all live on opcode page 0x0 and the trap service aliases all
/// assemble to `TRAP`; `RES` names the reserved page and has no encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
pub enum Mnemonic {
    BR,
    BRn,
    BRz,
    BRp,
    BRnz,
    BRnp,
    BRzp,
    BRnzp,
    ADD,
    LD,
    ST,
    JSR,
    JSRR,
    AND,
    LDR,
    STR,
    RTI,
    NOT,
    LDI,
    STI,
    RET,
    JMP,
    RES,
    LEA,
    TRAP,
    GETC,
    OUT,
    PUTS,
    IN,
    PUTSP,
    HALT,
}

impl Mnemonic {
    /// Exact match, case-sensitive: `add` is a label, `ADD` is an opcode.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }
}

/// `BR` condition bits: bit 11 = n, bit 10 = z, bit 9 = p.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cond {
    pub n: bool,
    pub z: bool,
    pub p: bool,
}

impl Cond {
    /// Bare `BR` branches unconditionally.
    pub const ALWAYS: Cond = Cond {
        n: true,
        z: true,
        p: true,
    };

    pub const fn new(n: bool, z: bool, p: bool) -> Cond {
        Cond { n, z, p }
    }

    pub fn bits(self) -> u16 {
        ((self.n as u16) << 2) | ((self.z as u16) << 1) | (self.p as u16)
    }
}

impl std::fmt::Display for Cond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.n {
            write!(f, "n")?;
        }
        if self.z {
            write!(f, "z")?;
        }
        if self.p {
            write!(f, "p")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_is_case_sensitive() {
        assert_eq!(Mnemonic::parse("BRnz"), Ok(Mnemonic::BRnz));
        assert_eq!(Mnemonic::parse("HALT"), Ok(Mnemonic::HALT));
        assert!(Mnemonic::parse("halt").is_err());
        assert!(Mnemonic::parse("BRpn").is_err());
    }

    #[test]
    fn opcode_of_word() {
        assert_eq!(Opcode::of_word(0x1001), Opcode::ADD);
        assert_eq!(Opcode::of_word(0xF025), Opcode::TRAP);
        assert_eq!(Opcode::of_word(0x0FFF), Opcode::BR);
        assert_eq!(Opcode::of_word(0xC1C0), Opcode::JMP);
    }

    #[test]
    fn cond_bits() {
        assert_eq!(Cond::ALWAYS.bits(), 0b111);
        assert_eq!(Cond::new(true, false, false).bits(), 0b100);
        assert_eq!(Cond::new(false, true, true).bits(), 0b011);
    }
}
