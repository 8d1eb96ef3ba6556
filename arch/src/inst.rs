use crate::{
    op::{Cond, Opcode},
    reg::Reg,
};

use color_print::cformat;

/// A fully-resolved instruction: operands are registers, field-width
/// immediates, and already-computed PC-relative offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Br(Cond, u16),
    Add(Reg, Reg, Reg),
    AddI(Reg, Reg, i8),
    Ld(Reg, u16),
    St(Reg, u16),
    Jsr(u16),
    Jsrr(Reg),
    And(Reg, Reg, Reg),
    AndI(Reg, Reg, i8),
    Ldr(Reg, Reg, i8),
    Str(Reg, Reg, i8),
    Rti,
    Not(Reg, Reg),
    Ldi(Reg, u16),
    Sti(Reg, u16),
    Ret,
    Jmp(Reg),
    Lea(Reg, u16),
    Trap(u8),
}

// ----------------------------------------------------------------------------
// Field packing

fn page(op: Opcode) -> u16 {
    (u8::from(op) as u16) << 12
}

fn imm5(v: i8) -> u16 {
    (v as i16 as u16) & 0x1F
}

fn off6(v: i8) -> u16 {
    (v as i16 as u16) & 0x3F
}

impl Inst {
    /// Pack into the 16-bit word. Fields are masked, never range-checked:
    /// checked immediates are validated before an `Inst` is constructed.
    pub fn encode(&self) -> u16 {
        match *self {
            Inst::Br(cond, off) => page(Opcode::BR) | (cond.bits() << 9) | (off & 0x1FF),
            Inst::Add(dr, sr1, sr2) => {
                page(Opcode::ADD) | ((dr as u16) << 9) | ((sr1 as u16) << 6) | (sr2 as u16)
            }
            Inst::AddI(dr, sr1, imm) => {
                page(Opcode::ADD) | ((dr as u16) << 9) | ((sr1 as u16) << 6) | (1 << 5) | imm5(imm)
            }
            Inst::Ld(dr, off) => page(Opcode::LD) | ((dr as u16) << 9) | (off & 0x1FF),
            Inst::St(sr, off) => page(Opcode::ST) | ((sr as u16) << 9) | (off & 0x1FF),
            Inst::Jsr(off) => page(Opcode::JSRR) | (1 << 11) | (off & 0x7FF),
            Inst::Jsrr(base) => page(Opcode::JSRR) | ((base as u16) << 6),
            Inst::And(dr, sr1, sr2) => {
                page(Opcode::AND) | ((dr as u16) << 9) | ((sr1 as u16) << 6) | (sr2 as u16)
            }
            Inst::AndI(dr, sr1, imm) => {
                page(Opcode::AND) | ((dr as u16) << 9) | ((sr1 as u16) << 6) | (1 << 5) | imm5(imm)
            }
            Inst::Ldr(dr, base, off) => {
                page(Opcode::LDR) | ((dr as u16) << 9) | ((base as u16) << 6) | off6(off)
            }
            Inst::Str(sr, base, off) => {
                page(Opcode::STR) | ((sr as u16) << 9) | ((base as u16) << 6) | off6(off)
            }
            Inst::Rti => page(Opcode::RTI),
            // Low six bits are all-ones filler, required by the ISA.
            Inst::Not(dr, sr) => {
                page(Opcode::NOT) | ((dr as u16) << 9) | ((sr as u16) << 6) | 0x3F
            }
            Inst::Ldi(dr, off) => page(Opcode::LDI) | ((dr as u16) << 9) | (off & 0x1FF),
            Inst::Sti(sr, off) => page(Opcode::STI) | ((sr as u16) << 9) | (off & 0x1FF),
            Inst::Ret => page(Opcode::JMP) | ((Reg::R7 as u16) << 6),
            Inst::Jmp(base) => page(Opcode::JMP) | ((base as u16) << 6),
            Inst::Lea(dr, off) => page(Opcode::LEA) | ((dr as u16) << 9) | (off & 0x1FF),
            Inst::Trap(vect) => page(Opcode::TRAP) | (vect as u16),
        }
    }
}

// ----------------------------------------------------------------------------
// Listing format

impl Inst {
    pub fn cformat(&self) -> String {
        macro_rules! f {
            ($name:expr, $a:expr, $b:expr, $c:expr) => {
                cformat!("<red>{:<6}</><blue>{:<3} {:<3} {:<6}</>", $name, $a, $b, $c)
            };
        }

        match self {
            Inst::Br(cond, off) => f!(
                format!("BR{}", cond),
                cformat!("<yellow>0x{:0>3X}</>", off),
                "",
                ""
            ),
            Inst::Add(dr, sr1, sr2) => f!("ADD", dr, sr1, sr2),
            Inst::AddI(dr, sr1, imm) => f!("ADD", dr, sr1, format!("#{}", imm)),
            Inst::Ld(dr, off) => f!("LD", dr, cformat!("<yellow>0x{:0>3X}</>", off), ""),
            Inst::St(sr, off) => f!("ST", sr, cformat!("<yellow>0x{:0>3X}</>", off), ""),
            Inst::Jsr(off) => f!("JSR", cformat!("<yellow>0x{:0>3X}</>", off), "", ""),
            Inst::Jsrr(base) => f!("JSRR", base, "", ""),
            Inst::And(dr, sr1, sr2) => f!("AND", dr, sr1, sr2),
            Inst::AndI(dr, sr1, imm) => f!("AND", dr, sr1, format!("#{}", imm)),
            Inst::Ldr(dr, base, off) => f!("LDR", dr, base, format!("#{}", off)),
            Inst::Str(sr, base, off) => f!("STR", sr, base, format!("#{}", off)),
            Inst::Rti => f!("RTI", "", "", ""),
            Inst::Not(dr, sr) => f!("NOT", dr, sr, ""),
            Inst::Ldi(dr, off) => f!("LDI", dr, cformat!("<yellow>0x{:0>3X}</>", off), ""),
            Inst::Sti(sr, off) => f!("STI", sr, cformat!("<yellow>0x{:0>3X}</>", off), ""),
            Inst::Ret => f!("RET", "", "", ""),
            Inst::Jmp(base) => f!("JMP", base, "", ""),
            Inst::Lea(dr, off) => f!("LEA", dr, cformat!("<yellow>0x{:0>3X}</>", off), ""),
            Inst::Trap(vect) => f!("TRAP", cformat!("<yellow>0x{:0>2X}</>", vect), "", ""),
        }
    }
}
