use arch::{
    inst::Inst,
    op::{Cond, Mnemonic},
    reg::Reg,
    trap::Trap,
};

use crate::{
    error::{Diag, Error},
    symtab::SymTab,
    token::{Line, Token},
};

// ----------------------------------------------------------------------------
// Statement

/// One non-empty source line: an optional label plus an optional body.
#[derive(Debug, Clone)]
pub struct Statement {
    pub line_no: usize,
    pub label: Option<String>,
    pub body: Option<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Orig(u16),
    Fill(i32),
    Stringz(String),
    Blkw(u16),
    End,
    Code(Code),
}

/// Parse every line in order, dropping blank and comment-only lines. The
/// walk stops after `.END`: trailing lines are discarded unseen, exactly as
/// the two passes never reach them.
pub fn parse(lines: &[Line]) -> Result<Vec<Statement>, Diag> {
    let mut stmts = vec![];
    for line in lines {
        let tokens = line.tokenize().map_err(|e| Diag::new(line.no(), e))?;
        if tokens.is_empty() {
            continue;
        }
        let stmt = Statement::parse(line.no(), &tokens).map_err(|e| Diag::new(line.no(), e))?;
        let end = matches!(stmt.body, Some(Stmt::End));
        stmts.push(stmt);
        if end {
            break;
        }
    }
    Ok(stmts)
}

impl Statement {
    fn parse(line_no: usize, tokens: &[Token]) -> Result<Statement, Error> {
        let (label, rest) = match tokens {
            [Token::Label(l), rest @ ..] => (Some(l.clone()), rest),
            rest => (None, rest),
        };
        let body = match rest {
            [] => None,
            [Token::Op(op), args @ ..] => Some(Stmt::Code(Code::parse(*op, args)?)),
            [Token::Dir(dir), args @ ..] => Some(Stmt::directive(dir, args)?),
            [Token::Label(l), ..] => return Err(Error::SecondLabel(l.clone())),
            [t, ..] => return Err(Error::ParseArgument(t.to_string(), "statement".to_string())),
        };
        Ok(Statement {
            line_no,
            label,
            body,
        })
    }
}

impl Stmt {
    fn directive(dir: &str, args: &[Token]) -> Result<Stmt, Error> {
        match dir {
            ".ORIG" => {
                let addr = const_arg(args, "origin address")?;
                u16::try_from(addr)
                    .map(Stmt::Orig)
                    .map_err(|_| Error::ParseArgument(addr.to_string(), "origin address".to_string()))
            }
            ".FILL" => {
                let value = const_arg(args, "fill value")?;
                // any 16-bit pattern, signed or unsigned spelling
                if (-0x8000..=0xFFFF).contains(&value) {
                    Ok(Stmt::Fill(value))
                } else {
                    Err(Error::ParseArgument(value.to_string(), "fill value".to_string()))
                }
            }
            ".BLKW" => {
                let count = const_arg(args, "block size")?;
                u16::try_from(count)
                    .map(Stmt::Blkw)
                    .map_err(|_| Error::ParseArgument(count.to_string(), "block size".to_string()))
            }
            ".STRINGZ" => match args {
                [Token::Str(s)] => Ok(Stmt::Stringz(s.clone())),
                [t, ..] => Err(Error::ParseArgument(t.to_string(), "quoted string".to_string())),
                [] => Err(Error::MissingArgument),
            },
            ".END" => match args {
                [] => Ok(Stmt::End),
                [t, ..] => Err(Error::ParseArgument(t.to_string(), "end of line".to_string())),
            },
            _ => Err(Error::UnknownDirective(dir.to_string())),
        }
    }
}

fn const_arg(args: &[Token], what: &str) -> Result<i32, Error> {
    match args {
        [] => Err(Error::MissingArgument),
        [Token::Const(v)] => Ok(*v),
        [t, ..] => Err(Error::ParseArgument(t.to_string(), what.to_string())),
    }
}

// ----------------------------------------------------------------------------
// Instruction

/// Third operand of `ADD`/`AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Src {
    Reg(Reg),
    Imm(i32),
}

/// An instruction with its operand shape, before symbol resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    Br(Cond, String),
    Add(Reg, Reg, Src),
    And(Reg, Reg, Src),
    Not(Reg, Reg),
    Ld(Reg, String),
    Ldi(Reg, String),
    Lea(Reg, String),
    St(Reg, String),
    Sti(Reg, String),
    Ldr(Reg, Reg, i32),
    Str(Reg, Reg, i32),
    Jsr(String),
    Jsrr(Reg),
    Jmp(Reg),
    Ret,
    Rti,
    Res,
    Trap(i32),
    TrapVect(Trap),
}

impl Code {
    pub fn parse(op: Mnemonic, args: &[Token]) -> Result<Code, Error> {
        use Mnemonic::*;

        // Get argument by index and require its token shape.
        // Example: arg!(0, Reg) -> Reg
        macro_rules! arg {
            ($index:expr, Reg) => {
                match args.get($index) {
                    Some(Token::Reg(r)) => *r,
                    Some(t) => {
                        return Err(Error::ParseArgument(t.to_string(), "register".to_string()))
                    }
                    None => return Err(Error::MissingArgument),
                }
            };
            ($index:expr, Label) => {
                match args.get($index) {
                    Some(Token::Label(l)) => l.clone(),
                    Some(t) => return Err(Error::ParseArgument(t.to_string(), "label".to_string())),
                    None => return Err(Error::MissingArgument),
                }
            };
            ($index:expr, Const) => {
                match args.get($index) {
                    Some(Token::Const(v)) => *v,
                    Some(t) => {
                        return Err(Error::ParseArgument(t.to_string(), "constant".to_string()))
                    }
                    None => return Err(Error::MissingArgument),
                }
            };
            ($index:expr, Src) => {
                match args.get($index) {
                    Some(Token::Reg(r)) => Src::Reg(*r),
                    Some(Token::Const(v)) => Src::Imm(*v),
                    Some(t) => {
                        return Err(Error::ParseArgument(
                            t.to_string(),
                            "register or constant".to_string(),
                        ))
                    }
                    None => return Err(Error::MissingArgument),
                }
            };
        }

        // Check the operand count, then build.
        macro_rules! code {
            ($count:expr, $code:expr) => {{
                if args.len() != $count {
                    return Err(Error::OperandCount(op.to_string(), $count, args.len()));
                }
                Ok($code)
            }};
        }

        match op {
            BR | BRnzp => code!(1, Code::Br(Cond::ALWAYS, arg!(0, Label))),
            BRn => code!(1, Code::Br(Cond::new(true, false, false), arg!(0, Label))),
            BRz => code!(1, Code::Br(Cond::new(false, true, false), arg!(0, Label))),
            BRp => code!(1, Code::Br(Cond::new(false, false, true), arg!(0, Label))),
            BRnz => code!(1, Code::Br(Cond::new(true, true, false), arg!(0, Label))),
            BRnp => code!(1, Code::Br(Cond::new(true, false, true), arg!(0, Label))),
            BRzp => code!(1, Code::Br(Cond::new(false, true, true), arg!(0, Label))),
            ADD => code!(3, Code::Add(arg!(0, Reg), arg!(1, Reg), arg!(2, Src))),
            AND => code!(3, Code::And(arg!(0, Reg), arg!(1, Reg), arg!(2, Src))),
            NOT => code!(2, Code::Not(arg!(0, Reg), arg!(1, Reg))),
            LD => code!(2, Code::Ld(arg!(0, Reg), arg!(1, Label))),
            LDI => code!(2, Code::Ldi(arg!(0, Reg), arg!(1, Label))),
            LEA => code!(2, Code::Lea(arg!(0, Reg), arg!(1, Label))),
            ST => code!(2, Code::St(arg!(0, Reg), arg!(1, Label))),
            STI => code!(2, Code::Sti(arg!(0, Reg), arg!(1, Label))),
            LDR => code!(3, Code::Ldr(arg!(0, Reg), arg!(1, Reg), arg!(2, Const))),
            STR => code!(3, Code::Str(arg!(0, Reg), arg!(1, Reg), arg!(2, Const))),
            JSR => code!(1, Code::Jsr(arg!(0, Label))),
            JSRR => code!(1, Code::Jsrr(arg!(0, Reg))),
            JMP => code!(1, Code::Jmp(arg!(0, Reg))),
            RET => code!(0, Code::Ret),
            RTI => code!(0, Code::Rti),
            RES => code!(0, Code::Res),
            TRAP => code!(1, Code::Trap(arg!(0, Const))),
            GETC => code!(0, Code::TrapVect(Trap::GETC)),
            OUT => code!(0, Code::TrapVect(Trap::OUT)),
            PUTS => code!(0, Code::TrapVect(Trap::PUTS)),
            IN => code!(0, Code::TrapVect(Trap::IN)),
            PUTSP => code!(0, Code::TrapVect(Trap::PUTSP)),
            HALT => code!(0, Code::TrapVect(Trap::HALT)),
        }
    }
}

// ----------------------------------------------------------------------------
// Resolution

impl Code {
    /// Resolve labels and immediates into an encodable instruction. `lc` is
    /// the instruction's own address: PC-relative 9/11-bit offsets are
    /// computed against it and masked without a range check, while imm5,
    /// offset6 and trap vectors are range-checked.
    pub fn resolve(&self, symtab: &SymTab, lc: u16) -> Result<Inst, Error> {
        Ok(match self {
            Code::Br(cond, target) => Inst::Br(*cond, offset(symtab, target, lc, 0x1FF)?),
            Code::Add(dr, sr1, Src::Reg(sr2)) => Inst::Add(*dr, *sr1, *sr2),
            Code::Add(dr, sr1, Src::Imm(v)) => Inst::AddI(*dr, *sr1, imm5(*v)?),
            Code::And(dr, sr1, Src::Reg(sr2)) => Inst::And(*dr, *sr1, *sr2),
            Code::And(dr, sr1, Src::Imm(v)) => Inst::AndI(*dr, *sr1, imm5(*v)?),
            Code::Not(dr, sr) => Inst::Not(*dr, *sr),
            Code::Ld(dr, t) => Inst::Ld(*dr, offset(symtab, t, lc, 0x1FF)?),
            Code::Ldi(dr, t) => Inst::Ldi(*dr, offset(symtab, t, lc, 0x1FF)?),
            Code::Lea(dr, t) => Inst::Lea(*dr, offset(symtab, t, lc, 0x1FF)?),
            Code::St(sr, t) => Inst::St(*sr, offset(symtab, t, lc, 0x1FF)?),
            Code::Sti(sr, t) => Inst::Sti(*sr, offset(symtab, t, lc, 0x1FF)?),
            Code::Ldr(dr, base, v) => Inst::Ldr(*dr, *base, off6(*v)?),
            Code::Str(sr, base, v) => Inst::Str(*sr, *base, off6(*v)?),
            Code::Jsr(t) => Inst::Jsr(offset(symtab, t, lc, 0x7FF)?),
            Code::Jsrr(base) => Inst::Jsrr(*base),
            Code::Jmp(base) => Inst::Jmp(*base),
            Code::Ret => Inst::Ret,
            Code::Rti => Inst::Rti,
            Code::Res => return Err(Error::Unencodable("RES".to_string())),
            Code::Trap(v) => Inst::Trap(trap8(*v)?),
            Code::TrapVect(t) => Inst::Trap((*t).into()),
        })
    }
}

/// `target - own address`, truncated to the field width. Out-of-range
/// offsets wrap silently here, unlike the checked immediates below.
fn offset(symtab: &SymTab, target: &str, lc: u16, mask: u16) -> Result<u16, Error> {
    let addr = symtab
        .get(target)
        .ok_or_else(|| Error::UndefinedLabel(target.to_string()))?;
    Ok((((addr as i32) - (lc as i32)) as u16) & mask)
}

fn imm5(v: i32) -> Result<i8, Error> {
    if (-16..=15).contains(&v) {
        Ok(v as i8)
    } else {
        Err(Error::ImmOutOfRange(v, 5))
    }
}

fn off6(v: i32) -> Result<i8, Error> {
    if (-32..=31).contains(&v) {
        Ok(v as i8)
    } else {
        Err(Error::ImmOutOfRange(v, 6))
    }
}

fn trap8(v: i32) -> Result<u8, Error> {
    if (0..=255).contains(&v) {
        Ok(v as u8)
    } else {
        Err(Error::ImmOutOfRange(v, 8))
    }
}
