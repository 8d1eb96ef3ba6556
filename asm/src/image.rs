use crate::{
    error::{Diag, Error},
    parser::{Statement, Stmt},
    symtab::SymTab,
};

/// Pass 2: encode every located statement into the image words. The first
/// word is the origin address; the rest is the program in source order with
/// no holes. Nothing is emitted for a run that fails.
pub fn emit(symtab: &SymTab, stmts: &[(Statement, u16)]) -> Result<Vec<u16>, Diag> {
    let mut words = vec![];

    let mut iter = stmts.iter();
    match iter.next() {
        Some((
            Statement {
                body: Some(Stmt::Orig(origin)),
                ..
            },
            _,
        )) => words.push(*origin),
        _ => return Err(Diag::new(1, Error::MisplacedOrig)),
    }

    for (stmt, lc) in iter {
        match &stmt.body {
            None => {}
            Some(Stmt::Code(code)) => {
                let inst = code
                    .resolve(symtab, *lc)
                    .map_err(|e| Diag::new(stmt.line_no, e))?;
                words.push(inst.encode());
            }
            Some(Stmt::Blkw(n)) => words.resize(words.len() + *n as usize, 0),
            // one word per byte, low byte holds the character, then the
            // zero terminator
            Some(Stmt::Stringz(s)) => {
                words.extend(s.bytes().map(u16::from));
                words.push(0);
            }
            Some(Stmt::Fill(v)) => words.push(*v as u16),
            Some(Stmt::End) => break,
            Some(Stmt::Orig(_)) => return Err(Diag::new(stmt.line_no, Error::MisplacedOrig)),
        }
    }

    Ok(words)
}

/// Serialize most-significant-byte-first, the architecture's byte order,
/// including the leading origin word.
pub fn to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser, symtab, token::Line};

    fn words(source: &str) -> Vec<u16> {
        let lines = Line::split(source);
        let layout = symtab::locate(parser::parse(&lines).unwrap()).unwrap();
        emit(&layout.symtab, &layout.stmts).unwrap()
    }

    #[test]
    fn single_add() {
        assert_eq!(
            words(".ORIG x3000\nADD R0,R0,R1\n.END\n"),
            vec![0x3000, 0x1001]
        );
    }

    #[test]
    fn backward_branch() {
        assert_eq!(
            words(".ORIG x3000\nLOOP ADD R0,R0,R1\nBR LOOP\n.END\n"),
            vec![0x3000, 0x1001, 0x0FFF]
        );
    }

    #[test]
    fn stringz_words() {
        assert_eq!(
            words(".ORIG x3000\nS .STRINGZ \"hi\"\n.END\n"),
            vec![0x3000, 0x68, 0x69, 0x0000]
        );
    }

    #[test]
    fn blkw_emits_zeros() {
        assert_eq!(
            words(".ORIG x3000\n.BLKW #3\nHALT\n.END\n"),
            vec![0x3000, 0, 0, 0, 0xF025]
        );
    }

    #[test]
    fn fill_is_emitted_unchanged() {
        assert_eq!(
            words(".ORIG x3000\n.FILL #-1\n.FILL xBEEF\n.FILL 10\n.END\n"),
            vec![0x3000, 0xFFFF, 0xBEEF, 0x000A]
        );
    }

    #[test]
    fn missing_end_is_tolerated() {
        assert_eq!(
            words(".ORIG x3000\nADD R0,R0,R1\n"),
            vec![0x3000, 0x1001]
        );
    }

    #[test]
    fn big_endian_serialization() {
        assert_eq!(
            to_bytes(&[0x3000, 0x1234, 0x00FF]),
            vec![0x30, 0x00, 0x12, 0x34, 0x00, 0xFF]
        );
    }
}
