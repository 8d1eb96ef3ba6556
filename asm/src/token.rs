use arch::{op::Mnemonic, reg::Reg};

use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

/// One raw source line with its comment split off.
#[derive(Debug, Clone)]
pub struct Line {
    pub idx: usize,
    pub raw: String,
    code: String,
    pub comment: Option<String>,
}

impl Line {
    pub fn new(idx: usize, raw: &str) -> Self {
        let (code, comment) = match raw.split_once(';') {
            Some((code, comment)) => (code.to_string(), Some(comment.to_string())),
            None => (raw.to_string(), None),
        };
        Self {
            idx,
            raw: raw.to_string(),
            code,
            comment,
        }
    }

    pub fn split(source: &str) -> Vec<Line> {
        source
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line::new(idx, raw))
            .collect()
    }

    /// 1-based line number for diagnostics.
    pub fn no(&self) -> usize {
        self.idx + 1
    }
}

// ----------------------------------------------------------------------------
// Token

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Label(String),
    Op(Mnemonic),
    Dir(String),
    Reg(Reg),
    Const(i32),
    Str(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Label(s) => write!(f, "{s}"),
            Token::Op(m) => write!(f, "{m}"),
            Token::Dir(d) => write!(f, "{d}"),
            Token::Reg(r) => write!(f, "{r}"),
            Token::Const(v) => write!(f, "#{v}"),
            Token::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

impl Line {
    /// Tokenize one line; empty for blank and comment-only lines. Leading
    /// words that are neither mnemonics nor directives are labels, and the
    /// rest of the line is retokenized after each one (a flat loop, so label
    /// chains cannot exhaust the call stack).
    pub fn tokenize(&self) -> Result<Vec<Token>, Error> {
        let mut tokens = vec![];
        let mut rest = self.code.trim();
        loop {
            if rest.is_empty() {
                return Ok(tokens);
            }
            let (word, tail) = match rest.split_once(char::is_whitespace) {
                Some((word, tail)) => (word, tail.trim()),
                None => (rest, ""),
            };
            if let Ok(op) = Mnemonic::parse(word) {
                tokens.push(Token::Op(op));
                tokens.extend(op_args(tail)?);
                return Ok(tokens);
            }
            if word.starts_with('.') {
                tokens.push(Token::Dir(word.to_uppercase()));
                tokens.extend(dir_arg(tail)?);
                return Ok(tokens);
            }
            tokens.push(Token::Label(word.to_string()));
            rest = tail;
        }
    }
}

// ----------------------------------------------------------------------------
// Operands

/// Comma-separated operand list after a mnemonic.
fn op_args(s: &str) -> Result<Vec<Token>, Error> {
    let mut args = vec![];
    for arg in s.split(',') {
        let arg = arg.trim();
        if arg.is_empty() {
            continue;
        }
        args.push(operand(arg)?);
    }
    Ok(args)
}

fn operand(arg: &str) -> Result<Token, Error> {
    if let Ok(reg) = Reg::parse(arg) {
        return Ok(Token::Reg(reg));
    }
    match constant(arg) {
        Some(c) => Ok(Token::Const(c?)),
        None => Ok(Token::Label(arg.to_string())),
    }
}

/// Single argument after a directive. Double quotes translate `\n` escapes
/// and are stripped; single quotes are stripped without escape translation.
fn dir_arg(s: &str) -> Result<Vec<Token>, Error> {
    let arg = s.trim();
    if arg.is_empty() {
        return Ok(vec![]);
    }
    if arg.starts_with('"') {
        return Ok(vec![Token::Str(arg.replace("\\n", "\n").replace('"', ""))]);
    }
    if arg.starts_with('\'') {
        return Ok(vec![Token::Str(arg.replace('\'', ""))]);
    }
    let tok = match constant(arg) {
        Some(c) => Token::Const(c?),
        None => Token::Const(arg.parse::<i32>().map_err(|_| {
            Error::ParseArgument(arg.to_string(), "constant".to_string())
        })?),
    };
    Ok(vec![tok])
}

/// `#n` signed decimal, `xHHHH` hex, `bBBBB` binary. `None` when the argument
/// carries no numeric prefix. A prefixed argument that fails to parse is an
/// error, never a label, so label references cannot start with `#`, `x`, `b`.
fn constant(arg: &str) -> Option<Result<i32, Error>> {
    let err = || Error::ParseArgument(arg.to_string(), "constant".to_string());
    if let Some(num) = arg.strip_prefix('#') {
        Some(num.parse::<i32>().map_err(|_| err()))
    } else if let Some(num) = arg.strip_prefix('x') {
        Some(radix(num, 16).ok_or_else(err))
    } else if let Some(num) = arg.strip_prefix('b') {
        Some(radix(num, 2).ok_or_else(err))
    } else {
        None
    }
}

fn radix(num: &str, radix: u32) -> Option<i32> {
    u32::from_str_radix(num, radix)
        .ok()
        .and_then(|v| i32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(code: &str) -> Vec<Token> {
        Line::new(0, code).tokenize().unwrap()
    }

    #[test]
    fn blank_and_comment_lines() {
        assert!(toks("").is_empty());
        assert!(toks("   ").is_empty());
        assert!(toks("; a comment").is_empty());
        assert!(toks("   ;; indented").is_empty());
    }

    #[test]
    fn strips_inline_comment() {
        assert_eq!(
            toks("ADD R0,R0,R1 ; increment"),
            vec![
                Token::Op(Mnemonic::ADD),
                Token::Reg(Reg::R0),
                Token::Reg(Reg::R0),
                Token::Reg(Reg::R1),
            ]
        );
    }

    #[test]
    fn labeled_instruction() {
        assert_eq!(
            toks("LOOP ADD R1,R1,#-1"),
            vec![
                Token::Label("LOOP".to_string()),
                Token::Op(Mnemonic::ADD),
                Token::Reg(Reg::R1),
                Token::Reg(Reg::R1),
                Token::Const(-1),
            ]
        );
    }

    #[test]
    fn label_chain_flattens() {
        assert_eq!(
            toks("A B C"),
            vec![
                Token::Label("A".to_string()),
                Token::Label("B".to_string()),
                Token::Label("C".to_string()),
            ]
        );
    }

    #[test]
    fn radix_prefixes() {
        assert_eq!(
            toks("TRAP x25"),
            vec![Token::Op(Mnemonic::TRAP), Token::Const(0x25)]
        );
        assert_eq!(
            toks("ADD R0,R0,b101"),
            vec![
                Token::Op(Mnemonic::ADD),
                Token::Reg(Reg::R0),
                Token::Reg(Reg::R0),
                Token::Const(5),
            ]
        );
    }

    #[test]
    fn operand_label_reference() {
        assert_eq!(
            toks("BRnzp LOOP"),
            vec![Token::Op(Mnemonic::BRnzp), Token::Label("LOOP".to_string())]
        );
        // lower-case register names are ordinary labels in this dialect
        assert_eq!(
            toks("JSRR r2"),
            vec![Token::Op(Mnemonic::JSRR), Token::Label("r2".to_string())]
        );
    }

    #[test]
    fn directive_is_uppercased() {
        assert_eq!(
            toks(".orig x3000"),
            vec![Token::Dir(".ORIG".to_string()), Token::Const(0x3000)]
        );
        assert_eq!(
            toks(".BLKW 3"),
            vec![Token::Dir(".BLKW".to_string()), Token::Const(3)]
        );
    }

    #[test]
    fn stringz_quote_rules() {
        assert_eq!(
            toks(r#".STRINGZ "hi\nthere""#),
            vec![
                Token::Dir(".STRINGZ".to_string()),
                Token::Str("hi\nthere".to_string()),
            ]
        );
        // single quotes keep the backslash-n sequence as-is
        assert_eq!(
            toks(r".STRINGZ 'hi\nthere'"),
            vec![
                Token::Dir(".STRINGZ".to_string()),
                Token::Str("hi\\nthere".to_string()),
            ]
        );
    }

    #[test]
    fn bad_literal_is_an_error() {
        assert!(Line::new(0, "ADD R0,R0,#ten").tokenize().is_err());
        assert!(Line::new(0, "TRAP x2G").tokenize().is_err());
        assert!(Line::new(0, ".FILL bogus").tokenize().is_err());
        // an `x` prefix always means hex, so this label cannot be referenced
        assert!(Line::new(0, "BR xyz").tokenize().is_err());
    }
}
