use indexmap::IndexMap;

use crate::{
    error::{Diag, Error},
    parser::{Statement, Stmt},
};

// ----------------------------------------------------------------------------
// Symbol table

/// Label -> address, insertion-ordered so dumps list labels in source order.
/// Written only by pass 1, read-only afterwards.
#[derive(Debug)]
pub struct SymTab(IndexMap<String, (usize, u16)>);

impl SymTab {
    pub fn new() -> Self {
        SymTab(IndexMap::new())
    }

    pub fn insert(&mut self, name: &str, line_no: usize, addr: u16) -> Result<(), Error> {
        if let Some((first, _)) = self.0.get(name) {
            return Err(Error::RedefinedLabel(name.to_string(), *first));
        }
        self.0.insert(name.to_string(), (line_no, addr));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.0.get(name).map(|(_, addr)| *addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> + '_ {
        self.0.iter().map(|(name, (_, addr))| (name.as_str(), *addr))
    }
}

impl Default for SymTab {
    fn default() -> Self {
        SymTab::new()
    }
}

// ----------------------------------------------------------------------------
// Pass 1

/// Pass-1 output: the symbol table plus every statement paired with the
/// location counter value in effect when it was reached.
#[derive(Debug)]
pub struct Layout {
    pub symtab: SymTab,
    pub stmts: Vec<(Statement, u16)>,
    /// First free address past the program; diagnostics only.
    pub end: u32,
}

/// Walk statements in order, binding labels and sizing each statement. The
/// location counter advances only after a statement is recorded, so a
/// statement's own label resolves to its own address.
pub fn locate(stmts: Vec<Statement>) -> Result<Layout, Diag> {
    let mut symtab = SymTab::new();
    let mut located = Vec::with_capacity(stmts.len());
    let mut origin: Option<u16> = None;
    let mut lc: u32 = 0;

    for stmt in stmts {
        let line = stmt.line_no;

        if origin.is_none() {
            match (&stmt.label, &stmt.body) {
                (None, Some(Stmt::Orig(addr))) => {
                    lc = *addr as u32;
                    origin = Some(*addr);
                    located.push((stmt, lc as u16));
                    continue;
                }
                _ => return Err(Diag::new(line, Error::MisplacedOrig)),
            }
        }
        let origin_addr = origin.unwrap_or_default();

        if let Some(label) = &stmt.label {
            if lc > 0xFFFF {
                let words = lc - origin_addr as u32;
                return Err(Diag::new(line, Error::LocationOverflow(origin_addr, words)));
            }
            symtab
                .insert(label, line, lc as u16)
                .map_err(|e| Diag::new(line, e))?;
        }

        let words: u32 = match &stmt.body {
            None | Some(Stmt::End) => 0,
            Some(Stmt::Orig(_)) => return Err(Diag::new(line, Error::MisplacedOrig)),
            Some(Stmt::Blkw(n)) => *n as u32,
            Some(Stmt::Stringz(s)) => s.len() as u32 + 1,
            Some(Stmt::Fill(_)) | Some(Stmt::Code(_)) => 1,
        };
        let end = matches!(stmt.body, Some(Stmt::End));

        located.push((stmt, lc as u16));
        if end {
            break;
        }

        lc += words;
        if lc > 0x10000 {
            let words = lc - origin_addr as u32;
            return Err(Diag::new(line, Error::LocationOverflow(origin_addr, words)));
        }
    }

    match origin {
        Some(_) => Ok(Layout {
            symtab,
            stmts: located,
            end: lc,
        }),
        None => Err(Diag::new(1, Error::MisplacedOrig)),
    }
}
