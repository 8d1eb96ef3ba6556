use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("more argument required")]
    MissingArgument,

    #[error("`{0}` takes {1} operand(s), got {2}")]
    OperandCount(String, usize, usize),

    #[error("unexpected label `{0}`: one label per statement")]
    SecondLabel(String),

    #[error("unknown directive: `{0}`")]
    UnknownDirective(String),

    #[error("`.ORIG` must be the first statement")]
    MisplacedOrig,

    #[error("re-defined label: `{0}`, first defined on line {1}")]
    RedefinedLabel(String, usize),

    #[error("undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("immediate {0} does not fit in a {1}-bit field")]
    ImmOutOfRange(i32, u32),

    #[error("program of {1} words starting at 0x{0:04X} exceeds the 16-bit address space")]
    LocationOverflow(u16, u32),

    #[error("internal: no encoding for `{0}`")]
    Unencodable(String),
}

/// An error bound to its 1-based source line.
#[derive(Debug, PartialEq, Eq)]
pub struct Diag {
    pub line: usize,
    pub err: Error,
}

impl Diag {
    pub fn new(line: usize, err: Error) -> Self {
        Diag { line, err }
    }

    /// Print the diagnostic with file location and the offending line.
    pub fn print(&self, path: &str, raw: &str) {
        cprintln!("<red,bold>error</>: {}", self.err);
        cprintln!("     <blue>--></> <underline>{}:{}</>", path, self.line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, raw);
        cprintln!("      <blue>|</>");
    }
}
