use arch::{op::Opcode, trap::Trap};
use clap::Parser;
use color_print::{cformat, cprintln};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Image file: big-endian words, origin first
    input: String,
}

fn main() {
    let args: Args = Args::parse();

    let bytes = std::fs::read(&args.input)
        .expect(&cformat!("<red,bold>Failed to open File</>: {}", args.input));
    let words: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    let Some((&origin, body)) = words.split_first() else {
        cprintln!("<red,bold>error</>: empty image: {}", args.input);
        std::process::exit(1);
    };

    cprintln!("<blue>.ORIG</> <yellow>0x{:04X}</>", origin);
    let mut addr = origin;
    for &word in body {
        cprintln!(
            "<green>0x{:04X}</>: (<yellow>0x{:04X}</>) <red>{:<5}</> | {}",
            addr,
            word,
            mnemonic(word),
            printable(word)
        );
        addr = addr.wrapping_add(1);
    }
}

/// Opcode mnemonic of a word, with no symbol recovery. Trap words with a
/// known service vector print the alias instead of `TRAP`.
fn mnemonic(word: u16) -> String {
    let op = Opcode::of_word(word);
    if op == Opcode::TRAP {
        if let Ok(trap) = Trap::try_from((word & 0xFF) as u8) {
            return trap.to_string();
        }
    }
    op.to_string()
}

/// The character a data word spells, if any.
fn printable(word: u16) -> String {
    match u8::try_from(word) {
        Ok(b) if b.is_ascii_graphic() || b == b' ' => char::from(b).to_string(),
        _ => String::new(),
    }
}
