use clap::Parser;
use color_print::{cformat, cprintln};
use std::{io::Write, path::Path};

use lc3asm::{
    error::Diag,
    image, parser,
    parser::Stmt,
    symtab::{self, Layout},
    token::Line,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Output file, `<input stem>-out.obj` when not set
    #[clap(short, long)]
    output: Option<String>,

    /// Dump the listing and symbol table
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    let args: Args = Args::parse();
    println!("LC-3 Assembler");

    println!("1. Read File and Parse Lines");
    println!("  < {}", args.input);
    let source = std::fs::read_to_string(&args.input)
        .expect(&cformat!("<red,bold>Failed to open File</>: {}", args.input));
    let lines = Line::split(&source);

    println!("2. Collect Labels & Generate Binary");
    let (layout, words) = match run(&lines) {
        Ok(ok) => ok,
        Err(diag) => {
            let raw = lines
                .get(diag.line.saturating_sub(1))
                .map(|l| l.raw.as_str())
                .unwrap_or("");
            diag.print(&args.input, raw);
            std::process::exit(1);
        }
    };
    println!("  - found #{} labels", layout.symtab.len());
    println!("  - first free address 0x{:04X}", layout.end);

    if args.dump {
        print_dump(&lines, &layout);
    }

    let output = args.output.unwrap_or_else(|| default_output(&args.input));
    println!("3. Output Binary");
    println!("  > {}", output);
    let mut file = std::fs::File::create(&output)
        .expect(&cformat!("<red,bold>Failed to create File</>: {}", output));
    file.write_all(&image::to_bytes(&words))
        .expect(&cformat!("<red,bold>Failed to write File</>: {}", output));
}

/// Both passes in order; no output file is written when either fails.
fn run(lines: &[Line]) -> Result<(Layout, Vec<u16>), Diag> {
    let stmts = parser::parse(lines)?;
    let layout = symtab::locate(stmts)?;
    let words = image::emit(&layout.symtab, &layout.stmts)?;
    Ok((layout, words))
}

fn default_output(input: &str) -> String {
    format!("{}-out.obj", Path::new(input).with_extension("").display())
}

fn print_dump(lines: &[Line], layout: &Layout) {
    println!("-------------+---------------------------------------------------");
    for (stmt, lc) in &layout.stmts {
        let raw = lines
            .get(stmt.line_no - 1)
            .map(|l| l.raw.as_str())
            .unwrap_or("");
        let word = match &stmt.body {
            Some(Stmt::Code(code)) => match code.resolve(&layout.symtab, *lc) {
                Ok(inst) => cformat!("<yellow>{:04X}</>", inst.encode()),
                Err(_) => cformat!("<red,bold>!!!!</>"),
            },
            Some(Stmt::Fill(v)) => cformat!("<yellow>{:04X}</>", *v as u16),
            _ => "    ".to_string(),
        };
        cprintln!(
            "<green>[{:04X}]</> {} <blue>| {:>4}:</> {}",
            lc,
            word,
            stmt.line_no,
            raw
        );
    }
    println!("-------------+---------------------------------------------------");
    for (name, addr) in layout.symtab.iter() {
        cprintln!("  <green>{:04X}</> {}", addr, name);
    }
}
