use std::env::args;
use std::fs::read_to_string;
use std::io;
use std::process::exit;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use lambda::{
    compile_all, compile_with, is_identifier, is_whitespace, Cause, CompileOptions, Diagnostic,
};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("LAMBDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let files: Vec<String> = args().skip(1).collect();
    if files.is_empty() {
        run_prompt()
    } else {
        run_files(&files)
    }
}

/// Compile each file as a separate expression, named by its path.
fn run_files(filenames: &[String]) -> anyhow::Result<()> {
    let mut sources = Vec::new();
    for filename in filenames {
        let source =
            read_to_string(filename).with_context(|| format!("cannot read {}", filename))?;
        sources.push((filename.clone(), source));
    }

    let batch = compile_all(sources, &CompileOptions::default());
    if !batch.is_ok() {
        for (name, diagnostics) in &batch.diagnostics {
            for diagnostic in diagnostics {
                eprintln!("{}:{}", name, diagnostic);
            }
        }
        exit(1);
    }
    for (name, program) in &batch.programs {
        println!("{}: {}", name, program.code);
    }
    Ok(())
}

/// Read expressions from stdin, one per line, and print the code each one
/// compiles to. A line of the form `name = expression` also makes `name`
/// available to every later line.
fn run_prompt() -> anyhow::Result<()> {
    let mut options = CompileOptions::new();
    loop {
        let buffer = match read_stdin()? {
            Some(buffer) => buffer,
            None => {
                println!();
                return Ok(());
            }
        };

        let (name, source) = match split_entry(&buffer) {
            Some(entry) => entry,
            None => continue,
        };
        let compilation = compile_with(source, &options);
        if compilation.is_ok() {
            println!("{}", compilation.program.code);
            if let Some(name) = name {
                options = options.with_global(name, compilation.value);
            }
        } else {
            for diagnostic in &compilation.diagnostics {
                eprintln!("stdin:{}", diagnostic);
            }
        }
    }
}

/// Read lines until they make up a whole expression. Returns `None` at the
/// end of input.
fn read_stdin() -> anyhow::Result<Option<String>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut is_first_line = true;
    let mut buffer = String::new();
    loop {
        if is_first_line {
            print!("> ");
            is_first_line = false;
        } else {
            print!(">> ");
        }
        let _ = io::Write::flush(&mut stdout);

        if stdin.read_line(&mut buffer)? == 0 {
            return Ok(if is_blank(&buffer) {
                None
            } else {
                Some(buffer)
            });
        }

        let (_, source) = split_definition(&buffer);
        let compilation = compile_with(source, &CompileOptions::default());
        if !compilation.diagnostics.iter().any(is_unclosed_group) {
            return Ok(Some(buffer));
        }
    }
}

/// An unclosed group might be closed on a later line.
fn is_unclosed_group(diagnostic: &Diagnostic) -> bool {
    matches!(diagnostic.cause, Cause::UnclosedGroup { .. })
}

fn is_blank(s: &str) -> bool {
    s.chars().all(is_whitespace)
}

/// Split an entry into the name it defines, if any, and its source. A blank
/// entry gives `None`.
fn split_entry(entry: &str) -> Option<(Option<&str>, &str)> {
    if is_blank(entry) {
        None
    } else {
        Some(split_definition(entry))
    }
}

fn split_definition(line: &str) -> (Option<&str>, &str) {
    if let Some((name, source)) = line.split_once(" = ") {
        let name = name.trim_matches(is_whitespace);
        if is_identifier(name) {
            return (Some(name), source);
        }
    }
    (None, line)
}
