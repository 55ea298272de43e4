#![warn(clippy::pedantic)]

//! # walang Compiler CLI
//!
//! Command line interface for the walang compiler: `walang <source> [-o <target>]`.
//!
//! Reads the source file, runs the full pipeline (parse, register, lower),
//! and writes the resulting `.wat` text to the output path — the source
//! path with its extension replaced by `.wat`, unless `-o` overrides it.
//!
//! ## Exit codes
//! * 0 – success.
//! * 1 – usage / IO / compilation failure.
//!
//! ## Example
//! ```bash
//! walang examples/hello.wl -o hello.wat
//! ```

mod parser;
use clap::Parser;
use parser::Cli;
use std::{fs, process};

/// Entry point for the CLI executable.
///
/// Reads the source file, compiles it via [`walang::compile`], and writes
/// the `.wat` text to the resolved output path. On any failure, the
/// rendered diagnostic is logged and the process exits with code `1`.
fn main() {
    env_logger::init();
    let args = Cli::parse();

    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("{e}");
        process::exit(1);
    }
    process::exit(0);
}

fn run(args: &Cli) -> anyhow::Result<()> {
    if args.output.len() > 1 {
        anyhow::bail!("-o may be given at most once");
    }
    let output_path = args.output.first().cloned().unwrap_or_else(|| args.source.with_extension("wat"));

    let source_code = fs::read_to_string(&args.source)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.source.display()))?;
    log::debug!("read {} bytes from {}", source_code.len(), args.source.display());

    let file_name = args.source.to_string_lossy();
    let (bytes, wat) = walang::compile(&source_code, &file_name)?;
    log::debug!("compiled to {} bytes of wasm", bytes.len());

    fs::write(&output_path, &wat)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", output_path.display()))?;
    log::info!("compiled {} -> {}", args.source.display(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use parser::Cli;

    #[test]
    fn default_output_replaces_extension() {
        let args = Cli { source: "foo/bar.wl".into(), output: vec![] };
        let output = args.output.first().cloned().unwrap_or_else(|| args.source.with_extension("wat"));
        assert_eq!(output, std::path::PathBuf::from("foo/bar.wat"));
    }
}
