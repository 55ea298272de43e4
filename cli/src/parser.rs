//! Command line argument parsing for the walang compiler.
//!
//! This module defines the CLI interface using `clap`. The `Cli` struct
//! captures the single positional source argument and the at-most-one `-o`
//! output override.

use clap::Parser;

/// Command line interface definition for the walang compiler.
///
/// Exactly one positional source file is accepted; `-o` is optional and may
/// be given at most once. When omitted, the output path is the source path
/// with its extension replaced by `.wat`.
///
/// ## Examples
///
/// ```bash
/// walang example.wl
/// walang example.wl -o out.wat
/// ```
#[derive(Parser)]
#[command(
    name = "walang",
    author,
    version,
    about = "walang compiler CLI",
    long_about = "Compiles a single walang source file to a `.wat` text module. \
Output defaults to the source path with its extension replaced by `.wat`."
)]
pub(crate) struct Cli {
    /// Path to the source file to compile.
    pub(crate) source: std::path::PathBuf,

    /// Output path for the generated `.wat` file.
    ///
    /// Defaults to the source path with its extension replaced by `.wat`.
    /// Collected as a list (rather than a single `Option`) so a second
    /// occurrence can be rejected explicitly in `main`, rather than
    /// silently overwriting the first.
    #[clap(short = 'o', long = "output", action = clap::ArgAction::Append)]
    pub(crate) output: Vec<std::path::PathBuf>,
}
