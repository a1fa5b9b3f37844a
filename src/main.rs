//! M++ compiler CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use mppc::config::CompilerConfig;
use mppc::compile_file;

#[derive(ClapParser)]
#[command(name = "mppc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Single-pass semantic analyzer and quadruple emitter for M++", long_about = None)]
struct Cli {
    /// M++ source file to compile
    input: PathBuf,

    /// Output path for the quadruple listing
    #[arg(short = 'o', long = "output", default_value = "a.quad")]
    output: PathBuf,

    /// Dump the resolved symbol table to this path
    #[arg(short = 's', long = "sym_table")]
    sym_table: Option<PathBuf>,

    /// Enable warning diagnostics (unused declarations, etc)
    #[arg(short = 'w', long = "warn")]
    warn: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CompilerConfig {
        warnings_enabled: cli.warn,
        output_path: cli.output,
        sym_table_path: cli.sym_table,
    };

    match compile_file(&cli.input, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("mppc: {message}");
            ExitCode::FAILURE
        }
    }
}
