//! docmd - DOCX to Markdown converter

use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "docmd")]
#[command(version, about = "Fast DOCX to Markdown converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    docmd report.docx    Write report.md next to the input; images land in media/")]
struct Cli {
    /// Input file (.docx)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(input) = cli.input else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    if !Path::new(&input).exists() {
        // Not fatal by itself; opening the archive below reports the failure.
        eprintln!("error: no such file: {input}");
    }

    match docmd::convert_docx(&input) {
        Ok(path) => {
            if !cli.quiet {
                println!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
