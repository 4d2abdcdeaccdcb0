use std::process::ExitCode;

use clap::Parser;

use shadowscope::cli::{commands, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", console::style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
