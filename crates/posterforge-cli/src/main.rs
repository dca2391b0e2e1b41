//! PosterForge command-line entry point.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match cli::parse_args(&args) {
        Ok(command) => cli::run(command, &mut std::io::stdout().lock()),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
