//! dupline - Duplicate Line Finder
//!
//! Entry point for the dupline CLI application.

use clap::Parser;
use dupline::{
    cli::Cli,
    error::{user_message, ExitCode, StructuredError},
    logging::init_logging,
};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    init_logging(cli.verbose, cli.quiet, !cli.no_color);

    // Run the application logic
    match dupline::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::Failure;
            let message = user_message(&err);
            log::debug!("Run failed: {err:#}");

            // Report the error
            if json_errors {
                let structured = StructuredError::new(&message, exit_code);
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("{message}"),
                }
            } else {
                eprintln!("{message}");
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
