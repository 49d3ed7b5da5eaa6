#![forbid(unsafe_code)]

//! salt-postrm: package maintainer hook entry point.

use clap::Parser;
use clap::error::ErrorKind;

mod cli_app;

/// Exit status for arguments the hook cannot make sense of.
const USAGE_EXIT_CODE: i32 = 1;

fn main() {
    let invoked = std::env::args_os().next().map_or_else(
        || "salt-postrm".to_string(),
        |argv0| argv0.to_string_lossy().into_owned(),
    );
    let args = match cli_app::Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(USAGE_EXIT_CODE);
        }
    };
    if let Err(e) = cli_app::run(&args, &invoked) {
        eprintln!("{invoked} {e}");
        std::process::exit(e.exit_code());
    }
}
