//! Binary entrypoint for the terminal chat client.

use std::process::ExitCode;

use csvchat::start_csvchat;

fn main() -> ExitCode {
    start_csvchat::run()
}
