use clap::Parser;
use tradesig::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
