use anyhow::Result;
use env_logger::init;
use vfbeta_cli::cli::Cli;

fn main() -> Result<()> {
    init();
    match Cli::parse_or_usage(std::env::args_os()) {
        Some(cli) => cli.run(),
        None => Ok(()),
    }
}
