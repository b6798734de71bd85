//! Card table viewer entry point

use anyhow::Result;
use clap::Parser;

use cardtable_cli::{Cli, execute};

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}
