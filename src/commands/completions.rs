use crate::Cli;
use anyhow::{anyhow, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn run(shell: String) -> Result<()> {
    let shell: Shell = shell
        .parse()
        .map_err(|_| anyhow!("unsupported shell '{shell}', choose: bash, zsh, fish"))?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "apim", &mut io::stdout());
    Ok(())
}
