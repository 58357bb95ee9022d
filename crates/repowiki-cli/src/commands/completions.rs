//! Shell completions command implementation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Writes completions for `shell` to stdout.
pub fn execute(shell: Shell) {
    clap_complete::generate(shell, &mut Cli::command(), "repowiki", &mut std::io::stdout());
}
