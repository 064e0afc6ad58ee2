//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], [`validate`], or [`health`].
//! Each handler lives in its own submodule.

pub mod health;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::EdgeError;

pub async fn dispatch(cli: Cli) -> Result<(), EdgeError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  storefront-edge v{version} \u{2014} browser-facing edge for a storefront API gateway\n\n  \
         No command provided. To get started:\n\n    \
         storefront-edge run                     Start with defaults (gateway at localhost:8000/api)\n    \
         storefront-edge init                    Generate a starter config\n    \
         storefront-edge run -c edge.yaml        Start with a specific config file\n    \
         storefront-edge --help                  See all commands and options\n"
    );
}
