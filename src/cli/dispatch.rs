use anyhow::Result;
use sentinel::commands::{config, read, run};

use super::types::{Commands, ConfigCommands};

pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run { config } => run::execute(&config.into()),
        Commands::Read { config } => read::execute(&config.into()),
        Commands::Config { command } => match command {
            ConfigCommands::Show { config: args } => config::show(&args.into()),
            ConfigCommands::Path => config::path(),
        },
    }
}
