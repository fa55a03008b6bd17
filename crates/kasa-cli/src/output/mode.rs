use crate::cli::{Commands, DbCommand, EntryCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Income { command } | Commands::Expense { command } => match command {
            EntryCommand::Add { json, .. } | EntryCommand::List { json, .. } => {
                OutputMode::from_flag(*json)
            }
        },
        Commands::Report { json, .. }
        | Commands::Watch { json, .. }
        | Commands::Categories { json, .. }
        | Commands::Db {
            command: DbCommand::Schema { json },
        } => OutputMode::from_flag(*json),
    }
}
