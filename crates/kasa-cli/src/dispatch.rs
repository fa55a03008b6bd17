use std::time::Duration;

use kasa_client::commands;
use kasa_client::commands::entries::{AddOptions, ListOptions};
use kasa_client::{ClientResult, EntryKind, SuccessEnvelope};

use crate::cli::{Cli, Commands, DbCommand, EntryCommand};

/// What `main` should do after parsing.
#[derive(Debug)]
pub enum Dispatched {
    /// A one-shot command finished with this result.
    Envelope(SuccessEnvelope),
    /// Start the refresh loop.
    Watch {
        interval: Duration,
        count: Option<u64>,
    },
}

pub fn dispatch(cli: &Cli) -> ClientResult<Dispatched> {
    let envelope = match &cli.command {
        Commands::Income { command } => dispatch_entry(EntryKind::Income, command)?,
        Commands::Expense { command } => dispatch_entry(EntryKind::Expense, command)?,
        Commands::Report { from, to, .. } => commands::report::run(
            from.as_ref().map(|value| value.as_str()),
            to.as_ref().map(|value| value.as_str()),
        )?,
        Commands::Categories { kind, .. } => commands::categories::run(*kind)?,
        Commands::Db {
            command: DbCommand::Schema { .. },
        } => commands::schema::summary()?,
        Commands::Watch {
            interval_secs,
            count,
            ..
        } => {
            return Ok(Dispatched::Watch {
                interval: Duration::from_secs(*interval_secs),
                count: *count,
            });
        }
    };
    Ok(Dispatched::Envelope(envelope))
}

fn dispatch_entry(kind: EntryKind, command: &EntryCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        EntryCommand::Add {
            description,
            amount,
            category,
            date,
            ..
        } => commands::entries::add_with_options(AddOptions {
            kind,
            description: description.clone(),
            amount: amount.clone(),
            category: category.clone(),
            date: date.clone(),
            home_override: None,
        }),
        EntryCommand::List { category, .. } => commands::entries::list_with_options(
            kind,
            ListOptions {
                category: category.clone(),
                home_override: None,
            },
        ),
    }
}
