// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    convert::Infallible,
    fs,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{info, warn};
use secrecy::SecretString;

use crate::{
    error::Result,
    metadata,
    session::{Record, Token},
    store::Persistence,
};

use super::Context;

/// Remember the user the server just logged in or registered.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Read the user record returned by the server from a JSON file, or from
    /// standard input when given `-`. The individual field options are
    /// ignored in this case.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["id", "username", "display_name"])]
    record: Option<PathBuf>,

    /// The user's unique identifier.
    #[arg(long)]
    id: Option<String>,

    /// The user's login handle.
    #[arg(long)]
    username: Option<String>,

    /// The name to show for the user.
    #[arg(long)]
    display_name: Option<String>,

    /// The credential token the server issued.
    #[arg(long, env = "EXPENSE_GUARD_TOKEN", hide_env_values = true, value_parser = secret)]
    token: Option<SecretString>,
}

fn secret(value: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::new(value.to_owned()))
}

fn read_record(path: &Path) -> Result<Record> {
    if path == Path::new("-") {
        Ok(serde_json::from_reader(io::stdin().lock())?)
    } else {
        Ok(serde_json::from_reader(BufReader::new(fs::File::open(path)?))?)
    }
}

impl super::Command for Command {
    fn execute(self, context: &mut Context) -> Result<()> {
        let record = match self.record {
            Some(ref path) => {
                info!("Reading the user record from {}", path.display());
                read_record(path)?
            }
            None => Record {
                id: self.id,
                username: self.username,
                display_name: self.display_name,
                token: self.token.map(Token::from),
            },
        };

        let outcome = context.store.borrow_mut().set_user_record(record)?;
        if let Persistence::Ephemeral = outcome {
            warn!(
                "{} will forget this session when it exits because no persistent storage is in use",
                *metadata::CLIENT_DISPLAY_NAME
            );
        }

        let store = context.store.borrow();
        if let Some(session) = store.current_user() {
            println!("Logged in as {} ({}).", session.display_name(), session.username());
        }
        Ok(())
    }
}
