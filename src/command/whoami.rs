// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use secrecy::ExposeSecret as _;
use tabled::{settings::Style, Table, Tabled};

use crate::{error::Result, session::Session, storage::IsPersistent as _};

use super::Context;

/// Show the user who is currently logged in.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Print the credential token instead of masking it.
    #[arg(long)]
    show_token: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl Row {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

impl Command {
    fn rows(&self, session: &Session, context: &Context, persistent: bool) -> Result<Vec<Row>> {
        let token = if self.show_token {
            session.token().expose_secret().clone()
        } else {
            "⋆⋆⋆⋆⋆⋆⋆⋆⋆⋆".to_owned()
        };
        Ok(vec![
            Row::new("ID", session.id()),
            Row::new("Username", session.username()),
            Row::new("Display Name", session.display_name()),
            Row::new("Token", token),
            Row::new("Storage", if persistent { "persistent" } else { "memory only" }),
            Row::new("API", context.api.endpoint("/")?),
        ])
    }
}

impl super::Command for Command {
    fn execute(self, context: &mut Context) -> Result<()> {
        let store = context.store.borrow();
        let Some(session) = store.current_user() else {
            println!("Not logged in.");
            return Ok(());
        };

        let persistent = store.storage().is_persistent();
        let rows = self.rows(session, context, persistent)?;
        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}
