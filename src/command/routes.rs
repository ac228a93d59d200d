// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;

use super::Context;

/// List the application's routes and whether they need a session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Access")]
    access: &'static str,
}

impl super::Command for Command {
    fn execute(self, context: &mut Context) -> Result<()> {
        let guard = context.navigator.guard();
        let rows = context.navigator.routes().routes().iter().map(|route| Row {
            name: route.name,
            path: route.pattern,
            access: if guard.is_public(route.pattern) {
                "public"
            } else {
                "logged in"
            },
        });
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!("Without a session, protected paths redirect to {}.", guard.login_path());
        Ok(())
    }
}
