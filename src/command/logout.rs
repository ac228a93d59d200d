// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;

use crate::error::Result;

use super::Context;

/// Forget the current session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

impl super::Command for Command {
    fn execute(self, context: &mut Context) -> Result<()> {
        let mut store = context.store.borrow_mut();
        let was_logged_in = store.current_user().is_some();

        // The session is gone for this run even if the stored copy stays.
        let outcome = store.clear_user();

        if was_logged_in {
            println!("Logged out.");
        } else {
            println!("Not logged in.");
        }
        if outcome.is_failed() {
            println!("The saved session could not be removed and may come back next time.");
        }
        Ok(())
    }
}
