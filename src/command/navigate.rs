// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use log::{debug, info};

use crate::{error::Result, guard::Attempt, navigator::Navigation};

use super::Context;

/// Check whether a path may be visited with the current session.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The page the navigation starts from. Visiting it is checked as well.
    #[arg(long, value_name = "PATH")]
    from: Option<String>,

    /// The path to navigate to.
    #[clap()]
    path: String,
}

fn describe(navigation: &Navigation) -> String {
    let route = navigation
        .requested
        .name
        .map(|name| {
            let params = navigation
                .requested
                .params
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>();
            if params.is_empty() {
                format!(" [{name}]")
            } else {
                format!(" [{name} {}]", params.join(" "))
            }
        })
        .unwrap_or_default();

    match navigation.outcome {
        Attempt::Allowed => format!("proceed {}{}", navigation.requested.path, route),
        Attempt::Redirected(_) => format!(
            "redirect {}{} -> {}",
            navigation.requested.path, route, navigation.location.path
        ),
        Attempt::Pending => format!("pending {}{}", navigation.requested.path, route),
    }
}

impl super::Command for Command {
    fn execute(self, context: &mut Context) -> Result<()> {
        if let Some(ref from) = self.from {
            let start = context.navigator.start(from)?;
            println!("{}", describe(&start));
            if let Some(location) = context.navigator.current() {
                info!("Navigating onward from {}", location.path);
            }
        }

        let navigation = if self.from.is_some() {
            context.navigator.navigate(&self.path)?
        } else {
            context.navigator.start(&self.path)?
        };
        debug!(
            "Navigation {} finished (committed: {})",
            navigation.id, navigation.committed
        );
        println!("{}", describe(&navigation));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;

    fn navigation(requested: &str, outcome: Attempt, location: &str) -> Navigation {
        let routes = RouteTable::default();
        Navigation {
            id: 1,
            requested: routes.resolve(requested),
            outcome,
            location: routes.resolve(location),
            committed: true,
        }
    }

    #[test]
    fn describes_allowed_navigation() {
        assert_eq!(
            describe(&navigation("/group/g1", Attempt::Allowed, "/group/g1")),
            "proceed /group/g1 [group groupId=g1]"
        );
        assert_eq!(
            describe(&navigation("/nowhere", Attempt::Allowed, "/nowhere")),
            "proceed /nowhere"
        );
    }

    #[test]
    fn describes_redirected_navigation() {
        assert_eq!(
            describe(&navigation(
                "/profile",
                Attempt::Redirected("/login".to_owned()),
                "/login"
            )),
            "redirect /profile [profile] -> /login"
        );
    }
}
