// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod api;
mod command;
mod error;
mod guard;
mod metadata;
mod navigator;
mod routes;
mod session;
mod storage;
mod store;

use std::{cell::RefCell, path::PathBuf, process, rc::Rc};

use clap::{Parser, Subcommand};
use command::Command as _;
use error::Result;
use log::{debug, error, warn};

/// The local storage quota browsers commonly give a site.
const MEMORY_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Logout(command::logout::Command),
    Whoami(command::whoami::Command),
    Navigate(command::navigate::Command),
    Routes(command::routes::Command),
}

impl command::Command for Command {
    fn execute(self, context: &mut command::Context) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(context),
            Self::Logout(cmd) => cmd.execute(context),
            Self::Whoami(cmd) => cmd.execute(context),
            Self::Navigate(cmd) => cmd.execute(context),
            Self::Routes(cmd) => cmd.execute(context),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The directory to keep the session in. Defaults to the platform data
    /// directory.
    #[arg(long, env = "EXPENSE_GUARD_DATA_DIR", value_hint = clap::ValueHint::DirPath)]
    data_dir: Option<PathBuf>,

    /// Keep the session in memory only, so it is forgotten when the program
    /// exits.
    #[arg(long)]
    ephemeral: bool,

    /// A path that can be visited without logging in. May be given more than
    /// once; replaces the defaults.
    #[arg(long = "public-page", value_name = "PATH", default_values = [guard::LOGIN_PATH, guard::REGISTER_PATH])]
    public_pages: Vec<String>,

    /// Where navigation without a session is sent.
    #[arg(long, value_name = "PATH", default_value = guard::LOGIN_PATH)]
    login_path: String,

    /// The base URL of the expense tracker API. Empty means requests are
    /// relative to where the application is served from.
    #[arg(long, env = "EXPENSE_GUARD_API_BASE_URL", default_value = "")]
    api_base_url: String,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage> {
    if !args.ephemeral {
        if let Some(ref dir) = args.data_dir {
            return Box::new(storage::File::with_base(dir));
        }

        match storage::File::new() {
            Ok(file_storage) => return Box::new(file_storage),
            Err(e) => {
                warn!("We need to fall back to keeping the session in memory because there is nowhere to save it: {}", e);
            }
        }
    }

    Box::new(storage::Memory::new().with_quota(MEMORY_QUOTA_BYTES))
}

fn run(args: Args) -> Result<()> {
    let api = api::ApiConfig::new(&args.api_base_url)?;
    if let Some(base) = api.base() {
        debug!("Using the API at {}", base);
    }

    let store = Rc::new(RefCell::new(store::SessionStore::new(get_session_storage(
        &args,
    ))));
    if store.borrow_mut().hydrate().is_none() {
        debug!("Starting without a session");
    }

    let guard = guard::Guard::new(
        Rc::clone(&store),
        guard::PublicPages::new(args.public_pages),
        &args.login_path,
    );
    let mut context = command::Context {
        store,
        navigator: navigator::Navigator::new(guard, routes::RouteTable::default()),
        api,
    };

    args.command.execute(&mut context)
}

fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("EXPENSE_GUARD_LOG", "warn")
        .write_style("EXPENSE_GUARD_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()) {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
