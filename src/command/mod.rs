// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{cell::RefCell, rc::Rc};

use crate::{
    api::ApiConfig, error::Result, navigator::Navigator, storage::Storage, store::SessionStore,
};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod navigate;
pub(crate) mod routes;
pub(crate) mod whoami;

pub(crate) type SharedStore = Rc<RefCell<SessionStore<Box<dyn Storage>>>>;

/// Everything a command can work with, set up once per invocation.
pub(crate) struct Context {
    pub(crate) store: SharedStore,
    pub(crate) navigator: Navigator<SharedStore>,
    pub(crate) api: ApiConfig,
}

pub(crate) trait Command {
    fn execute(self, context: &mut Context) -> Result<()>;
}
