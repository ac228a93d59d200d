// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Where the expense tracker's HTTP API lives.
//!
//! The login and registration flows talk to the API and hand the resulting
//! user record to the session store. An empty base URL means requests are made
//! relative to wherever the application is served from.

use url::Url;

use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ApiConfig {
    base: Option<Url>,
}

impl ApiConfig {
    pub(crate) fn new(base: &str) -> Result<Self> {
        let base = base.trim();
        if base.is_empty() {
            return Ok(Self::default());
        }

        let mut url = Url::parse(base)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { base: Some(url) })
    }

    pub(crate) const fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// The URL a request for `path` goes to. Paths keep any prefix the base
    /// URL carries, so `/users/login` under `https://host/api` becomes
    /// `https://host/api/users/login`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<String> {
        match self.base {
            Some(ref base) => Ok(base.join(path.trim_start_matches('/'))?.into()),
            None => Ok(path.to_owned()),
        }
    }
}
