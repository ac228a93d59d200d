// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("session error: {0}")]
    Session(#[from] Session),
    #[error("navigation error: {0}")]
    Navigation(#[from] Navigation),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("storage quota exceeded while writing {key:?} (wanted {wanted} bytes, but only {available} bytes are free)")]
    QuotaExceeded {
        key: String,
        wanted: usize,
        available: usize,
    },
    #[error("storage is disabled or unavailable")]
    Unavailable,
    #[error("storage key {0:?} is not a plain name")]
    InvalidKey(String),
    #[error("no data directory is available for this platform")]
    NoProjectDirs,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Session {
    #[error("user record is missing the required field {0:?}")]
    MissingField(&'static str),
    #[error("the session store is in the middle of an update")]
    Busy,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Navigation {
    #[error("navigation to {path:?} redirected more than {hops} times")]
    RedirectLoop { path: String, hops: usize },
}
