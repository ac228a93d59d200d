// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Client-local key/value storage.
//!
//! This is the durable mirror behind the session store: a handful of string
//! entries addressed by well-known keys, read and written synchronously.

mod file;
mod memory;

use crate::error::{self, Result};

pub(crate) use file::File;
pub(crate) use memory::Memory;

pub(crate) trait IsPersistent {
    fn is_persistent(&self) -> bool;
}

impl<T: IsPersistent + ?Sized> IsPersistent for Box<T> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}

pub(crate) trait Storage: IsPersistent {
    /// Read the entry stored under `key`, if there is one.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the entry stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry stored under `key`. Removing a missing entry succeeds.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Keys become file names for some backends, so they are restricted to
/// names without separators or relative components.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if valid {
        Ok(())
    } else {
        Err(error::Storage::InvalidKey(key.to_owned()).into())
    }
}
