// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    error::{self, Result},
    metadata,
};

use super::{check_key, IsPersistent, Storage};

/// Storage that keeps each entry in its own UTF-8 file below a directory.
pub(crate) struct File {
    base: PathBuf,
}

impl File {
    /// Storage rooted in the platform data directory for this program.
    pub(crate) fn new() -> Result<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::with_base(dirs.data_dir()))
            .ok_or_else(|| error::Storage::NoProjectDirs.into())
    }

    pub(crate) fn with_base<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: base.as_ref().to_owned(),
        }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.base.join(key))
    }
}

/// Permission problems mean the storage is off limits rather than broken.
fn storage_error(e: io::Error) -> error::Error {
    if e.kind() == io::ErrorKind::PermissionDenied {
        error::Storage::Unavailable.into()
    } else {
        e.into()
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

impl Storage for File {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.base).map_err(storage_error)?;

        // Stage the value, then rename it into place: readers only ever see a
        // complete entry.
        let staging = self.base.join(format!(".{key}.tmp"));
        fs::write(&staging, value).map_err(storage_error)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(storage_error(e));
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}
