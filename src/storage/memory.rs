// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::error::{self, Result};

use super::{check_key, IsPersistent, Storage};

/// Process-local storage. Nothing written here outlives the process.
#[derive(Debug, Default)]
pub(crate) struct Memory {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl Memory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Limit the combined size of all keys and values to `bytes`, the way a
    /// browser limits an origin's local storage.
    pub(crate) fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    fn used_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|&(k, _)| k != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl IsPersistent for Memory {
    fn is_persistent(&self) -> bool {
        false
    }
}

impl Storage for Memory {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_without(key));
            let wanted = key.len() + value.len();
            if wanted > available {
                return Err(error::Storage::QuotaExceeded {
                    key: key.to_owned(),
                    wanted,
                    available,
                }
                .into());
            }
        }
        let _previous = self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let _previous = self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() -> Result<()> {
        let mut storage = Memory::new();
        assert_eq!(storage.get_item("currentUser")?, None);

        storage.set_item("currentUser", "one")?;
        storage.set_item("currentUser", "two")?;
        assert_eq!(storage.get_item("currentUser")?.as_deref(), Some("two"));

        storage.remove_item("currentUser")?;
        storage.remove_item("currentUser")?;
        assert_eq!(storage.get_item("currentUser")?, None);
        Ok(())
    }

    #[test]
    fn quota_rejects_oversized_writes_and_keeps_old_value() -> Result<()> {
        let mut storage = Memory::new().with_quota(8);
        storage.set_item("k", "1234")?;

        let err = storage.set_item("k", "123456789").unwrap_err();
        assert!(matches!(
            err,
            error::Error::Storage(error::Storage::QuotaExceeded {
                wanted: 10,
                available: 8,
                ..
            })
        ));
        assert_eq!(storage.get_item("k")?.as_deref(), Some("1234"));
        Ok(())
    }

    #[test]
    fn quota_counts_other_entries() -> Result<()> {
        let mut storage = Memory::new().with_quota(10);
        storage.set_item("a", "1234")?;
        assert!(storage.set_item("b", "123456").is_err());
        storage.set_item("b", "1234")?;
        Ok(())
    }
}
