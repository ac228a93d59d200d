// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{self, Result};

/// The opaque credential the server issued for a session.
#[derive(Clone)]
pub(crate) struct Token(SecretString);

impl Token {
    pub(crate) fn new(value: String) -> Self {
        Self(SecretString::new(value))
    }

    fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl From<SecretString> for Token {
    fn from(value: SecretString) -> Self {
        Self(value)
    }
}

impl ExposeSecret<String> for Token {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for Token {}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose_secret())
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// A user record as handed over by the login and registration flows, or as
/// found in storage. Nothing about it has been checked yet.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Record {
    #[serde(default, alias = "_id")]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) display_name: Option<String>,
    #[serde(default)]
    pub(crate) token: Option<Token>,
}

/// The identity of the user who is currently logged in.
///
/// Every field is present and non-empty; a value of this type cannot be
/// constructed otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Record")]
pub(crate) struct Session {
    id: String,
    username: String,
    display_name: String,
    token: Token,
}

impl Session {
    pub(crate) fn new(
        id: String,
        username: String,
        display_name: String,
        token: Token,
    ) -> Result<Self> {
        Ok(Self::try_from(Record {
            id: Some(id),
            username: Some(username),
            display_name: Some(display_name),
            token: Some(token),
        })?)
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn display_name(&self) -> &str {
        &self.display_name
    }

    pub(crate) const fn token(&self) -> &Token {
        &self.token
    }
}

fn non_empty(field: &'static str, value: Option<String>) -> Result<String, error::Session> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(error::Session::MissingField(field))
}

impl TryFrom<Record> for Session {
    type Error = error::Session;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: non_empty("id", record.id)?,
            username: non_empty("username", record.username)?,
            display_name: non_empty("displayName", record.display_name)?,
            token: record
                .token
                .filter(|t| !t.is_empty())
                .ok_or(error::Session::MissingField("token"))?,
        })
    }
}
