// Bibliotheca
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Username` data type.

use crate::model::{EmailAddress, ModelError, ModelResult};
use serde::{Deserialize, Serialize, de::Visitor};

/// Maximum length of a username.  Usernames can be email addresses so this matches them.
pub(crate) const MAX_USERNAME_LENGTH: usize = 254;

/// Represents a correctly-formatted (but maybe non-existent) login name.
///
/// Login names are case sensitive and are kept verbatim.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new username from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.is_empty() {
            return Err(ModelError("Username cannot be empty".to_owned()));
        }
        if s.len() > MAX_USERNAME_LENGTH {
            return Err(ModelError("Username is too long".to_owned()));
        }

        for ch in s.chars() {
            if !(ch.is_ascii_alphanumeric() || "@+.-_".find(ch).is_some()) {
                return Err(ModelError(format!(
                    "Unsupported character '{}' in username '{}'",
                    ch, s
                )));
            }
        }

        Ok(Self(s))
    }

    /// Returns a string view of the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&EmailAddress> for Username {
    type Error = ModelError;

    fn try_from(email: &EmailAddress) -> Result<Self, Self::Error> {
        Username::new(email.as_str())
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for Username {
    /// Creates a new username from a hardcoded string, which must be valid.
    fn from(name: &'static str) -> Self {
        Username::new(name).expect("Hardcoded usernames must be valid")
    }
}

/// A deserialization visitor for a `Username`.
struct UsernameVisitor;

impl Visitor<'_> for UsernameVisitor {
    type Value = Username;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Username::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Username::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(UsernameVisitor)
    }
}
