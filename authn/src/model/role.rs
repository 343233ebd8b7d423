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

//! The `Role` data type.

use bibliotheca_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Prefix that some clients put in front of role names and that we never store.
const ROLE_PREFIX: &str = "ROLE_";

/// Maximum length of a role name.
const MAX_ROLE_LENGTH: usize = 64;

/// A named grant held by a user.
///
/// Role names are kept without the `ROLE_` prefix.  Any name made of letters, digits and
/// underscores is accepted, not only the well-known ones.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Regular users of the library: they can borrow and return books.
    pub const LIBRARY_USER: &'static str = "LIBRARY_USER";

    /// Curators of the library: they can manage the book catalog.
    pub const LIBRARY_CURATOR: &'static str = "LIBRARY_CURATOR";

    /// Administrators of the library: they can manage users.
    pub const LIBRARY_ADMIN: &'static str = "LIBRARY_ADMIN";

    /// Operators: they can access the management endpoints.
    pub const LIBRARY_ACTUATOR: &'static str = "LIBRARY_ACTUATOR";

    /// Creates a new role from an untrusted string `s`, stripping the `ROLE_` prefix if present.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let name = s.strip_prefix(ROLE_PREFIX).unwrap_or(&s);

        if name.is_empty() {
            return Err(ModelError("Role cannot be empty".to_owned()));
        }
        if name.len() > MAX_ROLE_LENGTH {
            return Err(ModelError("Role is too long".to_owned()));
        }
        if let Some(ch) = name.chars().find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_')) {
            return Err(ModelError(format!("Unsupported character '{}' in role '{}'", ch, s)));
        }

        Ok(Self(name.to_owned()))
    }

    /// Returns a string view of the role name, without prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Role {
    /// Creates a role from a hardcoded name, which must be valid.
    fn from(name: &'static str) -> Self {
        match Role::new(name) {
            Ok(role) => role,
            Err(e) => panic!("Hardcoded roles must be valid: {}", e),
        }
    }
}

/// A deserialization visitor for a `Role`.
struct RoleVisitor;

impl Visitor<'_> for RoleVisitor {
    type Value = Role;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a role name")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Role::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(RoleVisitor)
    }
}
