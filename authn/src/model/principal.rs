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

//! The `Principal` data type.

use crate::model::Role;
use bibliotheca_core::model::Username;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The authenticated caller of a request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Principal {
    /// Login name of the caller.
    username: Username,

    /// Roles granted to the caller.
    roles: BTreeSet<Role>,
}

impl Principal {
    /// Creates a new principal for `username` holding `roles`.
    pub fn new(username: Username, roles: BTreeSet<Role>) -> Self {
        Self { username, roles }
    }

    /// Returns the login name of the caller.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the roles granted to the caller.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Checks if the caller holds the role named `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}
