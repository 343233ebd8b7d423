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


//! Business logic for the library.

use bibliotheca_authn::policy::PasswordPolicy;
use bibliotheca_core::db::{Db, DbError};
use bibliotheca_core::driver::DriverError;
use std::sync::Arc;

mod books;
mod credentials;
pub(crate) use credentials::DbCredentialStore;
mod health;
mod seed;
#[cfg(test)]
pub(crate) mod testutils;
mod users;

/// Converts a `DbError::NotFound` into a driver error carrying `message`, and any other error
/// into its natural driver counterpart.
fn map_not_found<S: Into<String>>(message: S) -> impl FnOnce(DbError) -> DriverError {
    move |e| match e {
        DbError::NotFound => DriverError::NotFound(message.into()),
        e => DriverError::from(e),
    }
}

/// Business logic.
///
/// The public operations of the driver consume it so that each runs inside its own transaction.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Rules that new passwords must follow.
    policy: PasswordPolicy,

    /// Cost of the bcrypt hashes computed for new passwords.
    bcrypt_cost: u32,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        policy: PasswordPolicy,
        bcrypt_cost: u32,
    ) -> Self {
        Self { db, policy, bcrypt_cost }
    }
}
