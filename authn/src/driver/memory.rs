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

//! In-memory implementation of the `CredentialStore`.

use crate::driver::{CredentialStore, Credentials};
use crate::model::HashedPassword;
use async_trait::async_trait;
use bibliotheca_core::driver::{DriverError, DriverResult};
use bibliotheca_core::model::Username;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Credential store that keeps a fixed set of accounts in memory.
///
/// Useful for apps that do not manage users of their own.
#[derive(Default)]
pub struct MemoryCredentialStore {
    /// Accounts keyed by their login name.
    accounts: Mutex<HashMap<Username, Credentials>>,
}

impl MemoryCredentialStore {
    /// Adds or replaces the account described by `credentials`.
    pub async fn insert(&self, credentials: Credentials) {
        let mut accounts = self.accounts.lock().await;
        accounts.insert(credentials.username.clone(), credentials);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_credentials(&self, username: &Username) -> DriverResult<Option<Credentials>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(username).cloned())
    }

    async fn upgrade_password(
        &self,
        username: &Username,
        hash: HashedPassword,
    ) -> DriverResult<()> {
        let mut accounts = self.accounts.lock().await;
        match accounts.get_mut(username) {
            Some(credentials) => {
                credentials.hash = hash;
                Ok(())
            }
            None => Err(DriverError::NotFound(format!("No user found for {}", username.as_str()))),
        }
    }
}
