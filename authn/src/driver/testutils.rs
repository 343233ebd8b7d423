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

//! Utilities to help testing services that integrate with the `authn` features.

use crate::driver::{
    AuthnDriver, AuthnOptions, CredentialStore, Credentials, MemoryCredentialStore,
};
use crate::model::{HashedPassword, Password, Role};
use bibliotheca_core::model::Username;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Cheap bcrypt cost to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Realm used by tests.
pub const TEST_REALM: &str = "the-realm";

/// Converts the `roles` names into a set of roles.
fn to_roles(roles: &[&'static str]) -> BTreeSet<Role> {
    roles.iter().map(|r| Role::from(*r)).collect()
}

/// State of a running test.
pub struct TestContext {
    /// Accounts known to the driver.
    store: Arc<MemoryCredentialStore>,

    /// The driver to handle authentication flows.
    driver: AuthnDriver,
}

impl TestContext {
    /// Initializes the driver with an empty in-memory credential store.
    pub async fn setup() -> Self {
        Self::setup_with_opts(AuthnOptions::default()).await
    }

    /// Initializes the driver with an empty in-memory credential store and custom `opts`.
    ///
    /// The bcrypt cost is always lowered to keep tests fast.
    pub async fn setup_with_opts(opts: AuthnOptions) -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        let opts = AuthnOptions { bcrypt_cost: TEST_BCRYPT_COST, ..opts };
        let store = Arc::from(MemoryCredentialStore::default());
        let driver = AuthnDriver::new(store.clone(), TEST_REALM, opts);
        Self { store, driver }
    }

    /// Stores an account with an arbitrary `hash`.
    pub async fn set_raw_hash(
        &self,
        username: &'static str,
        hash: HashedPassword,
        roles: &[&'static str],
    ) {
        let credentials =
            Credentials { username: Username::from(username), hash, roles: to_roles(roles) };
        self.store.insert(credentials).await;
    }

    /// Creates an account with a password hashed under the current scheme.
    pub async fn create_user(
        &self,
        username: &'static str,
        password: &'static str,
        roles: &[&'static str],
    ) {
        let hash = Password::from(password).hash(TEST_BCRYPT_COST).unwrap();
        self.set_raw_hash(username, hash, roles).await;
    }

    /// Creates an account with a password hashed under the legacy scheme.
    pub async fn create_legacy_user(
        &self,
        username: &'static str,
        password: &'static str,
        roles: &[&'static str],
    ) {
        let hash = Password::from(password).hash_legacy();
        self.set_raw_hash(username, hash, roles).await;
    }

    /// Returns the stored hash of the account `username`, which must exist.
    pub async fn hash_of(&self, username: &'static str) -> HashedPassword {
        self.store.get_credentials(&Username::from(username)).await.unwrap().unwrap().hash
    }

    /// Gets a copy of the driver in this test context.
    pub fn driver(&self) -> AuthnDriver {
        self.driver.clone()
    }
}
