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

//! Business logic for user authentication and sessions.

use crate::model::{HashedPassword, Role};
use async_session::MemoryStore;
use async_trait::async_trait;
use bibliotheca_core::driver::DriverResult;
use bibliotheca_core::env::get_optional_var;
use bibliotheca_core::model::Username;
use derivative::Derivative;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

mod authenticate;
mod memory;
pub use memory::MemoryCredentialStore;
mod sessions;
pub use sessions::{Session, session_csrf_token, session_principal};
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Default value for the `BCRYPT_COST` setting when not specified.
const DEFAULT_BCRYPT_COST: u32 = crate::model::DEFAULT_BCRYPT_COST;

/// Default value for the `SESSION_MAX_AGE_SECONDS` setting when not specified.
const DEFAULT_SESSION_MAX_AGE_SECONDS: u64 = 30 * 60;

/// Configuration options for the authentication driver.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct AuthnOptions {
    /// Cost of the bcrypt hashes computed for new and upgraded passwords.
    pub bcrypt_cost: u32,

    /// The amount of time a session stays valid since its last use.
    pub session_max_age: Duration,

    /// Whether the session cookie should only travel over HTTPS.
    pub cookie_secure: bool,
}

impl Default for AuthnOptions {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECONDS),
            cookie_secure: false,
        }
    }
}

impl AuthnOptions {
    /// Creates a new set of options from environment variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            bcrypt_cost: get_optional_var::<u32>(prefix, "BCRYPT_COST")?
                .unwrap_or(DEFAULT_BCRYPT_COST),
            session_max_age: Duration::from_secs(
                get_optional_var::<u64>(prefix, "SESSION_MAX_AGE_SECONDS")?
                    .unwrap_or(DEFAULT_SESSION_MAX_AGE_SECONDS),
            ),
            cookie_secure: get_optional_var::<bool>(prefix, "SESSION_COOKIE_SECURE")?
                .unwrap_or(false),
        })
    }
}

/// Stored credentials of an account.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    /// Login name of the account.
    pub username: Username,

    /// Hash of the password of the account, tagged with its scheme.
    pub hash: HashedPassword,

    /// Roles granted to the account.
    pub roles: BTreeSet<Role>,
}

/// Access to the accounts of an app.
///
/// Every app keeps its users in its own way, so the authentication logic reaches them through this
/// trait.
#[async_trait]
pub trait CredentialStore {
    /// Looks up the credentials of the account `username`, if it exists.
    async fn get_credentials(&self, username: &Username) -> DriverResult<Option<Credentials>>;

    /// Replaces the password hash of the account `username` with `hash`, leaving every other
    /// attribute untouched.
    async fn upgrade_password(&self, username: &Username, hash: HashedPassword)
    -> DriverResult<()>;
}

/// Business logic.
///
/// Operations that modify state consume the driver in an attempt to minimize the possibility of
/// executing two of them on the same copy.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct AuthnDriver {
    /// Accounts of the app.
    store: Arc<dyn CredentialStore + Send + Sync>,

    /// Sessions of the logged in users.
    sessions: MemoryStore,

    /// Authentication realm to return to requests.
    realm: &'static str,

    /// Options for the authentication driver.
    opts: AuthnOptions,

    /// Hash checked against when the account is unknown, computed on first use.
    dummy_hash: Arc<OnceCell<HashedPassword>>,
}

impl AuthnDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        store: Arc<dyn CredentialStore + Send + Sync>,
        realm: &'static str,
        opts: AuthnOptions,
    ) -> Self {
        Self {
            store,
            sessions: MemoryStore::new(),
            realm,
            opts,
            dummy_hash: Arc::from(OnceCell::new()),
        }
    }

    /// Returns a reference to the authentication options provided at creation time.
    pub fn opts(&self) -> &AuthnOptions {
        &self.opts
    }

    /// Gets the authentication realm.
    pub fn realm(&self) -> &'static str {
        self.realm
    }
}
