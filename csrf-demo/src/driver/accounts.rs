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


//! The account that signs into the registry.

use bibliotheca_authn::driver::{Credentials, MemoryCredentialStore};
use bibliotheca_authn::model::Password;
use bibliotheca_core::driver::DriverResult;
use bibliotheca_core::model::Username;
use std::collections::BTreeSet;

/// Builds a credential store that only knows the account `username` with `password`.
pub(crate) async fn single_account_store(
    username: &str,
    password: Password,
    bcrypt_cost: u32,
) -> DriverResult<MemoryCredentialStore> {
    let credentials = Credentials {
        username: Username::new(username)?,
        hash: password.hash(bcrypt_cost)?,
        roles: BTreeSet::new(),
    };

    let store = MemoryCredentialStore::default();
    store.insert(credentials).await;
    Ok(store)
}
