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

//! Extends the driver with the `authenticate` method.

use crate::driver::AuthnDriver;
use crate::model::{HashedPassword, Password, Principal};
use bibliotheca_core::driver::{DriverError, DriverResult};
use bibliotheca_core::model::Username;
use log::{debug, info, warn};

/// Password whose hash stands in for the credentials of unknown accounts.
const DUMMY_PASSWORD: &str = "unknown!Account0";

impl AuthnDriver {
    /// Returns a hash of `DUMMY_PASSWORD` computed with the configured cost.
    async fn dummy_hash(&self) -> DriverResult<&HashedPassword> {
        let cost = self.opts.bcrypt_cost;
        let hash = self
            .dummy_hash
            .get_or_try_init(|| async move {
                Password::new(DUMMY_PASSWORD).and_then(|password| password.hash(cost))
            })
            .await?;
        Ok(hash)
    }

    /// Checks the `password` of the account `username` and returns its principal.
    ///
    /// If the stored hash was produced by an outdated encoder, the password is hashed again with
    /// the current one now that we know its plaintext.
    pub async fn authenticate(
        self,
        username: Username,
        password: Password,
    ) -> DriverResult<Principal> {
        let credentials = match self.store.get_credentials(&username).await? {
            Some(credentials) => credentials,
            None => {
                // Rejecting an unknown account must cost as much as rejecting a bad password.
                let _ = password.verify(self.dummy_hash().await?);
                let message = format!("No user found for {}", username.as_str());
                debug!("Authentication failed: {}", message);
                return Err(DriverError::NotFound(message));
            }
        };

        let matches = match password.verify(&credentials.hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Cannot verify password of {}: {}", username.as_str(), e);
                false
            }
        };
        if !matches {
            debug!("Authentication failed: bad password for {}", username.as_str());
            return Err(DriverError::Unauthorized("Bad credentials".to_owned()));
        }

        if credentials.hash.needs_upgrade() {
            let hash = password.hash(self.opts.bcrypt_cost)?;
            self.store.upgrade_password(&username, hash).await?;
            info!("Upgraded password encoding of {}", username.as_str());
        }

        Ok(Principal::new(credentials.username, credentials.roles))
    }
}
