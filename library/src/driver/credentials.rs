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


//! Access to the credentials of the library users for the authentication layer.

use crate::db;
use crate::driver::map_not_found;
use async_trait::async_trait;
use bibliotheca_authn::driver::{CredentialStore, Credentials};
use bibliotheca_authn::model::HashedPassword;
use bibliotheca_core::db::{Db, DbError};
use bibliotheca_core::driver::DriverResult;
use bibliotheca_core::model::{EmailAddress, Username};
use std::sync::Arc;

/// Credential store backed by the `users` table, where login names are email addresses.
pub(crate) struct DbCredentialStore {
    /// The database holding the users.
    db: Arc<dyn Db + Send + Sync>,
}

impl DbCredentialStore {
    /// Creates a new store backed by `db`.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn get_credentials(&self, username: &Username) -> DriverResult<Option<Credentials>> {
        let Ok(email) = EmailAddress::new(username.as_str()) else {
            return Ok(None);
        };

        let mut tx = self.db.begin().await?;
        let user = match db::get_user_by_email(tx.ex(), &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        Ok(Some(Credentials {
            username: username.clone(),
            hash: user.password().clone(),
            roles: user.roles().clone(),
        }))
    }

    async fn upgrade_password(
        &self,
        username: &Username,
        hash: HashedPassword,
    ) -> DriverResult<()> {
        let email = EmailAddress::new(username.as_str())?;

        let mut tx = self.db.begin().await?;
        db::update_user_password(tx.ex(), &email, &hash)
            .await
            .map_err(map_not_found(format!("No user found for {}", username.as_str())))?;
        tx.commit().await?;
        Ok(())
    }
}
