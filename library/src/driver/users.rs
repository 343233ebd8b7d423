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


//! Operations on the registered users.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::User;
use bibliotheca_authn::model::{HashedPassword, Password, Role};
use bibliotheca_core::db::DbError;
use bibliotheca_core::driver::{DriverError, DriverResult};
use bibliotheca_core::model::{EmailAddress, Username};
use log::info;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Message returned when a user does not exist.
const USER_NOT_FOUND: &str = "User not found";

/// Converts a `DbError::AlreadyExists` raised while storing a user into a descriptive error.
fn map_email_taken(email: &EmailAddress) -> impl FnOnce(DbError) -> DriverError + '_ {
    move |e| match e {
        DbError::AlreadyExists => DriverError::AlreadyExists(format!(
            "User with email {} already exists",
            email.as_str()
        )),
        e => map_not_found(USER_NOT_FOUND)(e),
    }
}

impl Driver {
    /// Checks `password` against the policy, using `email` as the login name, and hashes it.
    fn hash_new_password(
        &self,
        email: &EmailAddress,
        password: Password,
    ) -> DriverResult<HashedPassword> {
        let username = Username::try_from(email)?;
        self.policy.validate(&username, &password)?;
        Ok(password.hash(self.bcrypt_cost)?)
    }

    /// Registers a new user.  The `password` must satisfy the password policy.
    pub(crate) async fn create_user(
        self,
        first_name: String,
        last_name: String,
        email: EmailAddress,
        password: Password,
        roles: BTreeSet<Role>,
    ) -> DriverResult<User> {
        let hash = self.hash_new_password(&email, password)?;
        let user = User::new(Uuid::new_v4(), first_name, last_name, email, hash, roles);

        let mut tx = self.db.begin().await?;
        db::create_user(tx.ex(), &user).await.map_err(map_email_taken(user.email()))?;
        tx.commit().await?;

        info!("Created user {} with email {}", user.identifier(), user.email().as_str());
        Ok(user)
    }

    /// Gets all registered users.
    pub(crate) async fn get_users(self) -> DriverResult<Vec<User>> {
        let mut tx = self.db.begin().await?;
        let users = db::get_users(tx.ex()).await?;
        tx.commit().await?;
        Ok(users)
    }

    /// Gets the user with `identifier`.
    pub(crate) async fn get_user(self, identifier: Uuid) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let user =
            db::get_user(tx.ex(), identifier).await.map_err(map_not_found(USER_NOT_FOUND))?;
        tx.commit().await?;
        Ok(user)
    }

    /// Replaces all attributes of the user with `identifier`.
    ///
    /// If `password` is exactly the stored hash, the stored hash is kept as is and the password
    /// policy is not consulted.  Otherwise `password` is a new plaintext password that must
    /// satisfy the policy.
    pub(crate) async fn update_user(
        self,
        identifier: Uuid,
        first_name: String,
        last_name: String,
        email: EmailAddress,
        password: String,
        roles: BTreeSet<Role>,
    ) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let current =
            db::get_user(tx.ex(), identifier).await.map_err(map_not_found(USER_NOT_FOUND))?;

        let hash = if password == current.password().as_str() {
            current.password().clone()
        } else {
            self.hash_new_password(&email, Password::new(password)?)?
        };

        let user = User::new(identifier, first_name, last_name, email, hash, roles);
        db::update_user(tx.ex(), &user).await.map_err(map_email_taken(user.email()))?;
        tx.commit().await?;

        info!("Updated user {}", identifier);
        Ok(user)
    }

    /// Deletes the user with `identifier`.  Any books they hold become available.
    pub(crate) async fn delete_user(self, identifier: Uuid) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::delete_user(tx.ex(), identifier).await.map_err(map_not_found(USER_NOT_FOUND))?;
        tx.commit().await?;

        info!("Deleted user {}", identifier);
        Ok(())
    }
}
