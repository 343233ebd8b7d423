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


//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::{Book, Isbn, User};
use bibliotheca_authn::model::{Password, Role};
use bibliotheca_authn::policy::PasswordPolicy;
use bibliotheca_authn::wordlist::WordList;
use bibliotheca_core::db::Db;
use bibliotheca_core::db::sqlite::testutils;
use bibliotheca_core::model::EmailAddress;
use std::sync::Arc;
use uuid::Uuid;

pub(crate) use bibliotheca_authn::driver::testutils::TEST_BCRYPT_COST;

/// Password given to the users created by `TestContext::create_user`.
pub(crate) const TEST_PASSWORD: &str = "my!Secret4test";

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    driver: Driver,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::new(testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let policy = PasswordPolicy::new(Arc::from(WordList::bundled()));
        let driver = Driver::new(db.clone(), policy, TEST_BCRYPT_COST);
        Self { db, driver }
    }

    pub(crate) fn db(&self) -> Arc<dyn Db + Send + Sync> {
        self.db.clone()
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Stores a user named after `email` with `TEST_PASSWORD` and the given `roles`.
    pub(crate) async fn create_user(&self, email: &'static str, roles: &[&'static str]) -> User {
        let user = User::new(
            Uuid::new_v4(),
            "Bruce".to_owned(),
            "Wayne".to_owned(),
            EmailAddress::from(email),
            Password::from(TEST_PASSWORD).hash(TEST_BCRYPT_COST).unwrap(),
            roles.iter().map(|r| Role::from(*r)).collect(),
        );
        db::create_user(&mut self.db.ex().await.unwrap(), &user).await.unwrap();
        user
    }

    /// Stores an available book with the given `title` and `authors`.
    pub(crate) async fn create_book(&self, title: &str, authors: &[&str]) -> Book {
        let book = Book::new(
            Uuid::new_v4(),
            Isbn::new("9780132350884").unwrap(),
            title.to_owned(),
            "A handbook".to_owned(),
            authors.iter().map(|a| (*a).to_owned()).collect(),
            None,
        );
        db::create_book(&mut self.db.ex().await.unwrap(), &book).await.unwrap();
        book
    }

    pub(crate) async fn get_book(&self, identifier: Uuid) -> Book {
        db::get_book(&mut self.db.ex().await.unwrap(), identifier).await.unwrap()
    }

    pub(crate) async fn get_user(&self, identifier: Uuid) -> User {
        db::get_user(&mut self.db.ex().await.unwrap(), identifier).await.unwrap()
    }
}
