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


//! Initial contents of an empty library.

use crate::db;
use crate::driver::Driver;
use crate::model::{Book, Isbn, User};
use bibliotheca_authn::model::{Password, Role};
use bibliotheca_core::driver::DriverResult;
use bibliotheca_core::model::EmailAddress;
use log::info;
use std::collections::BTreeSet;
use uuid::{Uuid, uuid};

/// Password shared by all seeded users.
pub(crate) const SEED_PASSWORD: &str = "Library4Secret!";

/// Seeded users: identifier, first name, last name, email, role and whether the password is
/// stored with the legacy hash scheme.
const USERS: &[(Uuid, &str, &str, &str, &str, bool)] = &[
    (
        uuid!("c47641ee-2c44-4b32-a97d-a5a6d4f1c8b8"),
        "Bruce",
        "Wayne",
        "bruce.wayne@example.com",
        Role::LIBRARY_USER,
        true,
    ),
    (
        uuid!("69b1dbb4-b14f-4b02-85e5-9b6f3d2a48d2"),
        "Bruce",
        "Banner",
        "bruce.banner@example.com",
        Role::LIBRARY_USER,
        false,
    ),
    (
        uuid!("0f7c5b39-33a5-4c6e-9e53-8f5b1e9f0d34"),
        "Peter",
        "Parker",
        "peter.parker@example.com",
        Role::LIBRARY_CURATOR,
        false,
    ),
    (
        uuid!("40c5ad0e-1f5a-4f72-8b6c-2a0c9cb7c6a1"),
        "Clark",
        "Kent",
        "clark.kent@example.com",
        Role::LIBRARY_ADMIN,
        false,
    ),
    (
        uuid!("a1d2e6f4-7f0c-4c09-b3a4-6a2b9f4e7d15"),
        "Carol",
        "Danvers",
        "carol.danvers@example.com",
        Role::LIBRARY_ACTUATOR,
        false,
    ),
];

/// Seeded books: identifier, ISBN, title, description, authors and the index into `USERS` of the
/// borrower.
const BOOKS: &[(Uuid, &str, &str, &str, &[&str], Option<usize>)] = &[
    (
        uuid!("f9bf70d6-e56d-4cab-be2b-e2f1b2ea3ae9"),
        "9780132350884",
        "Clean Code",
        "Even bad code can function. But if code isn't clean, it can bring a development \
            organization to its knees.",
        &["Robert C. Martin", "Dean Wampler"],
        Some(0),
    ),
    (
        uuid!("3038627d-627e-448d-8422-0a5705c9e8f1"),
        "9781449374648",
        "Cloud Native Java",
        "What separates the traditional enterprise from the likes of Amazon, Netflix, and Etsy? \
            Those companies have refined the art of cloud native development.",
        &["Josh Long", "Kenny Bastani"],
        None,
    ),
    (
        uuid!("081314cb-4abf-43e5-9b38-7d5261edf10b"),
        "9781617294945",
        "Spring in Action",
        "Spring in Action, 5th Edition is the fully updated revision of Manning's bestselling \
            Spring in Action.",
        &["Craig Walls"],
        None,
    ),
    (
        uuid!("02c3d1fa-3f96-4b6b-9c4a-5c8a8a1c6b5e"),
        "9781430239451",
        "DevOps for Developers",
        "DevOps for Developers delivers a practical, thorough introduction to approaches, \
            processes and tools to foster collaboration between software development and \
            operations.",
        &["Michael Hüttermann"],
        None,
    ),
];

impl Driver {
    /// Populates the database with sample users and books if it has no users yet.
    ///
    /// Returns whether any data was added.
    pub(crate) async fn seed(self) -> DriverResult<bool> {
        let mut tx = self.db.begin().await?;
        if !db::get_users(tx.ex()).await?.is_empty() {
            info!("Database already contains users; skipping seed data");
            return Ok(false);
        }

        let mut users = Vec::with_capacity(USERS.len());
        for (identifier, first_name, last_name, email, role, legacy) in USERS {
            let password = Password::new(SEED_PASSWORD)?;
            let password =
                if *legacy { password.hash_legacy() } else { password.hash(self.bcrypt_cost)? };
            let user = User::new(
                *identifier,
                (*first_name).to_owned(),
                (*last_name).to_owned(),
                EmailAddress::new(*email)?,
                password,
                BTreeSet::from([Role::new(*role)?]),
            );
            db::create_user(tx.ex(), &user).await?;
            users.push(user);
        }

        for (identifier, isbn, title, description, authors, borrower) in BOOKS {
            let book = Book::new(
                *identifier,
                Isbn::new(*isbn)?,
                (*title).to_owned(),
                (*description).to_owned(),
                authors.iter().map(|a| (*a).to_owned()).collect(),
                None,
            );
            db::create_book(tx.ex(), &book).await?;
            if let Some(i) = borrower {
                db::borrow_book(tx.ex(), *identifier, *users[*i].identifier()).await?;
            }
        }

        tx.commit().await?;
        info!("Created {} users and {} books", USERS.len(), BOOKS.len());
        Ok(true)
    }
}
