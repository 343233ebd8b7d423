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


//! Data types for the library.

use bibliotheca_authn::model::{HashedPassword, Role};
use bibliotheca_core::model::{EmailAddress, ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::{AsRef, Constructor};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Number of digits in an ISBN.
pub(crate) const ISBN_LENGTH: usize = 13;

/// The ISBN-13 of a book, kept as its digits without separators.
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
pub(crate) struct Isbn(String);

impl Isbn {
    /// Creates a new ISBN from an untrusted string `s`, making sure it has exactly 13 digits.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.chars().count() != ISBN_LENGTH || !s.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ModelError(format!("Invalid ISBN '{}'", s)));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the ISBN.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered user of the library.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct User {
    /// Public identifier of the user.
    identifier: Uuid,

    /// Given name.
    first_name: String,

    /// Family name.
    last_name: String,

    /// Email address, which doubles as the login name.
    email: EmailAddress,

    /// Hash of the password, tagged with its scheme.
    password: HashedPassword,

    /// Roles granted to the user.
    roles: BTreeSet<Role>,
}

impl User {
    /// Replaces the roles of the user with `roles`.
    pub(crate) fn with_roles(mut self, roles: BTreeSet<Role>) -> Self {
        self.roles = roles;
        self
    }
}

/// A book in the library's catalog.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Book {
    /// Public identifier of the book.
    identifier: Uuid,

    /// ISBN of the book.
    isbn: Isbn,

    /// Title of the book.
    title: String,

    /// Text describing the book.
    description: String,

    /// Names of the authors.  Never empty for books created via the API.
    authors: BTreeSet<String>,

    /// The user that currently holds the book, if any.
    borrowed_by: Option<User>,
}

impl Book {
    /// Returns true if nobody holds the book.
    pub(crate) fn is_available(&self) -> bool {
        self.borrowed_by.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_ok() {
        assert_eq!("9780132350884", Isbn::new("9780132350884").unwrap().as_str());
    }

    #[test]
    fn test_isbn_errors() {
        for raw in ["", "978013235088", "97801323508845", "978-013235088", "97801323508a4"] {
            assert_eq!(
                ModelError(format!("Invalid ISBN '{}'", raw)),
                Isbn::new(raw).unwrap_err(),
                "Input was {}",
                raw
            );
        }
    }

    #[test]
    fn test_isbn_rejects_non_ascii_digits() {
        Isbn::new("٩٧٨٠١٣٢٣٥٠٨٨٤").unwrap_err();
    }
}
