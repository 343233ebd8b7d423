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


//! Wire representations of the library entities.
//!
//! Every user-controlled string leaves the service through `escaping::sanitize`.  Request types
//! validate their fields and report problems the way clients already parse them.

use crate::model::{Book, Isbn, User};
use bibliotheca_authn::model::Role;
use bibliotheca_core::model::{
    EmailAddress, FieldErrors, ModelResult, field_error, validate_size, validate_text,
};
use bibliotheca_core::rest::BaseUrls;
use bibliotheca_core::rest::escaping::{sanitize, sanitize_all};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Placeholder in the templated borrow and return links.
const USER_IDENTIFIER_TEMPLATE: &str = "{userIdentifier}";

/// A hypermedia link.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Link {
    /// Target of the link.
    pub(crate) href: String,

    /// Set when `href` contains placeholders that the client must fill in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) templated: Option<bool>,
}

impl Link {
    /// Creates a plain link to `path` within the service.
    pub(crate) fn to(base_urls: &BaseUrls, path: &str) -> Self {
        Self { href: base_urls.make_backend_href(path), templated: None }
    }

    /// Creates a link to `path` followed by the user identifier placeholder.
    fn templated_on_user(base_urls: &BaseUrls, path: &str) -> Self {
        let href = format!("{}/{}", base_urls.make_backend_href(path), USER_IDENTIFIER_TEMPLATE);
        Self { href, templated: Some(true) }
    }
}

/// Links of a collection or of an entity without extra relations.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct SelfLinks {
    /// Link to the resource itself.
    #[serde(rename = "self")]
    pub(crate) this: Link,
}

/// Links of a book.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct BookLinks {
    /// Link to the book itself.
    #[serde(rename = "self")]
    pub(crate) this: Link,

    /// Templated link to borrow the book.
    pub(crate) borrow: Link,

    /// Templated link to return the book.
    #[serde(rename = "return")]
    pub(crate) giveback: Link,
}

/// Public view of a user.  Never carries the password hash.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserModel {
    /// Public identifier.
    pub(crate) identifier: Uuid,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Email address, which is also the login name.
    pub(crate) email: String,

    /// Names of the granted roles.
    pub(crate) roles: BTreeSet<String>,

    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub(crate) links: SelfLinks,
}

impl UserModel {
    /// Builds the public view of `user`.
    pub(crate) fn new(user: &User, base_urls: &BaseUrls) -> Self {
        let path = format!("users/{}", user.identifier());
        Self {
            identifier: *user.identifier(),
            first_name: sanitize(user.first_name()),
            last_name: sanitize(user.last_name()),
            email: sanitize(user.email().as_str()),
            roles: user.roles().iter().map(|r| sanitize(r.as_str())).collect(),
            links: SelfLinks { this: Link::to(base_urls, &path) },
        }
    }
}

/// Public view of a book.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookModel {
    /// Public identifier.
    pub(crate) identifier: Uuid,

    /// ISBN-13 digits.
    pub(crate) isbn: String,

    /// Title of the book.
    pub(crate) title: String,

    /// Summary of the contents.
    pub(crate) description: String,

    /// Names of the authors.
    pub(crate) authors: BTreeSet<String>,

    /// The user that holds the book, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) borrowed_by_user: Option<UserModel>,

    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub(crate) links: BookLinks,
}

impl BookModel {
    /// Builds the public view of `book`.
    pub(crate) fn new(book: &Book, base_urls: &BaseUrls) -> Self {
        let path = format!("books/{}", book.identifier());
        Self {
            identifier: *book.identifier(),
            isbn: sanitize(book.isbn().as_str()),
            title: sanitize(book.title()),
            description: sanitize(book.description()),
            authors: sanitize_all(book.authors()).into_iter().collect(),
            borrowed_by_user: book.borrowed_by().as_ref().map(|u| UserModel::new(u, base_urls)),
            links: BookLinks {
                this: Link::to(base_urls, &path),
                borrow: Link::templated_on_user(base_urls, &format!("{}/borrow", path)),
                giveback: Link::templated_on_user(base_urls, &format!("{}/return", path)),
            },
        }
    }
}

/// Embedded list of books.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct BooksResponse {
    /// The books in the catalog.
    pub(crate) books: Vec<BookModel>,

    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub(crate) links: SelfLinks,
}

impl BooksResponse {
    /// Builds the response for the `books` collection.
    pub(crate) fn new(books: &[Book], base_urls: &BaseUrls) -> Self {
        Self {
            books: books.iter().map(|b| BookModel::new(b, base_urls)).collect(),
            links: SelfLinks { this: Link::to(base_urls, "books") },
        }
    }
}

/// Embedded list of users.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct UsersResponse {
    /// The registered users.
    pub(crate) users: Vec<UserModel>,

    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub(crate) links: SelfLinks,
}

impl UsersResponse {
    /// Builds the response for the `users` collection.
    pub(crate) fn new(users: &[User], base_urls: &BaseUrls) -> Self {
        Self {
            users: users.iter().map(|u| UserModel::new(u, base_urls)).collect(),
            links: SelfLinks { this: Link::to(base_urls, "users") },
        }
    }
}

/// Name of the book request object in validation errors.
const BOOK_REQUEST: &str = "bookRequest";

/// Catalog details of a book as sent by clients.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct BookRequest {
    /// ISBN-13 digits.
    pub(crate) isbn: String,

    /// Title of the book.
    pub(crate) title: String,

    /// Summary of the contents.
    pub(crate) description: String,

    /// Names of the authors.
    pub(crate) authors: BTreeSet<String>,
}

/// Validated contents of a `BookRequest`.
pub(crate) struct ValidBook {
    /// ISBN-13 digits.
    pub(crate) isbn: Isbn,

    /// Title of the book.
    pub(crate) title: String,

    /// Summary of the contents.
    pub(crate) description: String,

    /// Names of the authors.
    pub(crate) authors: BTreeSet<String>,
}

impl BookRequest {
    /// Checks every field and returns the values ready for the driver.
    ///
    /// All invalid fields are reported, not just the first one.
    pub(crate) fn validate(self) -> ModelResult<ValidBook> {
        let parse_isbn = || {
            Isbn::new(self.isbn.as_str()).map_err(|_| {
                field_error(BOOK_REQUEST, "isbn", &self.isbn, "must match \"[0-9]{13}\"")
            })
        };

        let mut errors = FieldErrors::default();
        errors.check(parse_isbn());
        errors.check(validate_size(BOOK_REQUEST, "title", &self.title, 1, 255));
        errors.check(validate_size(BOOK_REQUEST, "description", &self.description, 1, 2000));
        if self.authors.is_empty() {
            errors.push(field_error(BOOK_REQUEST, "authors", "[]", "must not be empty"));
        }
        for author in &self.authors {
            errors.check(validate_text(BOOK_REQUEST, "authors", author, 255));
        }
        errors.into_result()?;

        let isbn = parse_isbn()?;
        Ok(ValidBook {
            isbn,
            title: self.title,
            description: self.description,
            authors: self.authors,
        })
    }
}

/// Name of the user request object in validation errors.
const USER_REQUEST: &str = "userRequest";

/// Attributes of a user as sent by clients.
///
/// The password is a plaintext password except on updates, where the stored hash can be sent
/// back verbatim to keep it.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRequest {
    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Email address, which is also the login name.
    pub(crate) email: String,

    /// Password as sent by the client.
    pub(crate) password: String,

    /// Names of the granted roles.
    pub(crate) roles: BTreeSet<Role>,
}

/// Validated contents of a `UserRequest`.
pub(crate) struct ValidUser {
    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,

    /// Email address, which is also the login name.
    pub(crate) email: EmailAddress,

    /// Password as sent by the client.
    pub(crate) password: String,

    /// Names of the granted roles.
    pub(crate) roles: BTreeSet<Role>,
}

impl UserRequest {
    /// Checks every field and returns the values ready for the driver.
    ///
    /// All invalid fields are reported, not just the first one.
    pub(crate) fn validate(self) -> ModelResult<ValidUser> {
        let parse_email = || {
            let reason = "must be a well-formed email address";
            EmailAddress::new(self.email.as_str())
                .map_err(|_| field_error(USER_REQUEST, "email", &self.email, reason))
        };

        let mut errors = FieldErrors::default();
        errors.check(validate_size(USER_REQUEST, "firstName", &self.first_name, 1, 50));
        errors.check(validate_size(USER_REQUEST, "lastName", &self.last_name, 1, 50));
        errors.check(parse_email());
        if self.password.trim().is_empty() {
            errors.push(field_error(USER_REQUEST, "password", "", "must not be blank"));
        }
        errors.into_result()?;

        let email = parse_email()?;
        Ok(ValidUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            password: self.password,
            roles: self.roles,
        })
    }
}
