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


//! Operations on the catalog of books, including borrowing and returning them.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::{Book, Isbn};
use bibliotheca_core::db::Executor;
use bibliotheca_core::driver::{DriverError, DriverResult};
use log::{Level, debug, info, log_enabled};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Message returned when a book does not exist.
const BOOK_NOT_FOUND: &str = "Book not found";

/// Message returned for every rejected borrow or return, whatever the cause.
const TRANSITION_FAILED: &str = "Not found";

/// Builds the error for a borrow or return of `book` by `user` that did not modify anything.
///
/// `unavailable` describes the failure when both entities exist.  The cause only goes to the debug
/// log and is only looked up when that log is enabled.
async fn failed_transition(
    ex: &mut Executor,
    action: &'static str,
    book: Uuid,
    user: Uuid,
    unavailable: &'static str,
) -> DriverError {
    if log_enabled!(Level::Debug) {
        let reason = if db::get_book(ex, book).await.is_err() {
            "book not found"
        } else if db::get_user(ex, user).await.is_err() {
            "user not found"
        } else {
            unavailable
        };
        debug!("Cannot {} book {} for user {}: {}", action, book, user, reason);
    }
    DriverError::NotFound(TRANSITION_FAILED.to_owned())
}

impl Driver {
    /// Adds a new book to the catalog.
    pub(crate) async fn create_book(
        self,
        isbn: Isbn,
        title: String,
        description: String,
        authors: BTreeSet<String>,
    ) -> DriverResult<Book> {
        let book = Book::new(Uuid::new_v4(), isbn, title, description, authors, None);

        let mut tx = self.db.begin().await?;
        db::create_book(tx.ex(), &book).await?;
        tx.commit().await?;

        info!("Created book {} with ISBN {}", book.identifier(), book.isbn().as_str());
        Ok(book)
    }

    /// Gets all books in the catalog.
    pub(crate) async fn get_books(self) -> DriverResult<Vec<Book>> {
        let mut tx = self.db.begin().await?;
        let books = db::get_books(tx.ex()).await?;
        tx.commit().await?;
        Ok(books)
    }

    /// Gets the book with `identifier`.
    pub(crate) async fn get_book(self, identifier: Uuid) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;
        let book =
            db::get_book(tx.ex(), identifier).await.map_err(map_not_found(BOOK_NOT_FOUND))?;
        tx.commit().await?;
        Ok(book)
    }

    /// Replaces the catalog details of the book with `identifier`.  The borrower, if any, is kept.
    pub(crate) async fn update_book(
        self,
        identifier: Uuid,
        isbn: Isbn,
        title: String,
        description: String,
        authors: BTreeSet<String>,
    ) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;
        let current =
            db::get_book(tx.ex(), identifier).await.map_err(map_not_found(BOOK_NOT_FOUND))?;
        let book = Book::new(
            identifier,
            isbn,
            title,
            description,
            authors,
            current.borrowed_by().clone(),
        );
        db::update_book(tx.ex(), &book).await.map_err(map_not_found(BOOK_NOT_FOUND))?;
        tx.commit().await?;

        info!("Updated book {}", identifier);
        Ok(book)
    }

    /// Removes the book with `identifier` from the catalog.
    pub(crate) async fn delete_book(self, identifier: Uuid) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::delete_book(tx.ex(), identifier).await.map_err(map_not_found(BOOK_NOT_FOUND))?;
        tx.commit().await?;

        info!("Deleted book {}", identifier);
        Ok(())
    }

    /// Lends the book `book` to the user `user`.
    ///
    /// Fails if either does not exist or if the book is already held by someone, including `user`.
    pub(crate) async fn borrow_book(self, book: Uuid, user: Uuid) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;
        if !db::borrow_book(tx.ex(), book, user).await? {
            let unavailable = "book is not available";
            return Err(failed_transition(tx.ex(), "borrow", book, user, unavailable).await);
        }
        let borrowed = db::get_book(tx.ex(), book).await?;
        tx.commit().await?;

        info!("Borrowed book {} for user {}", book, user);
        Ok(borrowed)
    }

    /// Takes back the book `book` from the user `user`, who must be its current holder.
    pub(crate) async fn return_book(self, book: Uuid, user: Uuid) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;
        if !db::return_book(tx.ex(), book, user).await? {
            let unavailable = "book is not borrowed by this user";
            return Err(failed_transition(tx.ex(), "return", book, user, unavailable).await);
        }
        let returned = db::get_book(tx.ex(), book).await?;
        tx.commit().await?;

        info!("Returned book {} for user {}", book, user);
        Ok(returned)
    }
}
