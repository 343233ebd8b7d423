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


//! Database abstraction to manipulate books and users.
//!
//! Rows carry an integer store key that never leaves this module.  Callers refer to entities by
//! their public identifiers only.

use crate::model::{Book, Isbn, User};
use bibliotheca_authn::model::{HashedPassword, Role};
#[cfg(feature = "postgres")]
use bibliotheca_core::db::postgres;
#[cfg(feature = "sqlite")]
use bibliotheca_core::db::sqlite;
use bibliotheca_core::db::{DbError, DbResult, Executor};
use bibliotheca_core::model::EmailAddress;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(feature = "sqlite")]
use sqlx::sqlite::SqliteRow;
use std::collections::BTreeSet;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Common prefix of the queries that fetch users.
const SELECT_USERS: &str =
    "SELECT id, identifier, first_name, last_name, email, password FROM users";

/// Common prefix of the queries that fetch books along with the identifier of their borrower.
const SELECT_BOOKS: &str = "
    SELECT b.id, b.identifier, b.isbn, b.title, b.description, u.identifier AS borrower
    FROM books b LEFT JOIN users u ON u.id = b.borrowed_by";

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// A user as stored in the `users` table, before attaching its roles.
struct UserRow {
    /// Store key of the user.
    id: i64,

    /// The user with an empty set of roles.
    user: User,
}

/// A book as stored in the `books` table, before attaching its authors and borrower.
struct BookRow {
    /// Store key of the book.
    id: i64,

    /// Public identifier of the book.
    identifier: Uuid,

    /// ISBN of the book.
    isbn: Isbn,

    /// Title of the book.
    title: String,

    /// Description of the book.
    description: String,

    /// Public identifier of the user that holds the book, if any.
    borrower: Option<Uuid>,
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for UserRow {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let identifier: Uuid = row.try_get("identifier").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(postgres::map_sqlx_error)?;

        let user = User::new(
            identifier,
            first_name,
            last_name,
            EmailAddress::new(email)?,
            HashedPassword::new(password),
            BTreeSet::new(),
        );
        Ok(Self { id, user })
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for BookRow {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let identifier: Uuid = row.try_get("identifier").map_err(postgres::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let borrower: Option<Uuid> = row.try_get("borrower").map_err(postgres::map_sqlx_error)?;

        Ok(Self { id, identifier, isbn: Isbn::new(isbn)?, title, description, borrower })
    }
}

#[cfg(feature = "sqlite")]
impl TryFrom<SqliteRow> for UserRow {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let identifier: Uuid = row.try_get("identifier").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(sqlite::map_sqlx_error)?;

        let user = User::new(
            identifier,
            first_name,
            last_name,
            EmailAddress::new(email)?,
            HashedPassword::new(password),
            BTreeSet::new(),
        );
        Ok(Self { id, user })
    }
}

#[cfg(feature = "sqlite")]
impl TryFrom<SqliteRow> for BookRow {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let identifier: Uuid = row.try_get("identifier").map_err(sqlite::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let borrower: Option<Uuid> = row.try_get("borrower").map_err(sqlite::map_sqlx_error)?;

        Ok(Self { id, identifier, isbn: Isbn::new(isbn)?, title, description, borrower })
    }
}

/// Interprets the number of rows touched by a statement that targets a single entity.
fn expect_one_row(rows_affected: u64, operation: &str) -> DbResult<()> {
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError(format!("{} affected more than one row", operation))),
    }
}

/// Gets the store key of the user with public `identifier`.
async fn get_user_id(ex: &mut Executor, identifier: Uuid) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query_scalar("SELECT id FROM users WHERE identifier = $1")
            .bind(identifier)
            .fetch_one(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error),

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => sqlx::query_scalar("SELECT id FROM users WHERE identifier = ?")
            .bind(identifier)
            .fetch_one(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error),

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the store key of the book with public `identifier`.
async fn get_book_id(ex: &mut Executor, identifier: Uuid) -> DbResult<i64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query_scalar("SELECT id FROM books WHERE identifier = $1")
            .bind(identifier)
            .fetch_one(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error),

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => sqlx::query_scalar("SELECT id FROM books WHERE identifier = ?")
            .bind(identifier)
            .fetch_one(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error),

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the roles of the user with store key `user_id`.
async fn get_roles(ex: &mut Executor, user_id: i64) -> DbResult<BTreeSet<Role>> {
    let raw_roles: Vec<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut roles = BTreeSet::new();
    for raw_role in raw_roles {
        roles.insert(Role::new(raw_role)?);
    }
    Ok(roles)
}

/// Replaces the roles of the user with store key `user_id` with `roles`.
async fn set_roles(ex: &mut Executor, user_id: i64, roles: &BTreeSet<Role>) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            for role in roles {
                sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
                    .bind(user_id)
                    .bind(role.as_str())
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
                .bind(user_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            for role in roles {
                sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                    .bind(user_id)
                    .bind(role.as_str())
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Gets the authors of the book with store key `book_id`.
async fn get_authors(ex: &mut Executor, book_id: i64) -> DbResult<BTreeSet<String>> {
    let authors: Vec<String> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query_scalar("SELECT author FROM book_authors WHERE book_id = $1")
                .bind(book_id)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            sqlx::query_scalar("SELECT author FROM book_authors WHERE book_id = ?")
                .bind(book_id)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(authors.into_iter().collect())
}

/// Replaces the authors of the book with store key `book_id` with `authors`.
async fn set_authors(ex: &mut Executor, book_id: i64, authors: &BTreeSet<String>) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(book_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            for author in authors {
                sqlx::query("INSERT INTO book_authors (book_id, author) VALUES ($1, $2)")
                    .bind(book_id)
                    .bind(author)
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            sqlx::query("DELETE FROM book_authors WHERE book_id = ?")
                .bind(book_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            for author in authors {
                sqlx::query("INSERT INTO book_authors (book_id, author) VALUES (?, ?)")
                    .bind(book_id)
                    .bind(author)
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Attaches the roles to a user fetched from the database.
async fn complete_user(ex: &mut Executor, row: UserRow) -> DbResult<User> {
    let roles = get_roles(ex, row.id).await?;
    Ok(row.user.with_roles(roles))
}

/// Attaches the authors and the borrower to a book fetched from the database.
async fn complete_book(ex: &mut Executor, row: BookRow) -> DbResult<Book> {
    let authors = get_authors(ex, row.id).await?;
    let borrowed_by = match row.borrower {
        Some(identifier) => Some(get_user(ex, identifier).await?),
        None => None,
    };
    Ok(Book::new(row.identifier, row.isbn, row.title, row.description, authors, borrowed_by))
}

/// Creates a new `user`.  Fails with `AlreadyExists` if the email address is taken.
pub(crate) async fn create_user(ex: &mut Executor, user: &User) -> DbResult<()> {
    let user_id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO users (identifier, first_name, last_name, email, password)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id";
            sqlx::query_scalar(query_str)
                .bind(user.identifier())
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO users (identifier, first_name, last_name, email, password)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(user.identifier())
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    set_roles(ex, user_id, user.roles()).await
}

/// Gets all users, in creation order.
pub(crate) async fn get_users(ex: &mut Executor) -> DbResult<Vec<User>> {
    let query_str = format!("{} ORDER BY id", SELECT_USERS);
    let rows: Vec<UserRow> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let raw_rows = sqlx::query(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            raw_rows.into_iter().map(UserRow::try_from).collect::<DbResult<_>>()?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let raw_rows = sqlx::query(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            raw_rows.into_iter().map(UserRow::try_from).collect::<DbResult<_>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        users.push(complete_user(ex, row).await?);
    }
    Ok(users)
}

/// Gets the user with public `identifier`.
pub(crate) async fn get_user(ex: &mut Executor, identifier: Uuid) -> DbResult<User> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!("{} WHERE identifier = $1", SELECT_USERS);
            let raw_row = sqlx::query(&query_str)
                .bind(identifier)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            UserRow::try_from(raw_row)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = format!("{} WHERE identifier = ?", SELECT_USERS);
            let raw_row = sqlx::query(&query_str)
                .bind(identifier)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            UserRow::try_from(raw_row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    complete_user(ex, row).await
}

/// Gets the user that logs in with `email`.
pub(crate) async fn get_user_by_email(ex: &mut Executor, email: &EmailAddress) -> DbResult<User> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!("{} WHERE email = $1", SELECT_USERS);
            let raw_row = sqlx::query(&query_str)
                .bind(email.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            UserRow::try_from(raw_row)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = format!("{} WHERE email = ?", SELECT_USERS);
            let raw_row = sqlx::query(&query_str)
                .bind(email.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            UserRow::try_from(raw_row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    complete_user(ex, row).await
}

/// Replaces all attributes of the existing user identified by `user.identifier()` with the values
/// in `user`.
pub(crate) async fn update_user(ex: &mut Executor, user: &User) -> DbResult<()> {
    let user_id = get_user_id(ex, *user.identifier()).await?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE users SET first_name = $1, last_name = $2, email = $3, password = $4
                WHERE id = $5";
            let done = sqlx::query(query_str)
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .bind(user_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE users SET first_name = ?, last_name = ?, email = ?, password = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(user.first_name())
                .bind(user.last_name())
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .bind(user_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected, "Update")?;

    set_roles(ex, user_id, user.roles()).await
}

/// Replaces the password hash of the user that logs in with `email`.
pub(crate) async fn update_user_password(
    ex: &mut Executor,
    email: &EmailAddress,
    password: &HashedPassword,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("UPDATE users SET password = $1 WHERE email = $2")
                .bind(password.as_str())
                .bind(email.as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("UPDATE users SET password = ? WHERE email = ?")
                .bind(password.as_str())
                .bind(email.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected, "Update")
}

/// Deletes the user with public `identifier`.  Books held by the user become available.
pub(crate) async fn delete_user(ex: &mut Executor, identifier: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM users WHERE identifier = $1")
                .bind(identifier)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM users WHERE identifier = ?")
                .bind(identifier)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected, "Deletion")
}

/// Creates a new `book`, which starts as available regardless of its borrower.
pub(crate) async fn create_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    let book_id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO books (identifier, isbn, title, description)
                VALUES ($1, $2, $3, $4)
                RETURNING id";
            sqlx::query_scalar(query_str)
                .bind(book.identifier())
                .bind(book.isbn().as_str())
                .bind(book.title())
                .bind(book.description())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO books (identifier, isbn, title, description)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(book.identifier())
                .bind(book.isbn().as_str())
                .bind(book.title())
                .bind(book.description())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    set_authors(ex, book_id, book.authors()).await
}

/// Gets all books, in creation order.
pub(crate) async fn get_books(ex: &mut Executor) -> DbResult<Vec<Book>> {
    let query_str = format!("{} ORDER BY b.id", SELECT_BOOKS);
    let rows: Vec<BookRow> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let raw_rows = sqlx::query(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            raw_rows.into_iter().map(BookRow::try_from).collect::<DbResult<_>>()?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let raw_rows = sqlx::query(&query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            raw_rows.into_iter().map(BookRow::try_from).collect::<DbResult<_>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut books = Vec::with_capacity(rows.len());
    for row in rows {
        books.push(complete_book(ex, row).await?);
    }
    Ok(books)
}

/// Gets the book with public `identifier`.
pub(crate) async fn get_book(ex: &mut Executor, identifier: Uuid) -> DbResult<Book> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!("{} WHERE b.identifier = $1", SELECT_BOOKS);
            let raw_row = sqlx::query(&query_str)
                .bind(identifier)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            BookRow::try_from(raw_row)?
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = format!("{} WHERE b.identifier = ?", SELECT_BOOKS);
            let raw_row = sqlx::query(&query_str)
                .bind(identifier)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            BookRow::try_from(raw_row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    complete_book(ex, row).await
}

/// Replaces the catalog attributes of the existing book identified by `book.identifier()` with the
/// values in `book`.  The borrower is not modified.
pub(crate) async fn update_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    let book_id = get_book_id(ex, *book.identifier()).await?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "UPDATE books SET isbn = $1, title = $2, description = $3 WHERE id = $4";
            let done = sqlx::query(query_str)
                .bind(book.isbn().as_str())
                .bind(book.title())
                .bind(book.description())
                .bind(book_id)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE books SET isbn = ?, title = ?, description = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(book.isbn().as_str())
                .bind(book.title())
                .bind(book.description())
                .bind(book_id)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected, "Update")?;

    set_authors(ex, book_id, book.authors()).await
}

/// Deletes the book with public `identifier`.
pub(crate) async fn delete_book(ex: &mut Executor, identifier: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM books WHERE identifier = $1")
                .bind(identifier)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM books WHERE identifier = ?")
                .bind(identifier)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected, "Deletion")
}

/// Marks the book `book` as held by the user `user`, but only if both exist and the book is
/// available.
///
/// The check and the write happen in a single statement so that two concurrent callers cannot
/// both succeed.  Returns false if nothing was modified.
pub(crate) async fn borrow_book(ex: &mut Executor, book: Uuid, user: Uuid) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE books SET borrowed_by = u.id
                FROM users u
                WHERE books.identifier = $1 AND books.borrowed_by IS NULL AND u.identifier = $2";
            let done = sqlx::query(query_str)
                .bind(book)
                .bind(user)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE books SET borrowed_by = (SELECT id FROM users WHERE identifier = ?1)
                WHERE identifier = ?2 AND borrowed_by IS NULL
                    AND EXISTS (SELECT 1 FROM users WHERE identifier = ?1)";
            let done = sqlx::query(query_str)
                .bind(user)
                .bind(book)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DbError::BackendError("Borrow affected more than one row".to_owned())),
    }
}

/// Marks the book `book` as available, but only if it is currently held by the user `user`.
///
/// Returns false if nothing was modified.
pub(crate) async fn return_book(ex: &mut Executor, book: Uuid, user: Uuid) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE books SET borrowed_by = NULL
                WHERE identifier = $1
                    AND borrowed_by = (SELECT id FROM users WHERE identifier = $2)";
            let done = sqlx::query(query_str)
                .bind(book)
                .bind(user)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE books SET borrowed_by = NULL
                WHERE identifier = ?
                    AND borrowed_by = (SELECT id FROM users WHERE identifier = ?)";
            let done = sqlx::query(query_str)
                .bind(book)
                .bind(user)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    match rows_affected {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DbError::BackendError("Return affected more than one row".to_owned())),
    }
}
