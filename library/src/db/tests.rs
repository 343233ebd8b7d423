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


//! Common tests for any database implementation.

use super::*;
use bibliotheca_core::db::Db;
use std::sync::Arc;

/// Builds a user with the given `email` and `roles`, and a fake password hash.
fn new_user(email: &str, roles: &[&'static str]) -> User {
    User::new(
        Uuid::new_v4(),
        "Bruce".to_owned(),
        "Wayne".to_owned(),
        EmailAddress::from(email),
        HashedPassword::new("{noop}fake"),
        roles.iter().map(|r| Role::from(*r)).collect(),
    )
}

/// Builds an available book with the given `title` and `authors`.
fn new_book(title: &str, authors: &[&str]) -> Book {
    Book::new(
        Uuid::new_v4(),
        Isbn::new("9780132350884").unwrap(),
        title.to_owned(),
        "A book".to_owned(),
        authors.iter().map(|a| (*a).to_owned()).collect(),
        None,
    )
}

async fn test_users_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = new_user("user1@example.com", &["LIBRARY_USER"]);
    let user2 = new_user("user2@example.com", &["LIBRARY_ADMIN", "LIBRARY_USER"]);
    create_user(&mut ex, &user1).await.unwrap();
    create_user(&mut ex, &user2).await.unwrap();

    assert_eq!(user1, get_user(&mut ex, *user1.identifier()).await.unwrap());
    assert_eq!(user2, get_user_by_email(&mut ex, user2.email()).await.unwrap());
    assert_eq!(vec![user1, user2], get_users(&mut ex).await.unwrap());
}

async fn test_users_duplicate_email(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_user(&mut ex, &new_user("same@example.com", &[])).await.unwrap();
    assert_eq!(
        DbError::AlreadyExists,
        create_user(&mut ex, &new_user("same@example.com", &[])).await.unwrap_err()
    );
}

async fn test_users_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, get_user(&mut ex, Uuid::new_v4()).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        get_user_by_email(&mut ex, &EmailAddress::from("a@example.com")).await.unwrap_err()
    );
    assert_eq!(DbError::NotFound, delete_user(&mut ex, Uuid::new_v4()).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        update_user(&mut ex, &new_user("a@example.com", &[])).await.unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        update_user_password(
            &mut ex,
            &EmailAddress::from("a@example.com"),
            &HashedPassword::new("x")
        )
        .await
        .unwrap_err()
    );
}

async fn test_users_update_replaces_roles(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &["LIBRARY_USER", "LIBRARY_CURATOR"]);
    create_user(&mut ex, &user).await.unwrap();

    let updated = User::new(
        *user.identifier(),
        "Clark".to_owned(),
        "Kent".to_owned(),
        EmailAddress::from("clark@example.com"),
        HashedPassword::new("{noop}other"),
        [Role::from("LIBRARY_ADMIN")].into(),
    );
    update_user(&mut ex, &updated).await.unwrap();

    assert_eq!(updated, get_user(&mut ex, *user.identifier()).await.unwrap());
    assert_eq!(
        DbError::NotFound,
        get_user_by_email(&mut ex, &EmailAddress::from("user@example.com")).await.unwrap_err()
    );
}

async fn test_users_update_password(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &["LIBRARY_USER"]);
    create_user(&mut ex, &user).await.unwrap();

    let hash = HashedPassword::new("{bcrypt}new");
    update_user_password(&mut ex, user.email(), &hash).await.unwrap();

    let stored = get_user(&mut ex, *user.identifier()).await.unwrap();
    assert_eq!(&hash, stored.password());
    assert_eq!(user.first_name(), stored.first_name());
    assert_eq!(user.roles(), stored.roles());
}

async fn test_users_corrupted_role(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &[]);
    create_user(&mut ex, &user).await.unwrap();
    let user_id = get_user_id(&mut ex, *user.identifier()).await.unwrap();
    match &mut ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, 'bad role')")
                .bind(user_id)
                .execute(ex.conn())
                .await
                .unwrap();
        }

        #[cfg(feature = "sqlite")]
        Executor::Sqlite(ex) => {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, 'bad role')")
                .bind(user_id)
                .execute(ex.conn())
                .await
                .unwrap();
        }

        #[allow(unused)]
        _ => unreachable!(),
    }

    match get_user(&mut ex, *user.identifier()).await {
        Err(DbError::DataIntegrityError(e)) => assert!(e.contains("Unsupported character")),
        e => panic!("{:?}", e),
    }
}

async fn test_books_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book1 = new_book("Clean Code", &["Robert C. Martin"]);
    let book2 = new_book("Cloud Native Java", &["Josh Long", "Kenny Bastani"]);
    create_book(&mut ex, &book1).await.unwrap();
    create_book(&mut ex, &book2).await.unwrap();

    assert_eq!(book1, get_book(&mut ex, *book1.identifier()).await.unwrap());
    assert_eq!(vec![book1, book2], get_books(&mut ex).await.unwrap());
}

async fn test_books_update_keeps_borrower(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &["LIBRARY_USER"]);
    create_user(&mut ex, &user).await.unwrap();
    let book = new_book("Clean Code", &["Robert C. Martin"]);
    create_book(&mut ex, &book).await.unwrap();
    assert!(borrow_book(&mut ex, *book.identifier(), *user.identifier()).await.unwrap());

    let updated = Book::new(
        *book.identifier(),
        Isbn::new("9781449374648").unwrap(),
        "Cloud Native Java".to_owned(),
        "Another book".to_owned(),
        ["Josh Long".to_owned()].into(),
        None,
    );
    update_book(&mut ex, &updated).await.unwrap();

    let stored = get_book(&mut ex, *book.identifier()).await.unwrap();
    assert_eq!(updated.title(), stored.title());
    assert_eq!(updated.authors(), stored.authors());
    assert_eq!(&Some(user), stored.borrowed_by());
}

async fn test_books_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, get_book(&mut ex, Uuid::new_v4()).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_book(&mut ex, Uuid::new_v4()).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_book(&mut ex, &new_book("x", &["y"])).await.unwrap_err());
}

async fn test_books_delete(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book1 = new_book("Clean Code", &["Robert C. Martin"]);
    let book2 = new_book("Cloud Native Java", &["Josh Long"]);
    create_book(&mut ex, &book1).await.unwrap();
    create_book(&mut ex, &book2).await.unwrap();

    delete_book(&mut ex, *book1.identifier()).await.unwrap();
    assert_eq!(vec![book2], get_books(&mut ex).await.unwrap());
}

async fn test_borrow_and_return(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = new_user("user1@example.com", &["LIBRARY_USER"]);
    let user2 = new_user("user2@example.com", &["LIBRARY_USER"]);
    create_user(&mut ex, &user1).await.unwrap();
    create_user(&mut ex, &user2).await.unwrap();
    let book = new_book("Clean Code", &["Robert C. Martin"]);
    create_book(&mut ex, &book).await.unwrap();

    assert!(borrow_book(&mut ex, *book.identifier(), *user1.identifier()).await.unwrap());
    assert!(!borrow_book(&mut ex, *book.identifier(), *user2.identifier()).await.unwrap());
    assert!(!borrow_book(&mut ex, *book.identifier(), *user1.identifier()).await.unwrap());
    assert_eq!(
        &Some(user1.clone()),
        get_book(&mut ex, *book.identifier()).await.unwrap().borrowed_by()
    );

    assert!(!return_book(&mut ex, *book.identifier(), *user2.identifier()).await.unwrap());
    assert!(return_book(&mut ex, *book.identifier(), *user1.identifier()).await.unwrap());
    assert!(!return_book(&mut ex, *book.identifier(), *user1.identifier()).await.unwrap());
    assert!(get_book(&mut ex, *book.identifier()).await.unwrap().is_available());
}

async fn test_borrow_missing_entities(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &["LIBRARY_USER"]);
    create_user(&mut ex, &user).await.unwrap();
    let book = new_book("Clean Code", &["Robert C. Martin"]);
    create_book(&mut ex, &book).await.unwrap();

    assert!(!borrow_book(&mut ex, Uuid::new_v4(), *user.identifier()).await.unwrap());
    assert!(!borrow_book(&mut ex, *book.identifier(), Uuid::new_v4()).await.unwrap());
    assert!(get_book(&mut ex, *book.identifier()).await.unwrap().is_available());
    assert!(!return_book(&mut ex, *book.identifier(), Uuid::new_v4()).await.unwrap());
}

async fn test_delete_user_releases_books(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = new_user("user@example.com", &["LIBRARY_USER"]);
    create_user(&mut ex, &user).await.unwrap();
    let book = new_book("Clean Code", &["Robert C. Martin"]);
    create_book(&mut ex, &book).await.unwrap();
    assert!(borrow_book(&mut ex, *book.identifier(), *user.identifier()).await.unwrap());

    delete_user(&mut ex, *user.identifier()).await.unwrap();

    assert!(get_book(&mut ex, *book.identifier()).await.unwrap().is_available());
    assert_eq!(DbError::NotFound, get_user(&mut ex, *user.identifier()).await.unwrap_err());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        bibliotheca_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_users_ok,
            test_users_duplicate_email,
            test_users_not_found,
            test_users_update_replaces_roles,
            test_users_update_password,
            test_users_corrupted_role,
            test_books_ok,
            test_books_update_keeps_borrower,
            test_books_not_found,
            test_books_delete,
            test_borrow_and_return,
            test_borrow_missing_entities,
            test_delete_user_releases_books
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use bibliotheca_core::db::postgres::testutils;

    /// Connects to the test database and initializes the schema.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Arc::new(db)
    }

    generate_db_tests!(
        setup().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use bibliotheca_core::db::sqlite::testutils;

    /// Opens an in-memory database and initializes the schema.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Arc::new(db)
    }

    generate_db_tests!(setup().await);
}
