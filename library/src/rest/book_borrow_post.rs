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


//! API to borrow a book on behalf of a user.

use crate::rest::AppState;
use crate::rest::models::BookModel;
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use uuid::Uuid;

/// POST handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Path((book, user)): Path<(Uuid, Uuid)>,
    _: EmptyBody,
) -> RestResult<Json<BookModel>> {
    let book = driver.borrow_book(book, user).await?;
    Ok(Json(BookModel::new(&book, &base_urls)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route(book: Uuid, user: Uuid) -> (Method, String) {
        (Method::POST, format!("/books/{}/borrow/{}", book, user))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let user = context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;
        let book = context.create_book("Clean Code", &["Robert C. Martin"]).await;

        let route = route(*book.identifier(), *user.identifier());
        let response = context
            .request_as(route, "user@example.com")
            .await
            .send_empty()
            .await
            .expect_json::<BookModel>()
            .await;
        let borrower = response.borrowed_by_user.unwrap();
        assert_eq!(*user.identifier(), borrower.identifier);
        assert_eq!("user@example.com", borrower.email);

        assert_eq!(Some(user), *context.get_book(*book.identifier()).await.borrowed_by());
    }

    #[tokio::test]
    async fn test_already_borrowed_fails_for_any_role() {
        let context = TestContext::setup().await;
        let holder = context.create_user("holder@example.com", &[Role::LIBRARY_USER]).await;
        let admin = context
            .create_user("admin@example.com", &[Role::LIBRARY_USER, Role::LIBRARY_ADMIN])
            .await;
        let book = context.create_book("Clean Code", &["Robert C. Martin"]).await;
        context.driver().borrow_book(*book.identifier(), *holder.identifier()).await.unwrap();

        for (email, user) in [("holder@example.com", &holder), ("admin@example.com", &admin)] {
            context
                .request_as(route(*book.identifier(), *user.identifier()), email)
                .await
                .send_empty()
                .await
                .expect_status(StatusCode::NOT_FOUND)
                .expect_error("^Not found$")
                .await;
        }

        assert_eq!(Some(holder), *context.get_book(*book.identifier()).await.borrowed_by());
    }

    #[tokio::test]
    async fn test_failures_do_not_reveal_cause() {
        let context = TestContext::setup().await;
        let user = context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;
        let holder = context.create_user("holder@example.com", &[Role::LIBRARY_USER]).await;
        let book = context.create_book("Clean Code", &["Robert C. Martin"]).await;
        let held = context.create_book("Spring in Action", &["Craig Walls"]).await;
        context.driver().borrow_book(*held.identifier(), *holder.identifier()).await.unwrap();

        let routes = [
            route(Uuid::new_v4(), *user.identifier()),
            route(*book.identifier(), Uuid::new_v4()),
            route(*held.identifier(), *user.identifier()),
        ];
        let mut bodies = vec![];
        for route in routes {
            let body = context
                .request_as(route, "user@example.com")
                .await
                .send_empty()
                .await
                .expect_status(StatusCode::NOT_FOUND)
                .take_body_as_text()
                .await;
            bodies.push(body);
        }
        assert_eq!(r#"{"message":"Not found"}"#, bodies[0]);
        assert!(bodies.iter().all(|body| *body == bodies[0]), "Bodies were {:?}", bodies);

        assert!(context.get_book(*book.identifier()).await.is_available());
        assert_eq!(Some(holder), *context.get_book(*held.identifier()).await.borrowed_by());
    }

    #[tokio::test]
    async fn test_requires_library_user() {
        let context = TestContext::setup().await;
        let curator = context.create_user("curator@example.com", &[Role::LIBRARY_CURATOR]).await;
        let book = context.create_book("Clean Code", &["Robert C. Martin"]).await;

        context
            .request_as(route(*book.identifier(), *curator.identifier()), "curator@example.com")
            .await
            .send_empty()
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("Access is denied")
            .await;

        assert!(context.get_book(*book.identifier()).await.is_available());
    }

    test_payload_must_be_empty!(
        authenticated_request(route(Uuid::new_v4(), Uuid::new_v4()), &[Role::LIBRARY_USER]).await
    );
}
