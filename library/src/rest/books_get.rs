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


//! API to list all books.

use crate::rest::AppState;
use crate::rest::models::BooksResponse;
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::{EmptyBody, RestResult};

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    _: EmptyBody,
) -> RestResult<Json<BooksResponse>> {
    let books = driver.get_books().await?;
    Ok(Json(BooksResponse::new(&books, &base_urls)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route() -> (Method, String) {
        (Method::GET, "/books".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;
        context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("user@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<BooksResponse>()
            .await;
        assert!(response.books.is_empty());
        assert_eq!("http://localhost:9090/books", response.links.this.href);
    }

    #[tokio::test]
    async fn test_some() {
        let context = TestContext::setup().await;
        let user = context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;
        let book1 = context.create_book("Clean Code", &["Robert C. Martin"]).await;
        let book2 = context.create_book("Spring in Action", &["Craig Walls"]).await;
        context.driver().borrow_book(*book2.identifier(), *user.identifier()).await.unwrap();

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("user@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<BooksResponse>()
            .await;
        assert_eq!(2, response.books.len());
        assert_eq!(*book1.identifier(), response.books[0].identifier);
        assert!(response.books[0].borrowed_by_user.is_none());
        assert_eq!(*book2.identifier(), response.books[1].identifier);
        assert_eq!(
            *user.identifier(),
            response.books[1].borrowed_by_user.as_ref().unwrap().identifier
        );
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("Full authentication")
            .await;
    }

    test_payload_must_be_empty!(authenticated_request(route(), &[Role::LIBRARY_USER]).await);
}
