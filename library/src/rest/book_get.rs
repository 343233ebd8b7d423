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


//! API to get the details of a book.

use crate::rest::AppState;
use crate::rest::models::BookModel;
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use uuid::Uuid;

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Path(book): Path<Uuid>,
    _: EmptyBody,
) -> RestResult<Json<BookModel>> {
    let book = driver.get_book(book).await?;
    Ok(Json(BookModel::new(&book, &base_urls)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route(book: Uuid) -> (Method, String) {
        (Method::GET, format!("/books/{}", book))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;
        let book = context.create_book("Clean Code <3", &["Robert C. Martin"]).await;

        let response = OneShotBuilder::new(context.app(), route(*book.identifier()))
            .with_basic_auth("user@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<BookModel>()
            .await;
        assert_eq!(*book.identifier(), response.identifier);
        assert_eq!("Clean Code \\x26lt;3", response.title);
        assert!(response.borrowed_by_user.is_none());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;

        OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_basic_auth("user@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("Book not found")
            .await;
    }

    test_payload_must_be_empty!(
        authenticated_request(route(Uuid::new_v4()), &[Role::LIBRARY_USER]).await
    );
}
