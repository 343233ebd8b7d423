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


//! API to update the catalog details of a book.

use crate::rest::AppState;
use crate::rest::models::{BookModel, BookRequest};
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::RestResult;
use uuid::Uuid;

/// PUT handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Path(book): Path<Uuid>,
    Json(request): Json<BookRequest>,
) -> RestResult<Json<BookModel>> {
    let request = request.validate()?;
    let book = driver
        .update_book(book, request.isbn, request.title, request.description, request.authors)
        .await?;
    Ok(Json(BookModel::new(&book, &base_urls)))
}
