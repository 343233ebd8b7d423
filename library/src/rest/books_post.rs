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


//! API to add a book to the catalog.

use crate::rest::AppState;
use crate::rest::models::{BookModel, BookRequest};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use bibliotheca_core::rest::RestResult;
use http::{StatusCode, header};

/// POST handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Json(request): Json<BookRequest>,
) -> RestResult<impl IntoResponse> {
    let request = request.validate()?;
    let book = driver
        .create_book(request.isbn, request.title, request.description, request.authors)
        .await?;
    let model = BookModel::new(&book, &base_urls);
    let location = model.links.this.href.clone();
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(model)))
}
