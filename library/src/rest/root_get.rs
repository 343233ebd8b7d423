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


//! API to discover the entry points of the library.

use crate::rest::AppState;
use crate::rest::models::Link;
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};

/// Links to the collections of the library.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct RootLinks {
    /// The catalog of books.
    pub(crate) books: Link,

    /// The registered users.
    pub(crate) users: Link,
}

/// Message returned by the server at its root.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct RootResponse {
    /// Links to the collections.
    #[serde(rename = "_links")]
    pub(crate) links: RootLinks,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State((_driver, base_urls)): State<AppState>,
    _: EmptyBody,
) -> Json<RootResponse> {
    Json(RootResponse {
        links: RootLinks {
            books: Link::to(&base_urls, "books"),
            users: Link::to(&base_urls, "users"),
        },
    })
}
