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


//! API to describe the running application.

use axum::Json;
use bibliotheca_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};

/// Name under which the application reports itself.
const APPLICATION_NAME: &str = "library-server";

/// Details about the application.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct ApplicationInfo {
    /// Name of the application.
    pub(crate) name: String,
}

/// Message returned by the server with information about itself.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct InfoResponse {
    /// Details about the application.
    pub(crate) application: ApplicationInfo,
}

/// GET handler for this API.
pub(crate) async fn handler(_: EmptyBody) -> Json<InfoResponse> {
    Json(InfoResponse { application: ApplicationInfo { name: APPLICATION_NAME.to_owned() } })
}
