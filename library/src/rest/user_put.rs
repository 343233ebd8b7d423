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


//! API to replace the attributes of a user.

use crate::rest::AppState;
use crate::rest::models::{UserModel, UserRequest};
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::RestResult;
use uuid::Uuid;

/// PUT handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Path(user): Path<Uuid>,
    Json(request): Json<UserRequest>,
) -> RestResult<Json<UserModel>> {
    let request = request.validate()?;
    let user = driver
        .update_user(
            user,
            request.first_name,
            request.last_name,
            request.email,
            request.password,
            request.roles,
        )
        .await?;
    Ok(Json(UserModel::new(&user, &base_urls)))
}
