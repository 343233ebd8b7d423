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


//! API to get a single customer.

use crate::rest::AppState;
use crate::rest::models::CustomerModel;
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use uuid::Uuid;

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    Path(id): Path<Uuid>,
    _: EmptyBody,
) -> RestResult<Json<CustomerModel>> {
    let customer = driver.get_customer(id).await?;
    Ok(Json(CustomerModel::from(&customer)))
}
