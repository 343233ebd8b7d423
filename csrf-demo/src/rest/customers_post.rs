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


//! API to register a customer from a JSON document.

use crate::rest::AppState;
use crate::rest::models::{CustomerModel, CustomerRequest};
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::RestResult;

/// POST handler for this API.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> RestResult<Json<CustomerModel>> {
    let request = request.validate()?;
    let customer = driver.create_customer(request.first_name, request.last_name).await?;
    Ok(Json(CustomerModel::from(&customer)))
}
