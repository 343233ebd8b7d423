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


//! API to register a customer via a GET request.
//!
//! Changing state on GET defeats CSRF protection because safe methods are never checked for a
//! token.  This route exists to show the consequences: any page that the user visits can trigger
//! it with a plain link or image.

use crate::rest::AppState;
use crate::rest::models::{CreateQuery, CustomerModel};
use axum::Json;
use axum::extract::{Query, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use log::warn;

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    Query(query): Query<CreateQuery>,
    _: EmptyBody,
) -> RestResult<Json<CustomerModel>> {
    warn!("Creating new customer via GET request '/api/create'");
    let request = query.validate()?;
    let customer = driver.create_customer(request.first_name, request.last_name).await?;
    Ok(Json(CustomerModel::from(&customer)))
}
