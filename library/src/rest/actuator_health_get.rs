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


//! API to report the health of the service and of its components.

use crate::driver::Driver;
use crate::rest::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use bibliotheca_core::rest::{EmptyBody, RestError, RestResult};
use http::StatusCode;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health of a single component.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct ComponentHealth {
    /// Either `UP` or `DOWN`.
    pub(crate) status: String,
}

impl ComponentHealth {
    /// Creates the health record for a component that is working or not.
    fn new(up: bool) -> Self {
        let status = if up { "UP" } else { "DOWN" };
        Self { status: status.to_owned() }
    }
}

/// Aggregated health of the service.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct HealthResponse {
    /// `UP` only if all components are `UP`.
    pub(crate) status: String,

    /// Health of each component by name.
    pub(crate) components: BTreeMap<String, ComponentHealth>,
}

/// Probes all components.
async fn check(driver: Driver) -> BTreeMap<String, ComponentHealth> {
    let db_up = match driver.check_db().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    };

    let mut components = BTreeMap::default();
    components.insert("db".to_owned(), ComponentHealth::new(db_up));
    components.insert("ping".to_owned(), ComponentHealth::new(true));
    components
}

/// Picks the response code for a probe with the given `status`.
fn status_code(status: &ComponentHealth) -> StatusCode {
    if status.status == "UP" { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE }
}

/// GET handler for the aggregated health.
pub(crate) async fn handler(
    State((driver, _base_urls)): State<AppState>,
    _: EmptyBody,
) -> impl IntoResponse {
    let components = check(driver).await;
    let overall = ComponentHealth::new(components.values().all(|c| c.status == "UP"));
    let response = HealthResponse { status: overall.status.clone(), components };
    (status_code(&overall), Json(response))
}

/// GET handler for the health of a single component.
pub(crate) async fn component_handler(
    State((driver, _base_urls)): State<AppState>,
    Path(component): Path<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let mut components = check(driver).await;
    match components.remove(&component) {
        Some(health) => Ok((status_code(&health), Json(health))),
        None => Err(RestError::NotFound(format!("Unknown component {}", component))),
    }
}
