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


//! API to discover the management endpoints.

use crate::rest::AppState;
use crate::rest::models::Link;
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relation names and paths of the management endpoints.
const ENDPOINTS: &[(&str, &str)] = &[
    ("self", "actuator"),
    ("env", "actuator/env"),
    ("health", "actuator/health"),
    ("info", "actuator/info"),
    ("metrics", "actuator/metrics"),
];

/// Links to all management endpoints.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct ActuatorResponse {
    /// Links by relation name.
    #[serde(rename = "_links")]
    pub(crate) links: BTreeMap<String, Link>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State((_driver, base_urls)): State<AppState>,
    _: EmptyBody,
) -> Json<ActuatorResponse> {
    let mut links = ENDPOINTS
        .iter()
        .map(|(rel, path)| ((*rel).to_owned(), Link::to(&base_urls, path)))
        .collect::<BTreeMap<String, Link>>();
    links.insert(
        "health-path".to_owned(),
        Link {
            href: format!("{}/{{*path}}", base_urls.make_backend_href("actuator/health")),
            templated: Some(true),
        },
    );
    Json(ActuatorResponse { links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route() -> (Method, String) {
        (Method::GET, "/actuator".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_user("ops@example.com", &[Role::LIBRARY_ACTUATOR]).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("ops@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<ActuatorResponse>()
            .await;
        assert_eq!("http://localhost:9090/actuator", response.links["self"].href);
        assert_eq!("http://localhost:9090/actuator/env", response.links["env"].href);
        assert_eq!(Some(true), response.links["health-path"].templated);
    }

    #[tokio::test]
    async fn test_requires_actuator_role() {
        let context = TestContext::setup().await;
        context.create_user("admin@example.com", &[Role::LIBRARY_ADMIN]).await;

        OneShotBuilder::new(context.app(), route())
            .with_basic_auth("admin@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("Access is denied")
            .await;
    }
}
