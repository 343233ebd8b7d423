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


//! API to list the names of the available metrics.

use axum::Json;
use bibliotheca_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};

/// Metrics that the service knows about.
const METRIC_NAMES: &[&str] = &["http.server.requests", "process.uptime"];

/// Message returned by the server with the metric names.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct MetricsResponse {
    /// Sorted names of the metrics.
    pub(crate) names: Vec<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(_: EmptyBody) -> Json<MetricsResponse> {
    Json(MetricsResponse { names: METRIC_NAMES.iter().map(|n| (*n).to_owned()).collect() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::Method;

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_user("ops@example.com", &[Role::LIBRARY_ACTUATOR]).await;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/actuator/metrics"))
            .with_basic_auth("ops@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<MetricsResponse>()
            .await;
        assert_eq!(vec!["http.server.requests", "process.uptime"], response.names);
    }
}
