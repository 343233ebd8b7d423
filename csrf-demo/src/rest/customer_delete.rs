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


//! API to delete a customer.

use crate::rest::AppState;
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use uuid::Uuid;

/// DELETE handler for this API.
///
/// Responds with whether the customer existed.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    Path(id): Path<Uuid>,
    _: EmptyBody,
) -> RestResult<Json<bool>> {
    Ok(Json(driver.delete_customer(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route(id: Uuid) -> (Method, String) {
        (Method::DELETE, format!("/api/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let customer1 = context.create_customer("Hans", "Test1").await;
        let customer2 = context.create_customer("Hans", "Test2").await;
        let session = context.login().await;

        let deleted = OneShotBuilder::new(context.app(), route(*customer1.identifier()))
            .with_cookie("JSESSIONID", &session.cookie)
            .with_header("X-CSRF-TOKEN", &session.token)
            .send_empty()
            .await
            .expect_json::<bool>()
            .await;
        assert!(deleted);
        assert!(!context.has_customer(*customer1.identifier()).await);
        assert!(context.has_customer(*customer2.identifier()).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let session = context.login().await;

        let deleted = OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_cookie("JSESSIONID", &session.cookie)
            .with_header("X-CSRF-TOKEN", &session.token)
            .send_empty()
            .await
            .expect_json::<bool>()
            .await;
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_missing_csrf_token() {
        let context = TestContext::setup().await;
        let customer = context.create_customer("Hans", "Test1").await;

        OneShotBuilder::new(context.app(), route(*customer.identifier()))
            .with_basic_auth(TEST_USERNAME, TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("Invalid CSRF token")
            .await;
        assert!(context.has_customer(*customer.identifier()).await);
    }

    test_payload_must_be_empty!({
        let context = TestContext::setup().await;
        let session = context.login().await;
        OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_cookie("JSESSIONID", &session.cookie)
            .with_header("X-CSRF-TOKEN", &session.token)
    });
}
