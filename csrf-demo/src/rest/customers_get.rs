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


//! API to list all customers.

use crate::rest::AppState;
use crate::rest::models::CustomerModel;
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::{EmptyBody, RestResult};

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    _: EmptyBody,
) -> RestResult<Json<Vec<CustomerModel>>> {
    let customers = driver.get_customers().await?;
    Ok(Json(customers.iter().map(CustomerModel::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_core::rest::testutils::*;
    use http::Method;

    fn route() -> (Method, String) {
        (Method::GET, "/api".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let customer1 = context.create_customer("Hans", "Test1").await;
        let customer2 = context.create_customer("Hans", "Test2").await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth(TEST_USERNAME, TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<Vec<CustomerModel>>()
            .await;
        assert_eq!(
            vec![CustomerModel::from(&customer1), CustomerModel::from(&customer2)],
            response
        );
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth(TEST_USERNAME, TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<Vec<CustomerModel>>()
            .await;
        assert!(response.is_empty());
    }

    test_payload_must_be_empty!(authenticated_request(route()).await);
}
