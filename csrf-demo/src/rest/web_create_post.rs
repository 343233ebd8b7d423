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


//! API that receives the customer form at `/web/create`.

use crate::rest::AppState;
use crate::rest::models::CustomerRequest;
use axum::Form;
use axum::extract::State;
use bibliotheca_core::rest::RestResult;
use http::StatusCode;
use log::info;

/// POST handler for this API.
pub(crate) async fn handler(
    State((driver, _authn)): State<AppState>,
    Form(request): Form<CustomerRequest>,
) -> RestResult<StatusCode> {
    info!("Creating new customer via POST request '/web/create'");
    let request = request.validate()?;
    driver.create_customer(request.first_name, request.last_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route() -> (Method, String) {
        (Method::POST, "/web/create".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let session = context.login().await;

        OneShotBuilder::new(context.app(), route())
            .with_cookie("JSESSIONID", &session.cookie)
            .send_form([
                ("firstName", "Hans"),
                ("lastName", "Test"),
                ("_csrf", session.token.as_str()),
            ])
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;
        assert_eq!(vec!["Hans Test"], context.customer_names().await);
    }

    #[tokio::test]
    async fn test_blank_name() {
        let context = TestContext::setup().await;
        let session = context.login().await;

        OneShotBuilder::new(context.app(), route())
            .with_cookie("JSESSIONID", &session.cookie)
            .send_form([
                ("firstName", "   "),
                ("lastName", "Test"),
                ("_csrf", session.token.as_str()),
            ])
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("on field .*firstName.*must not be blank")
            .await;
        assert!(context.customer_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_token_from_other_session() {
        let context = TestContext::setup().await;
        let victim = context.login().await;
        let attacker = context.login().await;

        OneShotBuilder::new(context.app(), route())
            .with_cookie("JSESSIONID", &victim.cookie)
            .send_form([
                ("firstName", "Evil"),
                ("lastName", "Attacker"),
                ("_csrf", attacker.token.as_str()),
            ])
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("Invalid CSRF token")
            .await;
        assert!(context.customer_names().await.is_empty());
    }
}
