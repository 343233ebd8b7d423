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


//! API to get the details of a user.

use crate::rest::AppState;
use crate::rest::models::UserModel;
use axum::Json;
use axum::extract::{Path, State};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use uuid::Uuid;

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    Path(user): Path<Uuid>,
    _: EmptyBody,
) -> RestResult<Json<UserModel>> {
    let user = driver.get_user(user).await?;
    Ok(Json(UserModel::new(&user, &base_urls)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::{Method, StatusCode};

    fn route(user: Uuid) -> (Method, String) {
        (Method::GET, format!("/users/{}", user))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let admin = context.create_user("admin@example.com", &[Role::LIBRARY_ADMIN]).await;

        let response = OneShotBuilder::new(context.app(), route(*admin.identifier()))
            .with_basic_auth("admin@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<UserModel>()
            .await;
        assert_eq!(*admin.identifier(), response.identifier);
        assert_eq!("admin@example.com", response.email);
        assert_eq!("Wayne", response.last_name);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        context.create_user("admin@example.com", &[Role::LIBRARY_ADMIN]).await;

        OneShotBuilder::new(context.app(), route(Uuid::new_v4()))
            .with_basic_auth("admin@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("User not found")
            .await;
    }

    #[tokio::test]
    async fn test_requires_admin() {
        let context = TestContext::setup().await;
        let user = context.create_user("user@example.com", &[Role::LIBRARY_USER]).await;

        OneShotBuilder::new(context.app(), route(*user.identifier()))
            .with_basic_auth("user@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("Access is denied")
            .await;
    }

    test_payload_must_be_empty!(
        authenticated_request(route(Uuid::new_v4()), &[Role::LIBRARY_ADMIN]).await
    );
}
