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


//! API to list all users.

use crate::rest::AppState;
use crate::rest::models::UsersResponse;
use axum::Json;
use axum::extract::State;
use bibliotheca_core::rest::{EmptyBody, RestResult};

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, base_urls)): State<AppState>,
    _: EmptyBody,
) -> RestResult<Json<UsersResponse>> {
    let users = driver.get_users().await?;
    Ok(Json(UsersResponse::new(&users, &base_urls)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use bibliotheca_authn::model::Role;
    use bibliotheca_core::rest::testutils::*;
    use http::Method;
    use std::collections::BTreeSet;

    fn route() -> (Method, String) {
        (Method::GET, "/users".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let admin = context.create_user("admin@example.com", &[Role::LIBRARY_ADMIN]).await;
        let user = context
            .create_user("user@example.com", &[Role::LIBRARY_USER, Role::LIBRARY_CURATOR])
            .await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("admin@example.com", TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<UsersResponse>()
            .await;
        assert_eq!(2, response.users.len());
        assert_eq!(*admin.identifier(), response.users[0].identifier);
        assert_eq!(*user.identifier(), response.users[1].identifier);
        assert_eq!(
            BTreeSet::from(["LIBRARY_CURATOR".to_owned(), "LIBRARY_USER".to_owned()]),
            response.users[1].roles
        );
        assert_eq!(
            format!("http://localhost:9090/users/{}", user.identifier()),
            response.users[1].links.this.href
        );
        assert_eq!("http://localhost:9090/users", response.links.this.href);
    }

    test_payload_must_be_empty!(authenticated_request(route(), &[Role::LIBRARY_ADMIN]).await);
}
