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


//! Test utilities for the REST API.

use crate::driver::testutils::TestContext as DriverTestContext;
use crate::driver::single_account_store;
use crate::model::Customer;
use crate::rest::{access_policy, app};
use axum::Router;
use bibliotheca_authn::driver::testutils::TEST_BCRYPT_COST;
use bibliotheca_authn::driver::{AuthnDriver, AuthnOptions};
use bibliotheca_authn::model::Password;
use bibliotheca_authn::rest::AuthnState;
use bibliotheca_authn::rest::testutils::{TestSession, do_test_login};
use bibliotheca_core::rest::DEFAULT_REALM;
use bibliotheca_core::rest::testutils::OneShotBuilder;
use http::Method;
use std::sync::Arc;
use uuid::Uuid;

/// Login name of the only account.
pub(crate) const TEST_USERNAME: &str = "user";

/// Password of the only account.
pub(crate) const TEST_PASSWORD: &str = "my!Secret4test";

pub(crate) struct TestContext {
    driver: DriverTestContext,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let driver = DriverTestContext::setup().await;

        let opts = AuthnOptions { bcrypt_cost: TEST_BCRYPT_COST, ..Default::default() };
        let store = single_account_store(
            TEST_USERNAME,
            Password::from(TEST_PASSWORD),
            TEST_BCRYPT_COST,
        )
        .await
        .unwrap();
        let authn = AuthnState::new(
            AuthnDriver::new(Arc::new(store), DEFAULT_REALM, opts),
            access_policy(),
        );

        let app = app(driver.driver(), authn);
        Self { driver, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) async fn create_customer(&self, first_name: &str, last_name: &str) -> Customer {
        self.driver.create_customer(first_name, last_name).await
    }

    pub(crate) async fn has_customer(&self, identifier: Uuid) -> bool {
        self.driver.has_customer(identifier).await
    }

    /// Returns the full names of all stored customers, in creation order.
    pub(crate) async fn customer_names(&self) -> Vec<String> {
        let customers = self.driver.driver().get_customers().await.unwrap();
        customers.iter().map(|c| format!("{} {}", c.first_name(), c.last_name())).collect()
    }

    /// Logs the only account in via the login form.
    pub(crate) async fn login(&self) -> TestSession {
        do_test_login(self.app(), TEST_USERNAME, TEST_PASSWORD).await
    }
}

/// Prepares a request to `route` on a fresh app, sent by the only account with basic credentials.
pub(crate) async fn authenticated_request(route: (Method, String)) -> OneShotBuilder {
    let context = TestContext::setup().await;
    OneShotBuilder::new(context.app(), route).with_basic_auth(TEST_USERNAME, TEST_PASSWORD)
}
