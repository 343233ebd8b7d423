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

use crate::db;
use crate::driver::testutils::TestContext as DriverTestContext;
use crate::driver::{DbCredentialStore, Driver};
use crate::model::{Book, User};
use crate::rest::{access_policy, app};
use axum::Router;
use bibliotheca_authn::driver::{AuthnDriver, AuthnOptions};
use bibliotheca_authn::model::{Password, Role};
use bibliotheca_authn::rest::AuthnState;
use bibliotheca_authn::rest::testutils::{TestSession, do_test_login, fetch_csrf};
use bibliotheca_core::model::EmailAddress;
use bibliotheca_core::rest::testutils::OneShotBuilder;
use bibliotheca_core::rest::{BaseUrls, DEFAULT_REALM};
use http::Method;
use std::sync::Arc;
use uuid::Uuid;

pub(crate) use crate::driver::testutils::{TEST_BCRYPT_COST, TEST_PASSWORD};

/// Base URL that the app under test believes it is served at.
pub(crate) const TEST_BASE_URL: &str = "http://localhost:9090/";

pub(crate) struct TestContext {
    driver: DriverTestContext,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let driver = DriverTestContext::setup().await;

        let opts = AuthnOptions { bcrypt_cost: TEST_BCRYPT_COST, ..Default::default() };
        let store = Arc::from(DbCredentialStore::new(driver.db()));
        let authn = AuthnState::new(AuthnDriver::new(store, DEFAULT_REALM, opts), access_policy());

        let base_urls = Arc::from(BaseUrls::from_static(TEST_BASE_URL));
        let app = app(driver.driver(), base_urls, authn);
        Self { driver, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.driver()
    }

    /// Stores a user named after `email` with `TEST_PASSWORD` and the given `roles`.
    pub(crate) async fn create_user(&self, email: &'static str, roles: &[&'static str]) -> User {
        self.driver.create_user(email, roles).await
    }

    /// Same as `create_user` but stores the password with the legacy hash scheme.
    pub(crate) async fn create_legacy_user(
        &self,
        email: &'static str,
        roles: &[&'static str],
    ) -> User {
        let user = User::new(
            Uuid::new_v4(),
            "Bruce".to_owned(),
            "Wayne".to_owned(),
            EmailAddress::from(email),
            Password::from(TEST_PASSWORD).hash_legacy(),
            roles.iter().map(|r| Role::from(*r)).collect(),
        );
        db::create_user(&mut self.driver.db().ex().await.unwrap(), &user).await.unwrap();
        user
    }

    pub(crate) async fn create_book(&self, title: &str, authors: &[&str]) -> Book {
        self.driver.create_book(title, authors).await
    }

    pub(crate) async fn get_book(&self, identifier: Uuid) -> Book {
        self.driver.get_book(identifier).await
    }

    pub(crate) async fn has_book(&self, identifier: Uuid) -> bool {
        db::get_book(&mut self.driver.db().ex().await.unwrap(), identifier).await.is_ok()
    }

    pub(crate) async fn get_user(&self, identifier: Uuid) -> User {
        self.driver.get_user(identifier).await
    }

    pub(crate) async fn has_user(&self, identifier: Uuid) -> bool {
        db::get_user(&mut self.driver.db().ex().await.unwrap(), identifier).await.is_ok()
    }

    /// Closes the database so that further accesses fail.
    pub(crate) async fn close_db(&self) {
        self.driver.db().close().await
    }

    /// Logs `email` in with `TEST_PASSWORD` via the login form.
    pub(crate) async fn login(&self, email: &str) -> TestSession {
        do_test_login(self.app(), email, TEST_PASSWORD).await
    }

    /// Prepares a request to `route` sent by `email` with basic credentials.
    ///
    /// The request also carries an anonymous session and its CSRF token, which state-changing
    /// methods need even when the caller authenticates with basic credentials.
    pub(crate) async fn request_as<U: AsRef<str>>(
        &self,
        route: (Method, U),
        email: &str,
    ) -> OneShotBuilder {
        let session = fetch_csrf(self.app(), None).await;
        OneShotBuilder::new(self.app(), route)
            .with_basic_auth(email, TEST_PASSWORD)
            .with_cookie("JSESSIONID", &session.cookie)
            .with_header("X-CSRF-TOKEN", &session.token)
    }
}

/// Prepares a request to `route` on a fresh app, sent by a user that holds `roles` and that
/// authenticates with basic credentials.
pub(crate) async fn authenticated_request(
    route: (Method, String),
    roles: &[&'static str],
) -> OneShotBuilder {
    let context = TestContext::setup().await;
    context.create_user("tester@example.com", roles).await;
    context.request_as(route, "tester@example.com").await
}
