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

//! Utilities to help testing services that integrate with the `authn` features.

use crate::rest::CsrfResponse;
use axum::Router;
use bibliotheca_core::rest::testutils::OneShotBuilder;
use http::{Method, StatusCode};

#[cfg(test)]
use {
    crate::authz::{Access, AccessPolicy, AccessRule},
    crate::driver::AuthnOptions,
    crate::driver::testutils::TestContext as DriverTestContext,
    crate::model::{HashedPassword, Principal, Role},
    crate::rest::{AuthnState, protect},
};

/// Session cookie and CSRF token held by a test client.
pub struct TestSession {
    /// Value of the `JSESSIONID` cookie.
    pub cookie: String,

    /// CSRF token tied to the session.
    pub token: String,
}

/// Fetches the CSRF token for the session identified by `cookie`, creating a new session if
/// `cookie` is missing or no longer valid.
pub async fn fetch_csrf(app: Router, cookie: Option<&str>) -> TestSession {
    let mut builder = OneShotBuilder::new(app, (Method::GET, "/csrf"));
    if let Some(cookie) = cookie {
        builder = builder.with_cookie("JSESSIONID", cookie);
    }
    let response = builder.send_empty().await;
    let cookie = match response.cookie_value("JSESSIONID") {
        Some(new_cookie) => new_cookie,
        None => cookie.expect("Session not created and no previous cookie").to_owned(),
    };
    let response = response.expect_json::<CsrfResponse>().await;
    TestSession { cookie, token: response.token }
}

/// Logs `username` in with `password` via the login form and returns the resulting session.
pub async fn do_test_login(app: Router, username: &str, password: &str) -> TestSession {
    let anonymous = fetch_csrf(app.clone(), None).await;
    let response = OneShotBuilder::new(app.clone(), (Method::POST, "/login"))
        .with_cookie("JSESSIONID", &anonymous.cookie)
        .send_form([
            ("username", username),
            ("password", password),
            ("_csrf", anonymous.token.as_str()),
        ])
        .await
        .expect_status(StatusCode::FOUND)
        .expect_header("Location", "/");
    let cookie = response.cookie_value("JSESSIONID").expect("Login did not set a cookie");
    response.expect_empty().await;
    fetch_csrf(app, Some(&cookie)).await
}

/// Handler for the test-only routes that greets the caller.
#[cfg(test)]
async fn hello(principal: Principal) -> String {
    format!("Hello {}", principal.username().as_str())
}

/// Handler for the test-only routes that accepts modifying requests.
#[cfg(test)]
async fn posted(principal: Principal) -> String {
    format!("Posted by {}", principal.username().as_str())
}

/// State of a running test.
#[cfg(test)]
pub(crate) struct TestContext {
    /// Driver-level context, which gives access to the accounts.
    driver: DriverTestContext,

    /// The app under test.
    app: Router,
}

#[cfg(test)]
impl TestContext {
    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Creates an account with a password hashed under the current scheme.
    pub(crate) async fn create_user(
        &self,
        username: &'static str,
        password: &'static str,
        roles: &[&'static str],
    ) {
        self.driver.create_user(username, password, roles).await
    }

    /// Creates an account with a password hashed under the legacy scheme.
    pub(crate) async fn create_legacy_user(
        &self,
        username: &'static str,
        password: &'static str,
        roles: &[&'static str],
    ) {
        self.driver.create_legacy_user(username, password, roles).await
    }

    /// Returns the stored hash of the account `username`.
    pub(crate) async fn hash_of(&self, username: &'static str) -> HashedPassword {
        self.driver.hash_of(username).await
    }

    /// Logs `username` in with `password` via the login form.
    pub(crate) async fn login(&self, username: &str, password: &str) -> TestSession {
        do_test_login(self.app(), username, password).await
    }
}

/// Builder pattern for the test context.
#[cfg(test)]
#[must_use]
pub(crate) struct TestContextBuilder {
    /// Options for the driver.
    opts: AuthnOptions,
}

#[cfg(test)]
impl TestContextBuilder {
    /// Initializes a new builder with the default test settings.
    pub(crate) fn new() -> Self {
        Self { opts: AuthnOptions::default() }
    }

    /// Initializes the app with a few test routes behind the guard.
    pub(crate) async fn build(self) -> TestContext {
        use axum::routing::get;

        let driver = DriverTestContext::setup_with_opts(self.opts).await;
        let policy = AccessPolicy::new(vec![
            AccessRule::any(&["/login", "/logout", "/csrf"], Access::Public),
            AccessRule::any(&["/admin"], Access::Role(Role::LIBRARY_ADMIN)),
        ]);
        let state = AuthnState::new(driver.driver(), policy);

        let app = Router::new()
            .route("/protected", get(hello).post(posted))
            .route("/admin", get(hello));
        let app = protect(app, state);

        TestContext { driver, app }
    }
}
