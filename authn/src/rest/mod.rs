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

//! REST interface for authentication: the guard middleware plus the login, logout and CSRF token
//! endpoints shared by all apps.

use crate::driver::{AuthnDriver, session_csrf_token};
use crate::model::CsrfToken;
use axum::Router;
use axum::middleware::from_fn_with_state;
use bibliotheca_core::rest::{RestError, RestResult};
use http::{HeaderMap, HeaderValue, header};

mod cookies;
mod csrf_get;
pub use csrf_get::CsrfResponse;
mod guard;
pub use guard::{AuthnState, SessionContext, guard};
mod httputils;
mod login_get;
mod login_post;
mod logout_post;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use cookies::SESSION_COOKIE;
pub use httputils::get_basic_auth;

/// Name of the header that carries the CSRF token.
pub const CSRF_HEADER_NAME: &str = "X-CSRF-TOKEN";

/// Name of the form field that carries the CSRF token.
pub const CSRF_PARAMETER_NAME: &str = "_csrf";

/// Creates the router for the authentication endpoints.
fn app(state: AuthnState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/csrf", get(csrf_get::handler))
        .route("/login", get(login_get::handler).post(login_post::handler))
        .route("/logout", post(logout_post::handler))
        .with_state(state)
}

/// Adds the authentication endpoints to the `app` router and protects all of its routes with the
/// `guard` middleware.
pub fn protect(app: Router, state: AuthnState) -> Router {
    app.merge(self::app(state.clone())).layer(from_fn_with_state(state, guard))
}

/// Converts a session `cookie` into a header value.
fn cookie_header(cookie: axum_extra::extract::cookie::Cookie<'static>) -> RestResult<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| RestError::InternalError(format!("Invalid cookie: {}", e)))
}

/// Returns the CSRF token of the current session, creating a new session if there is none.
///
/// When a session is created, the returned headers contain the cookie that identifies it.
async fn ensure_session(
    driver: AuthnDriver,
    context: SessionContext,
    request_headers: &HeaderMap,
) -> RestResult<(CsrfToken, HeaderMap)> {
    let mut headers = HeaderMap::new();
    if let Some(token) = context.session.as_ref().and_then(session_csrf_token) {
        return Ok((token, headers));
    }

    let (session, cookie) = driver.new_session().await?;
    let token = session_csrf_token(&session)
        .ok_or_else(|| RestError::InternalError("New session without CSRF token".to_owned()))?;
    let cookie = cookies::make_session_cookie(cookie, request_headers, driver.opts().cookie_secure);
    headers.insert(header::SET_COOKIE, cookie_header(cookie)?);
    Ok((token, headers))
}

impl AuthnState {
    /// Returns the CSRF token to embed in the HTML forms that an app renders for the caller.
    ///
    /// Behaves like the `/csrf` endpoint: if the request carries no valid session, a new one is
    /// created and the returned headers must be sent back to the client.
    pub async fn form_token(
        &self,
        context: SessionContext,
        request_headers: &HeaderMap,
    ) -> RestResult<(CsrfToken, HeaderMap)> {
        ensure_session(self.driver.clone(), context, request_headers).await
    }
}

/// Builds a `302 Found` response pointing to `location`, with extra `headers`.
fn redirect(location: &'static str, mut headers: HeaderMap) -> (http::StatusCode, HeaderMap) {
    headers.insert(header::LOCATION, HeaderValue::from_static(location));
    (http::StatusCode::FOUND, headers)
}
