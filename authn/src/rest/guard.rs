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

//! Middleware that authenticates callers, enforces CSRF protection and applies the access table.

use crate::authz::{AccessPolicy, Decision};
use crate::driver::{AuthnDriver, Session, session_csrf_token, session_principal};
use crate::model::Principal;
use crate::rest::cookies::get_session_cookie;
use crate::rest::httputils::{get_basic_auth, has_authorization};
use crate::rest::{CSRF_HEADER_NAME, CSRF_PARAMETER_NAME};
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bibliotheca_core::driver::DriverError;
use bibliotheca_core::rest::{RestError, RestResult, get_unique_header};
use http::request::Parts;
use http::{HeaderMap, Method, header};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum size of a form body that we buffer to look for the CSRF token.
const MAX_FORM_SIZE: usize = 64 * 1024;

/// Message returned to anonymous callers of protected routes.
const AUTHENTICATION_REQUIRED: &str = "Full authentication is required to access this resource";

/// Message returned to callers that lack the rights to access a route.
const ACCESS_DENIED: &str = "Access is denied";

/// Message returned to callers that failed the CSRF check.
const INVALID_CSRF_TOKEN: &str = "Invalid CSRF token";

/// Message returned to callers that presented bad credentials.
const BAD_CREDENTIALS: &str = "Bad credentials";

/// State shared by the guard and the authentication handlers.
#[derive(Clone)]
pub struct AuthnState {
    /// The authentication driver.
    pub(crate) driver: AuthnDriver,

    /// The access table to enforce.
    pub(crate) policy: Arc<AccessPolicy>,
}

impl AuthnState {
    /// Creates a new state from a `driver` and the `policy` to enforce.
    pub fn new(driver: AuthnDriver, policy: AccessPolicy) -> Self {
        Self { driver, policy: Arc::from(policy) }
    }
}

/// Session of the current request, as found by the guard.
#[derive(Clone)]
pub struct SessionContext {
    /// The session identified by the request cookie, if any and still valid.
    pub session: Option<Session>,
}

/// Checks if requests with `method` can change state and thus need CSRF protection.
fn is_state_changing(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Checks if the `headers` describe a URL-encoded form body.
fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with(mime::APPLICATION_WWW_FORM_URLENCODED.as_ref()))
        .unwrap_or(false)
}

/// Finds the CSRF token that the client sent along with `request`.
///
/// The header takes precedence.  If it is missing and the body is a form, the body is buffered to
/// look for the token field and then put back in place for the handler to consume.
async fn find_csrf_token(request: Request) -> RestResult<(Request, Option<String>)> {
    if let Some(value) = get_unique_header(request.headers(), CSRF_HEADER_NAME)? {
        let token = value.to_str().ok().map(str::to_owned);
        return Ok((request, token));
    }

    if !is_form(request.headers()) {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_SIZE)
        .await
        .map_err(|e| RestError::InvalidRequest(format!("Cannot read form: {}", e)))?;
    let token = serde_urlencoded::from_bytes::<HashMap<String, String>>(&bytes)
        .ok()
        .and_then(|mut fields| fields.remove(CSRF_PARAMETER_NAME));
    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

/// Authenticates the caller using the basic credentials in `headers`.
async fn authenticate_basic(driver: AuthnDriver, headers: &HeaderMap) -> RestResult<Principal> {
    let realm = driver.realm();
    let bad_credentials = || RestError::Unauthorized {
        scheme: "Basic",
        realm,
        message: BAD_CREDENTIALS.to_owned(),
    };

    let (username, password) = get_basic_auth(headers, realm).map_err(|e| {
        debug!("Rejecting basic credentials: {}", e);
        bad_credentials()
    })?;
    match driver.authenticate(username, password).await {
        Ok(principal) => Ok(principal),
        Err(DriverError::NotFound(_)) | Err(DriverError::Unauthorized(_)) => Err(bad_credentials()),
        Err(e) => Err(e.into()),
    }
}

/// Middleware that guards every route of an app.
///
/// Requests go through authentication (basic credentials if present, otherwise the session), the
/// CSRF check for state-changing methods and the access table, in this order.  Handlers can then
/// obtain the caller via the `Principal` extractor and the session via `SessionContext`.
pub async fn guard(
    State(state): State<AuthnState>,
    request: Request,
    next: Next,
) -> RestResult<Response> {
    let driver = state.driver;

    let session = match get_session_cookie(request.headers()) {
        Some(cookie) => driver.load_session(&cookie).await?,
        None => None,
    };

    let basic = has_authorization(request.headers());
    let principal = if basic {
        Some(authenticate_basic(driver.clone(), request.headers()).await?)
    } else {
        session.as_ref().and_then(session_principal)
    };

    let mut request = request;
    if is_state_changing(request.method()) {
        let expected = session.as_ref().and_then(session_csrf_token);
        let (new_request, actual) = find_csrf_token(request).await?;
        request = new_request;
        let valid = match (expected, actual) {
            (Some(expected), Some(actual)) => expected.matches(&actual),
            _ => false,
        };
        if !valid {
            debug!("Invalid CSRF token for {} {}", request.method(), request.uri().path());
            return Err(RestError::Forbidden(INVALID_CSRF_TOKEN.to_owned()));
        }
    }

    match state.policy.decide(request.method(), request.uri().path(), principal.as_ref()) {
        Decision::Allowed => (),
        Decision::Unauthenticated => {
            debug!("Anonymous access denied to {} {}", request.method(), request.uri().path());
            return Err(RestError::Unauthorized {
                scheme: "Basic",
                realm: driver.realm(),
                message: AUTHENTICATION_REQUIRED.to_owned(),
            });
        }
        Decision::Denied => {
            debug!(
                "Access denied to {} {} for {:?}",
                request.method(),
                request.uri().path(),
                principal
            );
            return Err(RestError::Forbidden(ACCESS_DENIED.to_owned()));
        }
    }

    if let Some(session) = session.as_ref() {
        driver.touch_session(session.clone()).await?;
    }

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    request.extensions_mut().insert(SessionContext { session });

    Ok(next.run(request).await)
}

/// Extractor for the authenticated caller of a request.
///
/// Only works on routes protected by `guard`.  Rejects anonymous callers.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(principal) => Ok(principal.clone()),
            None => Err(RestError::Unauthorized {
                scheme: "Basic",
                realm: bibliotheca_core::rest::DEFAULT_REALM,
                message: AUTHENTICATION_REQUIRED.to_owned(),
            }),
        }
    }
}

/// Extractor for the session of the current request.
#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionContext>() {
            Some(context) => Ok(context.clone()),
            None => Err(RestError::InternalError("Route is not protected by the guard".to_owned())),
        }
    }
}

