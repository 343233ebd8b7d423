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

//! API to log a user in with a form.

use crate::model::Password;
use crate::rest::cookies::make_session_cookie;
use crate::rest::{AuthnState, SessionContext, cookie_header, redirect};
use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use bibliotheca_core::driver::DriverError;
use bibliotheca_core::model::Username;
use bibliotheca_core::rest::RestResult;
use http::header;
use log::info;
use serde::{Deserialize, Serialize};

/// Form sent to the server to log in.
#[derive(Deserialize, Serialize)]
pub struct LoginForm {
    /// Login name of the user.
    pub username: String,

    /// Password of the user.
    pub password: String,
}

/// POST handler for this API.
///
/// The session that served the login form is replaced by a new one, so neither its identifier nor
/// its CSRF token remain valid once the user is in.
pub(crate) async fn handler(
    State(state): State<AuthnState>,
    context: SessionContext,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> RestResult<impl IntoResponse> {
    let failed = || redirect("/login?error", HeaderMap::new());

    let (Ok(username), Ok(password)) = (Username::new(form.username), Password::new(form.password))
    else {
        return Ok(failed());
    };

    let principal = match state.driver.clone().authenticate(username, password).await {
        Ok(principal) => principal,
        Err(DriverError::NotFound(_)) | Err(DriverError::Unauthorized(_)) => return Ok(failed()),
        Err(e) => return Err(e.into()),
    };

    let secure = state.driver.opts().cookie_secure;
    let cookie = state.driver.login_session(context.session, &principal).await?;
    info!("User {} logged in", principal.username().as_str());

    let mut response_headers = HeaderMap::new();
    response_headers
        .insert(header::SET_COOKIE, cookie_header(make_session_cookie(cookie, &headers, secure))?);
    Ok(redirect("/", response_headers))
}
